use crate::Error;
use serde::de::{self, MapAccess, Visitor};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::fmt;

/// Recognized TLV tags. Tags `0xF0..=0xFF` are reserved for future
/// protocol revisions; any other unrecognized tag must be skipped by
/// length rather than treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    RequestId,
    HttpMeta,
    HttpBody,
    RespMeta,
    ChunkIndex,
    ChunkTotal,
    FinalChunk,
    Reserved(u8),
    Unknown(u8),
}

impl Tag {
    pub const REQUEST_ID: u8 = 0x01;
    pub const HTTP_META: u8 = 0x02;
    pub const HTTP_BODY: u8 = 0x03;
    pub const RESP_META: u8 = 0x04;
    pub const CHUNK_INDEX: u8 = 0x0A;
    pub const CHUNK_TOTAL: u8 = 0x0B;
    pub const FINAL_CHUNK: u8 = 0x0C;

    pub fn from_byte(b: u8) -> Self {
        match b {
            Self::REQUEST_ID => Tag::RequestId,
            Self::HTTP_META => Tag::HttpMeta,
            Self::HTTP_BODY => Tag::HttpBody,
            Self::RESP_META => Tag::RespMeta,
            Self::CHUNK_INDEX => Tag::ChunkIndex,
            Self::CHUNK_TOTAL => Tag::ChunkTotal,
            Self::FINAL_CHUNK => Tag::FinalChunk,
            0xF0..=0xFF => Tag::Reserved(b),
            other => Tag::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Tag::RequestId => Self::REQUEST_ID,
            Tag::HttpMeta => Self::HTTP_META,
            Tag::HttpBody => Self::HTTP_BODY,
            Tag::RespMeta => Self::RESP_META,
            Tag::ChunkIndex => Self::CHUNK_INDEX,
            Tag::ChunkTotal => Self::CHUNK_TOTAL,
            Tag::FinalChunk => Self::FINAL_CHUNK,
            Tag::Reserved(b) | Tag::Unknown(b) => b,
        }
    }
}

/// One decoded `(tag, value)` pair from a frame body. Unknown and
/// reserved tags are retained so callers can log them, but carry no
/// further meaning.
#[derive(Debug, Clone)]
pub struct RawTlv {
    pub tag: Tag,
    pub value: Vec<u8>,
}

/// Appends a single TLV triple (1-byte tag, 4-byte BE length, value) to `out`.
pub fn write_tlv(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    out.push(tag);
    out.extend_from_slice(&(value.len() as u32).to_be_bytes());
    out.extend_from_slice(value);
}

/// Splits a frame body into its TLV triples, skipping anything whose
/// declared length runs past the end of the buffer.
pub fn read_tlvs(body: &[u8]) -> Result<SmallVec<[RawTlv; 8]>, Error> {
    let mut tlvs = SmallVec::new();
    let mut cursor = 0usize;
    while cursor < body.len() {
        if cursor + 5 > body.len() {
            return Err(Error::BadTlv("truncated TLV header".into()));
        }
        let tag = body[cursor];
        let len = u32::from_be_bytes(body[cursor + 1..cursor + 5].try_into().unwrap()) as usize;
        let value_start = cursor + 5;
        let value_end = value_start
            .checked_add(len)
            .ok_or_else(|| Error::BadTlv("TLV length overflow".into()))?;
        if value_end > body.len() {
            return Err(Error::BadTlv(format!(
                "TLV tag {tag:#04x} declares length {len} past end of body"
            )));
        }
        tlvs.push(RawTlv {
            tag: Tag::from_byte(tag),
            value: body[value_start..value_end].to_vec(),
        });
        cursor = value_end;
    }
    Ok(tlvs)
}

/// Parses a UTF-8 JSON object TLV, rejecting duplicate keys: JSON TLVs
/// are UTF-8 and strict, so duplicate keys are disallowed.
pub fn parse_strict_json_object(bytes: &[u8]) -> Result<Map<String, Value>, Error> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::BadTlv(format!("JSON TLV is not valid UTF-8: {e}")))?;
    let mut de = serde_json::Deserializer::from_str(text);
    let map = de
        .deserialize_map(StrictMapVisitor)
        .map_err(|e| Error::BadTlv(format!("invalid JSON TLV: {e}")))?;
    de.end()
        .map_err(|e| Error::BadTlv(format!("trailing data after JSON TLV: {e}")))?;
    Ok(map)
}

struct StrictMapVisitor;

impl<'de> Visitor<'de> for StrictMapVisitor {
    type Value = Map<String, Value>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object with no duplicate keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            if map.insert(key.clone(), value).is_some() {
                return Err(de::Error::custom(format!("duplicate key {key:?}")));
            }
        }
        Ok(map)
    }
}
