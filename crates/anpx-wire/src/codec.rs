use crate::frame::{HttpMeta, LogicalFrame, LogicalFrameKind, RespMeta};
use crate::header::{self, FrameType, Header, HeaderBuilder, HEADER_LEN};
use crate::reassembly::{PendingMeta, Reassembled, Reassembler};
use crate::tlv::{self, RawTlv, Tag};
use crate::Error;
use std::time::Duration;
use uuid::Uuid;

/// Default chunk size for body-fitting (the `chunk_size` config value).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default idle TTL for chunk reassembly buffers (the
/// `reassembly_idle_ttl` config value).
pub const DEFAULT_REASSEMBLY_IDLE_TTL_SECS: u64 = 300;

/// Encodes a logical frame into one or more wire frames, splitting the
/// body across `ceil(body_len / chunk_size)` frames when it exceeds
/// `chunk_size`. Non-body TLVs travel only on the final chunk. Chunks
/// are always produced in ascending `chunk_index` order.
pub fn encode(frame: &LogicalFrame, chunk_size: usize) -> Result<Vec<Vec<u8>>, Error> {
    assert!(chunk_size > 0, "chunk_size must be nonzero");

    let frame_type = match &frame.kind {
        LogicalFrameKind::Request(_) => FrameType::Request,
        LogicalFrameKind::Response(_) => FrameType::Response,
        LogicalFrameKind::Error => FrameType::Error,
    };
    let meta_bytes = encode_meta(&frame.kind)?;
    let body = frame.body.as_deref().unwrap_or(&[]);
    let request_id_bytes = frame.request_id.to_string().into_bytes();

    if body.len() <= chunk_size {
        let mut wire_body = Vec::new();
        tlv::write_tlv(&mut wire_body, Tag::RequestId.to_byte(), &request_id_bytes);
        if let Some(meta) = &meta_bytes {
            tlv::write_tlv(&mut wire_body, meta.tag.to_byte(), &meta.bytes);
        }
        if !body.is_empty() {
            tlv::write_tlv(&mut wire_body, Tag::HttpBody.to_byte(), body);
        }
        let out = HeaderBuilder::new(frame_type).chunked(false).finish(&wire_body);
        return Ok(vec![out]);
    }

    let full_body_crc = header::crc32(body);
    let chunk_total = body.len().div_ceil(chunk_size) as u32;
    let mut frames = Vec::with_capacity(chunk_total as usize);

    for index in 0..chunk_total {
        let start = index as usize * chunk_size;
        let end = (start + chunk_size).min(body.len());
        let is_last = index + 1 == chunk_total;

        let mut wire_body = Vec::new();
        tlv::write_tlv(&mut wire_body, Tag::RequestId.to_byte(), &request_id_bytes);
        tlv::write_tlv(
            &mut wire_body,
            Tag::ChunkIndex.to_byte(),
            &index.to_be_bytes(),
        );
        tlv::write_tlv(
            &mut wire_body,
            Tag::ChunkTotal.to_byte(),
            &chunk_total.to_be_bytes(),
        );
        if is_last {
            tlv::write_tlv(&mut wire_body, Tag::FinalChunk.to_byte(), &[0x01]);
            if let Some(meta) = &meta_bytes {
                tlv::write_tlv(&mut wire_body, meta.tag.to_byte(), &meta.bytes);
            }
        }
        tlv::write_tlv(&mut wire_body, Tag::HttpBody.to_byte(), &body[start..end]);

        let out = HeaderBuilder::new(frame_type)
            .chunked(true)
            .finish_with_body_crc(&wire_body, full_body_crc);
        frames.push(out);
    }

    Ok(frames)
}

struct EncodedMeta {
    tag: Tag,
    bytes: Vec<u8>,
}

fn encode_meta(kind: &LogicalFrameKind) -> Result<Option<EncodedMeta>, Error> {
    match kind {
        LogicalFrameKind::Request(meta) => {
            let bytes = serde_json::to_vec(meta)
                .map_err(|e| Error::BadTlv(format!("failed to serialize http_meta: {e}")))?;
            Ok(Some(EncodedMeta {
                tag: Tag::HttpMeta,
                bytes,
            }))
        }
        LogicalFrameKind::Response(meta) => {
            let bytes = serde_json::to_vec(meta)
                .map_err(|e| Error::BadTlv(format!("failed to serialize resp_meta: {e}")))?;
            Ok(Some(EncodedMeta {
                tag: Tag::RespMeta,
                bytes,
            }))
        }
        LogicalFrameKind::Error => Ok(None),
    }
}

/// Stateful decoder: holds the chunk-reassembly table across calls to
/// [`Decoder::decode_frame`] for a single tunnel.
pub struct Decoder {
    reassembler: Reassembler,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_REASSEMBLY_IDLE_TTL_SECS))
    }
}

impl Decoder {
    pub fn new(reassembly_idle_ttl: Duration) -> Self {
        Self {
            reassembler: Reassembler::new(reassembly_idle_ttl),
        }
    }

    /// Decodes exactly one wire frame (a full WebSocket binary message).
    /// Returns `Ok(None)` when the frame is one chunk of a sequence
    /// that is not yet complete.
    pub fn decode_frame(&mut self, bytes: &[u8]) -> Result<Option<LogicalFrame>, Error> {
        let header = Header::parse(bytes)?;
        let total_length = header.total_length as usize;
        if bytes.len() != total_length {
            return Err(Error::TruncatedFrame {
                expected: total_length,
                got: bytes.len(),
            });
        }
        let body = &bytes[HEADER_LEN..total_length];
        let tlvs = read_tlvs_tolerant(body)?;

        let request_id = find_request_id(&tlvs)?;

        if !header.is_chunked() {
            if header::crc32(body) != header.body_crc32 {
                return Err(Error::BodyCrcMismatch);
            }
            let (meta, http_body) = extract_meta_and_body(&tlvs, header.frame_type)?;
            return Ok(Some(build_logical_frame(
                header.frame_type,
                request_id,
                meta,
                http_body,
            )?));
        }

        let chunk_index = find_u32_tag(&tlvs, Tag::ChunkIndex)?
            .ok_or_else(|| Error::BadTlv("chunked frame missing chunk_index".into()))?;
        let chunk_total = find_u32_tag(&tlvs, Tag::ChunkTotal)?;
        let final_chunk = find_final_chunk(&tlvs)?;
        let value = find_tag_value(&tlvs, Tag::HttpBody).unwrap_or_default();
        let (meta, _) = extract_meta_and_body(&tlvs, header.frame_type)?;
        let pending_meta = match meta {
            Some(MetaValue::Request(m)) => PendingMeta::Request(m),
            Some(MetaValue::Response(m)) => PendingMeta::Response(m),
            None => PendingMeta::None,
        };

        let reassembled = self.reassembler.accept_chunk(
            request_id,
            header.frame_type,
            chunk_index,
            chunk_total,
            final_chunk,
            header.body_crc32,
            value,
            pending_meta,
        )?;

        match reassembled {
            None => Ok(None),
            Some(Reassembled {
                frame_type,
                meta,
                body,
                ..
            }) => {
                let meta = match meta {
                    PendingMeta::Request(m) => Some(MetaValue::Request(m)),
                    PendingMeta::Response(m) => Some(MetaValue::Response(m)),
                    PendingMeta::None => None,
                };
                Ok(Some(build_logical_frame(
                    frame_type,
                    request_id,
                    meta,
                    if body.is_empty() { None } else { Some(body) },
                )?))
            }
        }
    }

    /// Drops reassembly buffers idle past their TTL, returning the
    /// `request_id`s whose pending slot must now fail as a reassembly
    /// timeout.
    pub fn sweep_idle_reassembly(&mut self) -> Vec<Uuid> {
        self.reassembler.sweep_idle()
    }

    pub fn discard_reassembly(&mut self, request_id: &Uuid) {
        self.reassembler.discard(request_id);
    }

    pub fn pending_reassembly_count(&self) -> usize {
        self.reassembler.len()
    }
}

enum MetaValue {
    Request(HttpMeta),
    Response(RespMeta),
}

fn read_tlvs_tolerant(body: &[u8]) -> Result<Vec<RawTlv>, Error> {
    Ok(tlv::read_tlvs(body)?.into_vec())
}

fn find_request_id(tlvs: &[RawTlv]) -> Result<Uuid, Error> {
    let raw = tlvs
        .iter()
        .find(|t| matches!(t.tag, Tag::RequestId))
        .ok_or_else(|| Error::BadTlv("frame missing request_id".into()))?;
    let text = std::str::from_utf8(&raw.value)
        .map_err(|e| Error::BadTlv(format!("request_id is not valid UTF-8: {e}")))?;
    Uuid::parse_str(text).map_err(|e| Error::BadTlv(format!("request_id is not a UUID: {e}")))
}

fn find_tag_value(tlvs: &[RawTlv], tag: Tag) -> Option<Vec<u8>> {
    tlvs.iter()
        .find(|t| t.tag == tag)
        .map(|t| t.value.clone())
}

fn find_u32_tag(tlvs: &[RawTlv], tag: Tag) -> Result<Option<u32>, Error> {
    match find_tag_value(tlvs, tag) {
        None => Ok(None),
        Some(v) => {
            let arr: [u8; 4] = v
                .as_slice()
                .try_into()
                .map_err(|_| Error::BadTlv(format!("{tag:?} is not 4 bytes")))?;
            Ok(Some(u32::from_be_bytes(arr)))
        }
    }
}

fn find_final_chunk(tlvs: &[RawTlv]) -> Result<bool, Error> {
    match find_tag_value(tlvs, Tag::FinalChunk) {
        None => Ok(false),
        Some(v) => Ok(v.first().copied() == Some(0x01)),
    }
}

fn extract_meta_and_body(
    tlvs: &[RawTlv],
    frame_type: FrameType,
) -> Result<(Option<MetaValue>, Option<Vec<u8>>), Error> {
    let http_body = find_tag_value(tlvs, Tag::HttpBody);
    let meta = match frame_type {
        FrameType::Request => match find_tag_value(tlvs, Tag::HttpMeta) {
            None => None,
            Some(bytes) => {
                let map = tlv::parse_strict_json_object(&bytes)?;
                let meta: HttpMeta = serde_json::from_value(serde_json::Value::Object(map))
                    .map_err(|e| Error::BadTlv(format!("invalid http_meta: {e}")))?;
                Some(MetaValue::Request(meta))
            }
        },
        FrameType::Response => match find_tag_value(tlvs, Tag::RespMeta) {
            None => None,
            Some(bytes) => {
                let map = tlv::parse_strict_json_object(&bytes)?;
                let meta: RespMeta = serde_json::from_value(serde_json::Value::Object(map))
                    .map_err(|e| Error::BadTlv(format!("invalid resp_meta: {e}")))?;
                Some(MetaValue::Response(meta))
            }
        },
        FrameType::Error => None,
    };
    Ok((meta, http_body))
}

fn build_logical_frame(
    frame_type: FrameType,
    request_id: Uuid,
    meta: Option<MetaValue>,
    body: Option<Vec<u8>>,
) -> Result<LogicalFrame, Error> {
    let kind = match (frame_type, meta) {
        (FrameType::Request, Some(MetaValue::Request(m))) => LogicalFrameKind::Request(m),
        (FrameType::Request, None) => {
            return Err(Error::BadTlv("request frame missing http_meta".into()))
        }
        (FrameType::Response, Some(MetaValue::Response(m))) => LogicalFrameKind::Response(m),
        (FrameType::Response, None) => {
            return Err(Error::BadTlv("response frame missing resp_meta".into()))
        }
        (FrameType::Error, _) => LogicalFrameKind::Error,
        _ => return Err(Error::BadTlv("meta/frame type mismatch".into())),
    };
    Ok(LogicalFrame {
        kind,
        request_id,
        body,
    })
}
