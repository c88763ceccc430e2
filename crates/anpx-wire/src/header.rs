use crate::Error;
use crc::{Crc, CRC_32_ISO_HDLC};

/// The fixed 24-byte ANPX frame header.
///
/// Bytes 20..24 are reserved padding, zeroed on encode and ignored on
/// decode; they exist purely to round the header out to 24 bytes while
/// keeping the CRC coverage (header CRC over bytes `0..11`, body CRC
/// occupying bytes `16..19`) untouched — the named fields only sum to
/// 20 bytes on their own. See DESIGN.md for the reasoning.
pub const HEADER_LEN: usize = 24;
pub const MAGIC: [u8; 4] = *b"ANPX";
pub const VERSION: u8 = 0x01;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

pub fn crc32(bytes: &[u8]) -> u32 {
    CRC32.checksum(bytes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Request,
    Response,
    Error,
}

impl FrameType {
    pub const REQUEST: u8 = 0x01;
    pub const RESPONSE: u8 = 0x02;
    pub const ERROR: u8 = 0xFF;

    pub fn to_byte(self) -> u8 {
        match self {
            FrameType::Request => Self::REQUEST,
            FrameType::Response => Self::RESPONSE,
            FrameType::Error => Self::ERROR,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            Self::REQUEST => Some(FrameType::Request),
            Self::RESPONSE => Some(FrameType::Response),
            Self::ERROR => Some(FrameType::Error),
            _ => None,
        }
    }
}

pub const FLAG_CHUNKED: u8 = 0b0000_0001;

/// A decoded header plus the raw body slice it was read alongside.
/// Immutable once constructed: `total_length` and both CRCs are
/// computed up front by [`HeaderBuilder`] and never mutated after.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub frame_type: FrameType,
    pub flags: u8,
    pub total_length: u32,
    pub header_crc32: u32,
    pub body_crc32: u32,
}

impl Header {
    pub fn is_chunked(&self) -> bool {
        self.flags & FLAG_CHUNKED != 0
    }

    /// Parses and validates the first [`HEADER_LEN`] bytes of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::TruncatedFrame {
                expected: HEADER_LEN,
                got: bytes.len(),
            });
        }
        if bytes[0..4] != MAGIC {
            return Err(Error::BadMagic);
        }
        let version = bytes[4];
        if version != VERSION {
            return Err(Error::BadVersion(version));
        }
        let frame_type = FrameType::from_byte(bytes[5])
            .ok_or_else(|| Error::BadTlv(format!("unrecognized frame type {:#04x}", bytes[5])))?;
        let flags = bytes[6];
        // bytes[7] is the reserved byte; tolerated regardless of value.
        let total_length = u32::from_be_bytes(bytes[8..12].try_into().unwrap());
        let header_crc32 = u32::from_be_bytes(bytes[12..16].try_into().unwrap());
        let body_crc32 = u32::from_be_bytes(bytes[16..20].try_into().unwrap());

        let computed_header_crc = crc32(&bytes[0..12]);
        if computed_header_crc != header_crc32 {
            return Err(Error::HeaderCrcMismatch);
        }

        Ok(Header {
            frame_type,
            flags,
            total_length,
            header_crc32,
            body_crc32,
        })
    }
}

/// Builder that assembles a header's mutable fields (total length,
/// both CRCs) before freezing them into an immutable [`Header`] /
/// byte buffer. This is the fix design note §9 calls for: the
/// upstream pydantic model had to drop `frozen=True` because CRC
/// computation mutates `total_length` after body assembly; here the
/// mutation lives in the builder and the wire type stays immutable.
pub struct HeaderBuilder {
    frame_type: FrameType,
    flags: u8,
}

impl HeaderBuilder {
    pub fn new(frame_type: FrameType) -> Self {
        Self {
            frame_type,
            flags: 0,
        }
    }

    pub fn chunked(mut self, chunked: bool) -> Self {
        if chunked {
            self.flags |= FLAG_CHUNKED;
        } else {
            self.flags &= !FLAG_CHUNKED;
        }
        self
    }

    /// Freezes the header over a fully-assembled body, writing the
    /// 24-byte header immediately followed by `body` into a new buffer.
    /// The body CRC is computed over `body` itself; use
    /// [`HeaderBuilder::finish_with_body_crc`] for chunk frames, whose
    /// on-wire body is only a slice of the logical body the CRC covers.
    pub fn finish(self, body: &[u8]) -> Vec<u8> {
        let body_crc = crc32(body);
        self.finish_with_body_crc(body, body_crc)
    }

    /// Freezes the header, writing `wire_body` as the on-wire body but
    /// stamping `body_crc32` (the CRC of the full logical body) into
    /// the header instead of recomputing it from `wire_body`. Every
    /// chunk of a chunked sequence carries the same `body_crc32`.
    pub fn finish_with_body_crc(self, wire_body: &[u8], body_crc32: u32) -> Vec<u8> {
        let total_length = (HEADER_LEN + wire_body.len()) as u32;
        let mut out = Vec::with_capacity(HEADER_LEN + wire_body.len());
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.push(self.frame_type.to_byte());
        out.push(self.flags);
        out.push(0x00); // reserved
        out.extend_from_slice(&total_length.to_be_bytes());

        let header_crc = crc32(&out[0..12]);
        out.extend_from_slice(&header_crc.to_be_bytes());
        out.extend_from_slice(&body_crc32.to_be_bytes());
        out.extend_from_slice(&[0u8; 4]); // reserved padding to HEADER_LEN
        debug_assert_eq!(out.len(), HEADER_LEN);

        out.extend_from_slice(wire_body);
        out
    }
}
