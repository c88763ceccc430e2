use thiserror::Error;

/// Failure modes of the ANPX codec.
///
/// The variants are grouped by propagation policy:
/// [`Error::is_fatal_to_tunnel`] tells a caller whether the containing
/// tunnel must be closed or whether only the one request is affected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("frame did not begin with the ANPX magic bytes")]
    BadMagic,

    #[error("unsupported ANPX version {0:#04x}")]
    BadVersion(u8),

    #[error("header CRC-32 mismatch")]
    HeaderCrcMismatch,

    #[error("body CRC-32 mismatch")]
    BodyCrcMismatch,

    #[error("frame truncated: expected {expected} bytes, got {got}")]
    TruncatedFrame { expected: usize, got: usize },

    #[error("malformed TLV: {0}")]
    BadTlv(String),

    #[error("duplicate chunk_index {0} for this request_id")]
    DuplicateChunkIndex(u32),

    #[error("chunk_index {index} out of range for chunk_total {total}")]
    ChunkIndexOutOfRange { index: u32, total: u32 },

    #[error("reassembly buffer for this request_id went idle past its TTL")]
    ReassemblyTimeout,
}

impl Error {
    /// Corrupted-stream errors are fatal for the containing tunnel:
    /// the decoder must signal the registry to close the connection
    /// rather than attempt to keep reading.
    pub fn is_fatal_to_tunnel(&self) -> bool {
        matches!(
            self,
            Error::BadMagic
                | Error::BadVersion(_)
                | Error::HeaderCrcMismatch
                | Error::BodyCrcMismatch
                | Error::TruncatedFrame { .. }
        )
    }

    /// Errors scoped to a single request_id: the reassembly buffer for
    /// that request is discarded and its pending slot fails, but the
    /// tunnel itself stays open.
    pub fn is_scoped_to_request(&self) -> bool {
        matches!(
            self,
            Error::BadTlv(_)
                | Error::DuplicateChunkIndex(_)
                | Error::ChunkIndexOutOfRange { .. }
                | Error::ReassemblyTimeout
        )
    }
}
