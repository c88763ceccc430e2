#![forbid(unsafe_code)]
//! The ANPX binary frame codec.
//!
//! Bidirectional translation between logical `(type, request_id,
//! http_meta?, http_body?, resp_meta?)` tuples and ANPX wire frames,
//! with transparent chunking and reassembly. Callers never see
//! chunks: [`encode`] hides the chunking decision and [`Decoder`]
//! hides reassembly.

mod codec;
mod error;
mod frame;
mod header;
mod reassembly;
mod tlv;

pub use codec::{encode, Decoder, DEFAULT_CHUNK_SIZE, DEFAULT_REASSEMBLY_IDLE_TTL_SECS};
pub use error::Error;
pub use frame::{HttpMeta, LogicalFrame, LogicalFrameKind, RespMeta};
pub use header::{FrameType, HEADER_LEN, MAGIC, VERSION};
pub use tlv::Tag;

#[cfg(test)]
mod tests;
