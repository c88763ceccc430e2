#![forbid(unsafe_code)]
//! DID-WBA tunnel admission: parsing the `Authorization: DIDWba ...`
//! challenge, the timestamp window, the sliding-window nonce cache,
//! Ed25519 signature verification bound to the requested domain, and
//! optional RS256 JWT issuance.

mod admission;
mod error;
mod header;
mod jwt;
mod nonce;
mod resolver;
mod timestamp;
mod verify;

pub use admission::{admit, default_nonce_cache, Admitted, JwtIssuer};
pub use error::Error;
pub use header::{parse_authorization_header, DidWbaChallenge};
pub use jwt::{issue_jwt, Claims};
pub use nonce::NonceCache;
pub use resolver::{DidDocument, DidResolver, StaticDidResolver, VerificationMethod};
pub use timestamp::{check_window, WINDOW_SECS};
pub use verify::{signing_payload, verify_signature};
