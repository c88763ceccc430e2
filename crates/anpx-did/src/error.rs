use thiserror::Error;

/// DID-WBA admission failures. Every variant maps to the same
/// WebSocket close code, `4003` ("DID authentication failed") —
/// callers must not leak which step failed to the remote peer, only
/// to logs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Authorization header is missing or not a DIDWba challenge")]
    MalformedHeader,

    #[error("timestamp outside the allowed window")]
    TimestampOutOfWindow,

    #[error("nonce already used within the window")]
    NonceReused,

    #[error("failed to resolve DID document: {0}")]
    ResolutionFailed(String),

    #[error("verification_method {0} not found in DID document")]
    UnknownVerificationMethod(String),

    #[error("verification method type {0} is not supported")]
    UnsupportedVerificationMethod(String),

    #[error("signature did not verify")]
    SignatureInvalid,

    #[error("DID has no authorized services")]
    NoAuthorizedServices,
}

impl Error {
    /// The WebSocket close code for every DID-WBA admission failure:
    /// `4003`, regardless of which step failed.
    pub const CLOSE_CODE: u16 = 4003;
}
