use thiserror::Error;

/// Failure modes on the receiver side. Unlike `anpx_gateway::Error`,
/// none of these are mapped to an HTTP status — the receiver has no
/// public HTTP surface of its own; they are logged and, for
/// request-scoped failures, turned into an `0xFF` error frame back to
/// the gateway.
#[derive(Debug, Error)]
pub enum Error {
    #[error("tunnel dial failed: {0}")]
    Dial(String),

    #[error("tunnel closed")]
    TunnelClosed,

    #[error("local application error: {0}")]
    LocalApplication(String),

    #[error(transparent)]
    Wire(#[from] anpx_wire::Error),
}
