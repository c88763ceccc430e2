use thiserror::Error;

/// Gateway-level error taxonomy: each variant maps to a fixed HTTP
/// status at the ingress boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no receiver for this service")]
    NoRoute,

    #[error("no tunnel capacity")]
    NoCapacity,

    #[error("request timed out")]
    RequestTimeout,

    #[error("tunnel lost or protocol error: {0}")]
    TunnelLost(String),

    #[error("request body exceeds configured limit")]
    PayloadTooLarge,

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The HTTP status this error is reported to the client as.
    pub fn status(&self) -> u16 {
        match self {
            Error::NoRoute | Error::NoCapacity => 503,
            Error::RequestTimeout => 504,
            Error::TunnelLost(_) => 502,
            Error::PayloadTooLarge => 413,
            Error::Internal(_) => 500,
        }
    }

    /// A short, client-safe reason phrase; never includes internal
    /// detail such as stack traces or internal ids.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::NoRoute => "No receiver",
            Error::NoCapacity => "No receiver",
            Error::RequestTimeout => "Gateway Timeout",
            Error::TunnelLost(_) => "Bad Gateway",
            Error::PayloadTooLarge => "Payload Too Large",
            Error::Internal(_) => "Internal Server Error",
        }
    }
}

impl From<anpx_registry::Error> for Error {
    fn from(err: anpx_registry::Error) -> Self {
        match err {
            anpx_registry::Error::NoRoute => Error::NoRoute,
            anpx_registry::Error::NoCapacity => Error::NoCapacity,
            anpx_registry::Error::UnknownConnection(id) => {
                Error::TunnelLost(format!("unknown connection {id}"))
            }
            anpx_registry::Error::TunnelLost(id) => Error::TunnelLost(format!("tunnel {id} lost")),
        }
    }
}

/// Only reached from the ingress side, where `anpx_wire::encode`
/// failing means this gateway built a malformed outbound frame — an
/// unexpected internal failure, not evidence the tunnel itself is bad.
/// Inbound decode errors are handled separately in `tunnel_io`, which
/// already knows whether an error is fatal to the tunnel or scoped to
/// one request, and never routes through this conversion.
impl From<anpx_wire::Error> for Error {
    fn from(err: anpx_wire::Error) -> Self {
        Error::Internal(format!("failed to encode outbound frame: {err}"))
    }
}
