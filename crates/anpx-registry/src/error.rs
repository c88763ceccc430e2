use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no healthy tunnel matches this request's host/path")]
    NoRoute,

    #[error("all candidate tunnels are at max_pending_per_connection capacity")]
    NoCapacity,

    #[error("tunnel connection {0} is not admitted")]
    UnknownConnection(uuid::Uuid),

    #[error("tunnel connection {0} was lost")]
    TunnelLost(uuid::Uuid),
}
