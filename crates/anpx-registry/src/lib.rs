#![forbid(unsafe_code)]
//! Tunnel connection registry, admission state machine, and the
//! in-process service directory/router.

mod connection;
mod directory;
mod error;
mod registry;
mod router;
mod service_directory;

pub use connection::{ConnectionId, HealthState, TunnelConnection, TunnelState};
pub use directory::{canonicalize, normalize_path, Directory};
pub use error::Error;
pub use registry::{
    run_sweeper, TunnelRegistry, DEFAULT_KEEPALIVE_INTERVAL_SECS, DEFAULT_KEEPALIVE_TIMEOUT_SECS,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_PENDING, DEFAULT_SWEEP_INTERVAL_SECS,
};
pub use router::select_and_reserve;
pub use service_directory::{ServiceDirectory, StaticServiceDirectory};
