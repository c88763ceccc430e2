#![forbid(unsafe_code)]
//! The public HTTP ingress plus the WebSocket tunnel server of the
//! reverse-tunnel gateway.
//!
//! [`ingress::Ingress`] is the trillium [`Handler`](trillium::Handler)
//! bound on the public HTTP port; [`ws_accept::accept_tunnel`] is run
//! once per inbound tunnel WebSocket connection on the private WS
//! port. Both share a single [`state::GatewayState`].

pub mod config;
pub mod correlator;
pub mod deployment;
pub mod error;
pub mod ingress;
pub mod state;
pub mod tunnel_io;
pub mod ws_accept;
pub mod ws_transport;

pub use config::Config;
pub use error::Error;
pub use ingress::Ingress;
pub use state::GatewayState;
