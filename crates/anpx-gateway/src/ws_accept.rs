use std::sync::Arc;
use std::time::Duration;

use anpx_registry::{ConnectionId, TunnelConnection, TunnelState};
use log::{info, warn};
use uuid::Uuid;

use crate::state::GatewayState;
use crate::tunnel_io::{run_tunnel_session, TunnelSocket};

/// The WebSocket close code sent when DID-WBA admission fails: `4003`.
/// Re-exported here so the transport adapter that actually closes the
/// socket does not need its own dependency on `anpx-did`.
pub const AUTH_FAILED_CLOSE_CODE: u16 = anpx_did::Error::CLOSE_CODE;

/// Runs the full lifecycle of one inbound tunnel connection: DID-WBA
/// admission, then — on success — registration into the tunnel
/// registry and the reader/writer session until the socket closes.
///
/// Returns `Err` before any state is registered if admission fails;
/// failure on any admission step must not register any state, and the
/// caller is responsible for closing the socket with
/// [`AUTH_FAILED_CLOSE_CODE`].
pub async fn accept_tunnel(
    state: Arc<GatewayState>,
    authorization_header: &str,
    domain: &str,
    socket: impl TunnelSocket + 'static,
) -> Result<(), anpx_did::Error> {
    let admitted = anpx_did::admit(
        authorization_header,
        domain,
        &state.nonce_cache,
        state.did_resolver.as_ref(),
        state.service_directory.as_ref(),
        state.jwt_issuer.as_ref(),
    )
    .await?;

    let connection_id: ConnectionId = Uuid::new_v4();
    let connection = Arc::new(TunnelConnection::new(
        connection_id,
        admitted.did.clone(),
        admitted.service_urls.clone(),
        state.config.max_pending_per_connection,
    ));
    connection.set_state(TunnelState::Healthy);
    state.registry.admit(connection);

    info!(
        "tunnel admitted connection_id={connection_id} did={} service_urls={:?}",
        admitted.did, admitted.service_urls
    );

    let idle_ttl = Duration::from_secs(state.config.reassembly_idle_ttl_secs);
    let keepalive_interval = Duration::from_secs(state.config.keepalive_interval_secs);
    tokio::spawn(run_tunnel_session(
        connection_id,
        socket,
        state.registry.clone(),
        state.writers.clone(),
        state.correlator.clone(),
        idle_ttl,
        keepalive_interval,
    ));

    Ok(())
}

/// Logs an admission failure without leaking which step failed to the
/// remote peer.
pub fn log_admission_failure(err: &anpx_did::Error) {
    warn!("tunnel admission rejected: {err}");
}
