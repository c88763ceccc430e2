use crate::connection::{ConnectionId, HealthState, TunnelConnection, TunnelState};
use crate::directory::Directory;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Default keep-alive ping interval (`keepalive_interval`).
pub const DEFAULT_KEEPALIVE_INTERVAL_SECS: u64 = 10;
/// Default keep-alive timeout before a tunnel is marked dead
/// (`keepalive_timeout`).
pub const DEFAULT_KEEPALIVE_TIMEOUT_SECS: u64 = 120;
/// Default sweep interval for dead-tunnel eviction.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
/// Default per-tunnel concurrent-request cap
/// (`max_pending_per_connection`).
pub const DEFAULT_MAX_PENDING: usize = 100;
/// Default cap on admitted tunnels (`max_connections`).
pub const DEFAULT_MAX_CONNECTIONS: usize = 100;

/// Tracks every admitted tunnel's lifecycle and exposes the lookups
/// the router needs. Read-heavy (every inbound HTTP request consults
/// it); mutated only on admission, eviction, and state transitions —
/// a `RwLock` over the connection table matches that access pattern.
pub struct TunnelRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<TunnelConnection>>>,
    directory: Directory,
    max_connections: usize,
    keepalive_timeout: Duration,
}

impl TunnelRegistry {
    pub fn new(max_connections: usize, keepalive_timeout: Duration) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            directory: Directory::new(),
            max_connections,
            keepalive_timeout,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn len(&self) -> usize {
        self.connections.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_at_capacity(&self) -> bool {
        self.len() >= self.max_connections
    }

    pub fn get(&self, id: &ConnectionId) -> Option<Arc<TunnelConnection>> {
        self.connections.read().unwrap().get(id).cloned()
    }

    /// Registers a newly admitted tunnel (already transitioned to
    /// `Healthy` by the caller) and publishes its service URLs into
    /// the directory.
    pub fn admit(&self, connection: Arc<TunnelConnection>) {
        let id = connection.id;
        let service_urls = connection.service_urls.clone();
        self.connections.write().unwrap().insert(id, connection);
        self.directory.publish(id, service_urls);
    }

    /// Begins graceful shutdown of a single tunnel: no new requests
    /// are assigned, but existing pending slots are left to finish
    /// until the caller closes the socket.
    pub fn begin_draining(&self, id: &ConnectionId) {
        if let Some(conn) = self.get(id) {
            conn.set_state(TunnelState::Draining);
        }
    }

    /// Marks a tunnel dead, unpublishes it from the directory, and
    /// returns every request_id that was pending on it so the caller
    /// can fail each one with "tunnel lost".
    pub fn evict(&self, id: &ConnectionId) -> Vec<Uuid> {
        let removed = self.connections.write().unwrap().remove(id);
        self.directory.unpublish(id);
        match removed {
            Some(conn) => {
                conn.set_state(TunnelState::Dead);
                conn.take_all_pending()
            }
            None => Vec::new(),
        }
    }

    /// Healthy tunnels bound to `canonical` service URL, used by
    /// [`crate::router::select_and_reserve`] for its exact/prefix/host
    /// match stages.
    pub fn healthy_tunnels_for(&self, canonical: &str) -> Vec<Arc<TunnelConnection>> {
        let ids = self.directory.lookup(canonical);
        let connections = self.connections.read().unwrap();
        ids.into_iter()
            .filter_map(|id| connections.get(&id).cloned())
            .filter(|c| c.health() == Some(HealthState::Healthy))
            .collect()
    }

    /// Sweeps dead-by-keepalive tunnels: any tunnel whose last pong is
    /// older than `keepalive_timeout` is marked dead and evicted.
    /// Returns `(connection_id, failed_request_ids)` pairs for the
    /// caller to act on.
    pub fn sweep_dead(&self, now: Instant) -> Vec<(ConnectionId, Vec<Uuid>)> {
        let stale: Vec<ConnectionId> = {
            let connections = self.connections.read().unwrap();
            connections
                .values()
                .filter(|c| {
                    matches!(c.state(), TunnelState::Healthy | TunnelState::Draining)
                        && now.duration_since(c.last_pong()) > self.keepalive_timeout
                })
                .map(|c| c.id)
                .collect()
        };
        stale
            .into_iter()
            .map(|id| {
                let failed = self.evict(&id);
                (id, failed)
            })
            .collect()
    }

    /// Evicts every tunnel already in the `Dead` state (e.g. ones
    /// whose socket read loop observed a fatal codec error or a
    /// close frame directly, bypassing the keepalive check above).
    pub fn evict_dead(&self) -> Vec<(ConnectionId, Vec<Uuid>)> {
        let dead: Vec<ConnectionId> = {
            let connections = self.connections.read().unwrap();
            connections
                .values()
                .filter(|c| c.state() == TunnelState::Dead)
                .map(|c| c.id)
                .collect()
        };
        dead.into_iter()
            .map(|id| {
                let failed = self.evict(&id);
                (id, failed)
            })
            .collect()
    }
}

/// Runs the periodic dead-tunnel sweeper (default every 60s): evicts
/// tunnels that are either keepalive-timed-out or already marked dead.
/// Reassembly buffers live with each tunnel's own reader task, not
/// here — the session loop driving that task is responsible for
/// ticking its own `anpx_wire::Decoder::sweep_idle_reassembly`.
pub async fn run_sweeper<F>(registry: Arc<TunnelRegistry>, interval: Duration, mut on_evicted: F)
where
    F: FnMut(ConnectionId, Vec<Uuid>) + Send,
{
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let now = Instant::now();
        for (id, failed) in registry.sweep_dead(now) {
            on_evicted(id, failed);
        }
        for (id, failed) in registry.evict_dead() {
            on_evicted(id, failed);
        }
    }
}
