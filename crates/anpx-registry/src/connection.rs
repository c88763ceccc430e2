use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Instant;
use uuid::Uuid;

pub type ConnectionId = Uuid;

/// The admission lifecycle of one tunnel:
/// `handshaking → authenticating → healthy → draining → dead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelState {
    Handshaking,
    Authenticating,
    Healthy,
    Draining,
    Dead,
}

/// The simplified three-way health view assigned to a tunnel
/// connection: `healthy | draining | dead`. `Handshaking` and
/// `Authenticating` tunnels are not yet routable, so they map to
/// `None` here rather than a fourth health value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    Draining,
    Dead,
}

impl TunnelState {
    pub fn health(self) -> Option<HealthState> {
        match self {
            TunnelState::Healthy => Some(HealthState::Healthy),
            TunnelState::Draining => Some(HealthState::Draining),
            TunnelState::Dead => Some(HealthState::Dead),
            TunnelState::Handshaking | TunnelState::Authenticating => None,
        }
    }
}

/// A single authenticated WebSocket tunnel between gateway and
/// receiver. Owned by the
/// [`crate::registry::TunnelRegistry`]; its lifetime ends when the
/// socket closes or the registry evicts it, at which point every
/// pending request in `pending` must fail with "tunnel lost".
pub struct TunnelConnection {
    pub id: ConnectionId,
    pub did: String,
    pub service_urls: Vec<String>,
    pub max_pending: usize,
    pub created_at: Instant,
    state: Mutex<TunnelState>,
    last_pong: Mutex<Instant>,
    pending: RwLock<HashSet<Uuid>>,
    send_seq: AtomicU64,
}

impl TunnelConnection {
    pub fn new(id: ConnectionId, did: String, service_urls: Vec<String>, max_pending: usize) -> Self {
        let now = Instant::now();
        Self {
            id,
            did,
            service_urls,
            max_pending,
            created_at: now,
            state: Mutex::new(TunnelState::Handshaking),
            last_pong: Mutex::new(now),
            pending: RwLock::new(HashSet::new()),
            send_seq: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> TunnelState {
        *self.state.lock().unwrap()
    }

    pub fn set_state(&self, state: TunnelState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn health(&self) -> Option<HealthState> {
        self.state().health()
    }

    pub fn touch_pong(&self) {
        *self.last_pong.lock().unwrap() = Instant::now();
    }

    pub fn last_pong(&self) -> Instant {
        *self.last_pong.lock().unwrap()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.read().unwrap().len()
    }

    pub fn next_send_seq(&self) -> u64 {
        self.send_seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Atomically checks the per-tunnel capacity and reserves a slot
    /// for `request_id` in one operation, so a tunnel observed at
    /// capacity `k` by two concurrent selections can never be pushed
    /// past `max_pending`. Selection and the subsequent pending-slot
    /// registration must be atomic with respect to that tunnel's
    /// counter.
    pub fn try_reserve(&self, request_id: Uuid) -> bool {
        let mut pending = self.pending.write().unwrap();
        if pending.len() >= self.max_pending {
            return false;
        }
        pending.insert(request_id)
    }

    pub fn release(&self, request_id: &Uuid) -> bool {
        self.pending.write().unwrap().remove(request_id)
    }

    /// Drains and returns every request_id pending on this tunnel.
    /// Called when a tunnel transitions to `dead` so the caller can
    /// fail each one with "tunnel lost".
    pub fn take_all_pending(&self) -> Vec<Uuid> {
        self.pending.write().unwrap().drain().collect()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.pending.read().unwrap().len() >= self.max_pending
    }
}
