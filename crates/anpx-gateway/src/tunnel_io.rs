use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anpx_registry::{ConnectionId, TunnelRegistry};
use anpx_wire::{Decoder, LogicalFrameKind};
use log::{info, warn};
use tokio::sync::mpsc;

use crate::correlator::{Correlator, FailureKind};
use crate::error::Error;

const WRITE_QUEUE_CAPACITY: usize = 256;

/// What a tunnel socket's read half produced on one poll.
pub enum SocketEvent {
    /// A binary message, presumed to carry an ANPX wire frame.
    Frame(Vec<u8>),
    /// A ping or pong was observed; counts as keep-alive activity but
    /// carries no ANPX payload.
    KeepAlive,
    /// The connection closed or errored.
    Closed,
}

/// One half of a tunnel's duplex byte stream, abstracted away from the
/// concrete WebSocket library so [`run_tunnel_session`] stays testable
/// without a live socket.
#[async_trait::async_trait]
pub trait TunnelSocket: Send {
    async fn recv(&mut self) -> SocketEvent;
    async fn send(&mut self, bytes: Vec<u8>) -> bool;
    /// Sends a keep-alive ping. Sockets that have no notion of a
    /// protocol-level ping (e.g. tests) can leave this a no-op.
    async fn send_ping(&mut self) -> bool {
        true
    }
}

/// Per-connection outbound write queues. When a tunnel's queue is
/// full, the router treats that tunnel as at capacity. Kept separate
/// from [`TunnelRegistry`] because it is a transport-layer concern the
/// registry crate does not know about.
#[derive(Default)]
pub struct TunnelWriters {
    senders: RwLock<HashMap<ConnectionId, mpsc::Sender<Vec<u8>>>>,
}

impl TunnelWriters {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, id: ConnectionId) -> mpsc::Receiver<Vec<u8>> {
        let (tx, rx) = mpsc::channel(WRITE_QUEUE_CAPACITY);
        self.senders.write().unwrap().insert(id, tx);
        rx
    }

    pub fn unregister(&self, id: ConnectionId) {
        self.senders.write().unwrap().remove(&id);
    }

    /// Enqueues a wire frame for `id`. Fails with [`Error::NoCapacity`]
    /// if the tunnel's write queue is full or the tunnel is unknown.
    pub fn send(&self, id: ConnectionId, frame: Vec<u8>) -> Result<(), Error> {
        let sender = {
            let senders = self.senders.read().unwrap();
            senders.get(&id).cloned()
        };
        match sender {
            Some(sender) => sender
                .try_send(frame)
                .map_err(|_| Error::NoCapacity),
            None => Err(Error::TunnelLost(format!("no writer for connection {id}"))),
        }
    }
}

/// Runs a single tunnel's reader/writer loop until the socket closes.
/// One task selects between inbound frames, the outbound queue, a
/// keep-alive ping ticker, and a reassembly-sweep ticker; folding all
/// four into one task preserves the single-writer-serializes ordering
/// guarantee, since only this task ever calls `socket.send`.
///
/// On exit, evicts the connection from the registry (failing every
/// pending slot with `TunnelLost`) and removes its writer queue.
pub async fn run_tunnel_session(
    connection_id: ConnectionId,
    mut socket: impl TunnelSocket,
    registry: Arc<TunnelRegistry>,
    writers: Arc<TunnelWriters>,
    correlator: Arc<Correlator>,
    idle_ttl: Duration,
    keepalive_interval: Duration,
) {
    let mut decoder = Decoder::new(idle_ttl);
    let mut outbound = writers.register(connection_id);
    let mut ping_ticker = tokio::time::interval(keepalive_interval);
    ping_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut sweep_ticker = tokio::time::interval(idle_ttl.max(Duration::from_secs(1)));
    sweep_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    if let Some(connection) = registry.get(&connection_id) {
        connection.touch_pong();
    }

    loop {
        tokio::select! {
            biased;
            event = socket.recv() => {
                match event {
                    SocketEvent::Frame(bytes) => {
                        if let Some(connection) = registry.get(&connection_id) {
                            connection.touch_pong();
                        }
                        if !handle_inbound_frame(&bytes, &mut decoder, &registry, &correlator, connection_id).await {
                            break;
                        }
                    }
                    SocketEvent::KeepAlive => {
                        if let Some(connection) = registry.get(&connection_id) {
                            connection.touch_pong();
                        }
                    }
                    SocketEvent::Closed => break,
                }
            }
            outgoing = outbound.recv() => {
                match outgoing {
                    Some(bytes) => {
                        if !socket.send(bytes).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = ping_ticker.tick() => {
                if !socket.send_ping().await {
                    break;
                }
            }
            _ = sweep_ticker.tick() => {
                for request_id in decoder.sweep_idle_reassembly() {
                    correlator.fail(request_id, FailureKind::ReassemblyTimeout);
                }
            }
        }
    }

    writers.unregister(connection_id);
    let failed_requests = registry.evict(&connection_id);
    let failed_count = failed_requests.len();
    for request_id in failed_requests {
        correlator.fail(request_id, FailureKind::TunnelLost);
    }
    info!("tunnel connection_id={connection_id} closed, {failed_count} requests failed");
}

/// Decodes one inbound wire frame and, once a logical frame is fully
/// reassembled, routes it to the correlator. Returns `false` if the
/// error is fatal to the tunnel.
async fn handle_inbound_frame(
    bytes: &[u8],
    decoder: &mut Decoder,
    registry: &Arc<TunnelRegistry>,
    correlator: &Arc<Correlator>,
    connection_id: ConnectionId,
) -> bool {
    let logical = match decoder.decode_frame(bytes) {
        Ok(logical) => logical,
        Err(err) => {
            if err.is_fatal_to_tunnel() {
                warn!("tunnel connection_id={connection_id} fatal decode error: {err}");
                return false;
            }
            warn!("tunnel connection_id={connection_id} request-scoped decode error: {err}");
            return true;
        }
    };

    let Some(frame) = logical else {
        return true;
    };

    if let Some(connection) = registry.get(&connection_id) {
        connection.release(&frame.request_id);
    }

    match frame.kind {
        LogicalFrameKind::Response(meta) => {
            correlator.complete(frame.request_id, meta, frame.body.unwrap_or_default());
        }
        LogicalFrameKind::Error => {
            correlator.fail(frame.request_id, FailureKind::TunnelLost);
        }
        LogicalFrameKind::Request(_) => {
            warn!(
                "tunnel connection_id={connection_id} sent a request frame on the gateway side; ignoring"
            );
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    struct FakeSocket {
        inbound: std::collections::VecDeque<Vec<u8>>,
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    #[async_trait::async_trait]
    impl TunnelSocket for FakeSocket {
        async fn recv(&mut self) -> SocketEvent {
            match self.inbound.pop_front() {
                Some(bytes) => SocketEvent::Frame(bytes),
                None => SocketEvent::Closed,
            }
        }

        async fn send(&mut self, bytes: Vec<u8>) -> bool {
            self.sent.lock().unwrap().push(bytes);
            true
        }
    }

    fn response_wire_frame(request_id: Uuid, status: u16) -> Vec<u8> {
        let frame = anpx_wire::LogicalFrame::response(
            request_id,
            anpx_wire::RespMeta {
                status,
                reason: None,
                headers: Default::default(),
            },
            Some(b"ok".to_vec()),
        );
        let mut frames = anpx_wire::encode(&frame, anpx_wire::DEFAULT_CHUNK_SIZE).unwrap();
        frames.remove(0)
    }

    #[tokio::test]
    async fn inbound_response_frame_completes_the_correlator_slot() {
        let registry = Arc::new(TunnelRegistry::new(100, Duration::from_secs(120)));
        let writers = Arc::new(TunnelWriters::new());
        let correlator = Arc::new(Correlator::new());

        let connection = Arc::new(anpx_registry::TunnelConnection::new(
            Uuid::new_v4(),
            "did:web:example.test".to_string(),
            vec!["api.example.test".to_string()],
            100,
        ));
        let connection_id = connection.id;
        registry.admit(connection.clone());
        let request_id = Uuid::new_v4();
        connection.try_reserve(request_id);

        let rx = correlator
            .register(request_id, Duration::from_secs(5))
            .unwrap();

        let wire_frame = response_wire_frame(request_id, 200);
        let socket = FakeSocket {
            inbound: std::collections::VecDeque::from(vec![wire_frame]),
            sent: Arc::new(Mutex::new(Vec::new())),
        };

        run_tunnel_session(
            connection_id,
            socket,
            registry.clone(),
            writers,
            correlator.clone(),
            Duration::from_secs(300),
            Duration::from_secs(10),
        )
        .await;

        let outcome = rx.await.unwrap();
        match outcome {
            crate::correlator::Outcome::Response { meta, body } => {
                assert_eq!(meta.status, 200);
                assert_eq!(body, b"ok");
            }
            crate::correlator::Outcome::Failed(_) => panic!("expected a response"),
        }
        assert!(registry.get(&connection_id).is_none());
    }

    #[tokio::test]
    async fn socket_close_evicts_the_tunnel_and_fails_pending_requests() {
        let registry = Arc::new(TunnelRegistry::new(100, Duration::from_secs(120)));
        let writers = Arc::new(TunnelWriters::new());
        let correlator = Arc::new(Correlator::new());

        let connection = Arc::new(anpx_registry::TunnelConnection::new(
            Uuid::new_v4(),
            "did:web:example.test".to_string(),
            vec!["api.example.test".to_string()],
            100,
        ));
        let connection_id = connection.id;
        registry.admit(connection.clone());
        let request_id = Uuid::new_v4();
        connection.try_reserve(request_id);

        let rx = correlator
            .register(request_id, Duration::from_secs(5))
            .unwrap();

        let socket = FakeSocket {
            inbound: std::collections::VecDeque::new(),
            sent: Arc::new(Mutex::new(Vec::new())),
        };

        run_tunnel_session(
            connection_id,
            socket,
            registry.clone(),
            writers,
            correlator.clone(),
            Duration::from_secs(300),
            Duration::from_secs(10),
        )
        .await;

        let outcome = rx.await.unwrap();
        assert!(matches!(
            outcome,
            crate::correlator::Outcome::Failed(FailureKind::TunnelLost)
        ));
    }

    #[test]
    fn writer_queue_full_surfaces_as_no_capacity() {
        let writers = TunnelWriters::new();
        let id = Uuid::new_v4();
        let _rx = writers.register(id);
        for _ in 0..WRITE_QUEUE_CAPACITY {
            writers.send(id, vec![0]).unwrap();
        }
        assert!(matches!(writers.send(id, vec![0]), Err(Error::NoCapacity)));
    }
}
