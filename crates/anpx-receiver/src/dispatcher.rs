use std::sync::Arc;

use anpx_wire::{encode, Decoder, LogicalFrame, LogicalFrameKind, RespMeta};
use log::warn;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::local_app::{LocalApplication, LocalRequest};
use crate::tunnel::TunnelSocket;

/// Runs one tunnel's reader/dispatch/writer loop until the socket
/// closes: decode inbound request frames, invoke the local
/// application on a bounded worker pool sized `max_pending`, and write
/// response frames back. Mirrors the single-task reader+writer fold
/// `anpx_gateway::tunnel_io` uses, since only one task may ever call
/// `socket.send` to preserve message ordering on the wire.
pub async fn run_tunnel_session<A: LocalApplication>(
    mut socket: impl TunnelSocket,
    app: Arc<A>,
    max_pending: usize,
    queue_bound: usize,
    chunk_size: usize,
    idle_ttl: std::time::Duration,
) {
    let mut decoder = Decoder::new(idle_ttl);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Vec<u8>>(queue_bound);
    let semaphore = Arc::new(tokio::sync::Semaphore::new(max_pending));
    let mut sweep_ticker = tokio::time::interval(idle_ttl.max(std::time::Duration::from_secs(1)));
    sweep_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            frame = socket.recv() => {
                match frame {
                    Some(bytes) => {
                        if !handle_inbound_frame(
                            &bytes,
                            &mut decoder,
                            &app,
                            &semaphore,
                            chunk_size,
                            outbound_tx.clone(),
                        )
                        .await
                        {
                            break;
                        }
                    }
                    None => break,
                }
            }
            outgoing = outbound_rx.recv() => {
                match outgoing {
                    Some(bytes) => {
                        if !socket.send(bytes).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = sweep_ticker.tick() => {
                for request_id in decoder.sweep_idle_reassembly() {
                    let error_frame = LogicalFrame::error(request_id);
                    if let Ok(wire_frames) = encode(&error_frame, chunk_size) {
                        for wire_frame in wire_frames {
                            let _ = outbound_tx.try_send(wire_frame);
                        }
                    }
                }
            }
        }
    }
}

/// Decodes one inbound wire frame; once a logical request frame is
/// fully reassembled, spawns (or rejects) its dispatch. Returns
/// `false` if the decode error is fatal to the tunnel.
async fn handle_inbound_frame<A: LocalApplication>(
    bytes: &[u8],
    decoder: &mut Decoder,
    app: &Arc<A>,
    semaphore: &Arc<tokio::sync::Semaphore>,
    chunk_size: usize,
    outbound_tx: mpsc::Sender<Vec<u8>>,
) -> bool {
    let logical = match decoder.decode_frame(bytes) {
        Ok(logical) => logical,
        Err(err) => {
            if err.is_fatal_to_tunnel() {
                warn!("fatal decode error: {err}");
                return false;
            }
            warn!("request-scoped decode error: {err}");
            return true;
        }
    };

    let Some(frame) = logical else {
        return true;
    };

    let LogicalFrameKind::Request(meta) = frame.kind else {
        warn!("receiver got a non-request frame; ignoring");
        return true;
    };

    let request_id = frame.request_id;

    // This task is the only reader of both the inbound socket and the
    // outbound queue, so it must never block waiting for a permit: a
    // permit only frees up once a spawned worker finishes sending its
    // response, and that send can itself block on outbound queue
    // capacity that only this task drains. A blocking acquire here
    // would deadlock the two against each other. `try_acquire_owned`
    // keeps the loop live so it can always keep pulling from
    // `outbound_rx`.
    let Ok(permit) = Arc::clone(semaphore).try_acquire_owned() else {
        let error_frame = LogicalFrame::error(request_id);
        if let Ok(wire_frames) = encode(&error_frame, chunk_size) {
            for wire_frame in wire_frames {
                let _ = outbound_tx.try_send(wire_frame);
            }
        }
        return true;
    };

    let app = Arc::clone(app);
    let body = frame.body.unwrap_or_default();
    tokio::spawn(async move {
        let _permit = permit;
        let request = LocalRequest {
            method: meta.method,
            path: meta.path,
            query: meta.query,
            headers: meta.headers,
            body,
        };
        let response = app.accept(request).await;
        let resp_meta = RespMeta {
            status: response.status,
            reason: response.reason,
            headers: response.headers,
        };
        let response_body = if response.body.is_empty() {
            None
        } else {
            Some(response.body)
        };
        let frame = LogicalFrame::response(request_id, resp_meta, response_body);
        match encode(&frame, chunk_size) {
            Ok(wire_frames) => {
                for wire_frame in wire_frames {
                    if outbound_tx.send(wire_frame).await.is_err() {
                        break;
                    }
                }
            }
            Err(err) => {
                warn!("request_id={request_id} failed to encode response: {err}");
            }
        }
    });

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_app::LocalResponse;
    use anpx_wire::HttpMeta;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    struct EchoApp;

    #[async_trait::async_trait]
    impl LocalApplication for EchoApp {
        async fn accept(&self, request: LocalRequest) -> LocalResponse {
            LocalResponse {
                status: 200,
                reason: None,
                headers: Default::default(),
                body: request.body,
            }
        }
    }

    struct FakeSocket {
        inbound: VecDeque<Vec<u8>>,
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    #[async_trait::async_trait]
    impl TunnelSocket for FakeSocket {
        async fn recv(&mut self) -> Option<Vec<u8>> {
            self.inbound.pop_front()
        }

        async fn send(&mut self, bytes: Vec<u8>) -> bool {
            self.sent.lock().unwrap().push(bytes);
            true
        }
    }

    #[tokio::test]
    async fn dispatches_a_request_and_writes_back_a_response() {
        let request_id = Uuid::new_v4();
        let meta = HttpMeta {
            method: "GET".to_string(),
            path: "/status".to_string(),
            headers: Default::default(),
            query: String::new(),
        };
        let frame = LogicalFrame::request(request_id, meta, Some(b"ping".to_vec()));
        let mut wire_frames = encode(&frame, anpx_wire::DEFAULT_CHUNK_SIZE).unwrap();
        let wire_frame = wire_frames.remove(0);

        let sent = Arc::new(Mutex::new(Vec::new()));
        let socket = FakeSocket {
            inbound: VecDeque::from(vec![wire_frame]),
            sent: sent.clone(),
        };

        run_tunnel_session(
            socket,
            Arc::new(EchoApp),
            10,
            8,
            anpx_wire::DEFAULT_CHUNK_SIZE,
            Duration::from_secs(300),
        )
        .await;

        // give the spawned dispatch task a moment to enqueue its
        // response before the session loop exits on recv() == None.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
