use std::sync::Arc;
use std::time::Duration;

use anpx_registry::select_and_reserve;
use anpx_wire::{encode, HttpMeta, LogicalFrame};
use indexmap::IndexMap;
use log::warn;
use trillium::{async_trait, Conn, Handler, KnownHeaderName};
use uuid::Uuid;

use crate::correlator::{FailureKind, Outcome};
use crate::error::Error;
use crate::state::GatewayState;

/// Headers stripped before forwarding in either direction (distilled
/// spec §4.4), the same hop-by-hop set `trillium-proxy` strips.
const HOP_BY_HOP: &[KnownHeaderName] = &[
    KnownHeaderName::Connection,
    KnownHeaderName::KeepAlive,
    KnownHeaderName::ProxyAuthenticate,
    KnownHeaderName::ProxyAuthorization,
    KnownHeaderName::Te,
    KnownHeaderName::Trailer,
    KnownHeaderName::TransferEncoding,
    KnownHeaderName::Upgrade,
];

/// The public HTTP ingress handler: maps an inbound request onto an
/// ANPX request frame, selects and reserves a healthy tunnel, enqueues
/// the frame, and waits on the correlator for a response or a terminal
/// failure.
pub struct Ingress {
    state: Arc<GatewayState>,
}

impl Ingress {
    pub fn new(state: Arc<GatewayState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Handler for Ingress {
    async fn run(&self, conn: Conn) -> Conn {
        self.handle(conn).await
    }
}

impl Ingress {
    async fn handle(&self, mut conn: Conn) -> Conn {
        let host = conn
            .inner()
            .host()
            .map(str::to_string)
            .unwrap_or_default();
        let path = conn.path().to_string();
        let query = conn.inner().querystring().to_string();
        let method = conn.method().to_string();
        let headers = forwardable_headers(&conn);

        let body_max_bytes = self.state.config.body_max_bytes as u64;
        let body = match conn.request_body().await.with_max_len(body_max_bytes).read_bytes().await {
            Ok(bytes) => bytes,
            Err(_) => return respond_with_error(conn, Error::PayloadTooLarge),
        };

        let request_id = Uuid::new_v4();
        let connection = match select_and_reserve(&self.state.registry, &host, &path, request_id) {
            Ok(connection) => connection,
            Err(err) => return respond_with_error(conn, Error::from(err)),
        };

        let meta = HttpMeta {
            method,
            path,
            headers,
            query,
        };
        let body = if body.is_empty() { None } else { Some(body) };
        let frame = LogicalFrame::request(request_id, meta, body);

        let wire_frames = match encode(&frame, self.state.config.chunk_size) {
            Ok(frames) => frames,
            Err(err) => {
                connection.release(&request_id);
                return respond_with_error(conn, Error::from(err));
            }
        };

        let connection_id = connection.id;
        let timeout = Duration::from_secs(self.state.config.request_timeout_secs);
        let rx = match self.state.correlator.register(request_id, timeout) {
            Ok(rx) => rx,
            Err(err) => {
                connection.release(&request_id);
                return respond_with_error(conn, err);
            }
        };

        for wire_frame in wire_frames {
            if let Err(err) = self.state.writers.send(connection_id, wire_frame) {
                connection.release(&request_id);
                self.state.correlator.remove(request_id);
                return respond_with_error(conn, err);
            }
        }

        let outcome = tokio::select! {
            outcome = rx => outcome.ok(),
            _ = tokio::time::sleep(timeout) => {
                self.state.correlator.fail(request_id, FailureKind::Timeout);
                None
            }
        };

        match outcome {
            Some(Outcome::Response { meta, body }) => respond_with_upstream(conn, meta, body),
            Some(Outcome::Failed(kind)) => respond_with_error(conn, Error::from(kind)),
            None => {
                warn!("request_id={request_id} correlator channel dropped without resolving");
                respond_with_error(conn, Error::Internal("correlator channel closed".to_string()))
            }
        }
    }
}

fn forwardable_headers(conn: &Conn) -> IndexMap<String, String> {
    let mut headers = IndexMap::new();
    'outer: for (name, values) in conn.request_headers() {
        for hop in HOP_BY_HOP {
            if name == *hop {
                continue 'outer;
            }
        }
        let joined = values
            .iter()
            .filter_map(|value| value.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        headers.insert(name.to_string(), joined);
    }
    headers
}

fn respond_with_upstream(mut conn: Conn, meta: anpx_wire::RespMeta, body: Vec<u8>) -> Conn {
    for (name, value) in &meta.headers {
        let header = trillium::HeaderName::from(name.clone());
        if HOP_BY_HOP.iter().any(|hop| header == *hop) {
            continue;
        }
        conn.response_headers_mut().append(header, value.clone());
    }
    conn.with_status(meta.status).body(body).halt()
}

fn respond_with_error(conn: Conn, err: Error) -> Conn {
    conn.with_status(err.status()).body(err.reason()).halt()
}
