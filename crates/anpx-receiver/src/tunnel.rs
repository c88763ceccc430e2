use futures_util::StreamExt;
use trillium_client::{Client, KnownHeaderName};
use trillium_rustls::{RustlsConfig, RustlsConnector};
use trillium_tokio::TcpConnector;
use trillium_websockets::{Message, WebSocketConn};

use crate::error::Error;

/// The connector this receiver dials out with: plain TCP wrapped in
/// TLS, so both `ws://` and `wss://` tunnel URLs work (the scheme
/// decides, same as `trillium_rustls`'s server-side acceptor).
pub type DialConnector = RustlsConnector<TcpConnector>;

/// One half of a tunnel's duplex byte stream — the receiver-side twin
/// of `anpx_gateway::tunnel_io::TunnelSocket`. Kept as its own trait
/// (rather than a shared dependency on `anpx-gateway`) since the
/// receiver is a separate deployable process with no other reason to
/// depend on the gateway binary's crate.
#[async_trait::async_trait]
pub trait TunnelSocket: Send {
    async fn recv(&mut self) -> Option<Vec<u8>>;
    async fn send(&mut self, bytes: Vec<u8>) -> bool;
}

#[async_trait::async_trait]
impl TunnelSocket for WebSocketConn {
    async fn recv(&mut self) -> Option<Vec<u8>> {
        loop {
            match self.next().await {
                Some(Ok(Message::Binary(bytes))) => return Some(bytes),
                Some(Ok(Message::Close(_))) | None => return None,
                Some(Ok(_)) => continue,
                Some(Err(_)) => return None,
            }
        }
    }

    async fn send(&mut self, bytes: Vec<u8>) -> bool {
        WebSocketConn::send(self, Message::Binary(bytes)).await.is_ok()
    }
}

/// Dials the gateway's tunnel WebSocket endpoint, presenting the
/// configured DID-WBA `Authorization` header.
pub async fn dial(tunnel_url: &str, authorization: &str) -> Result<WebSocketConn, Error> {
    let client = Client::<DialConnector>::new(RustlsConfig::default());
    client
        .get(tunnel_url)
        .with_request_header(KnownHeaderName::Authorization, authorization.to_string())
        .into_websocket()
        .await
        .map_err(|err| Error::Dial(err.to_string()))
}
