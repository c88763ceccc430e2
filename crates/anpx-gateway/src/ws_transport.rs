use async_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use async_tungstenite::tungstenite::protocol::CloseFrame;
use async_tungstenite::tungstenite::Message;
use futures_util::StreamExt;
use std::borrow::Cow;
use trillium::KnownHeaderName;
use trillium_websockets::WebSocketConn;

use crate::tunnel_io::{SocketEvent, TunnelSocket};

/// Adapts a [`WebSocketConn`] (trillium's post-upgrade websocket
/// handle) to the transport-agnostic [`TunnelSocket`] trait
/// [`crate::tunnel_io::run_tunnel_session`] drives. Only binary
/// messages carry ANPX frames; ping/pong traffic is reported as
/// keep-alive activity, and anything else is ignored rather than
/// treated as a protocol error.
#[async_trait::async_trait]
impl TunnelSocket for WebSocketConn {
    async fn recv(&mut self) -> SocketEvent {
        loop {
            match self.next().await {
                Some(Ok(Message::Binary(bytes))) => return SocketEvent::Frame(bytes),
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                    return SocketEvent::KeepAlive
                }
                Some(Ok(Message::Close(_))) | None => return SocketEvent::Closed,
                Some(Ok(_)) => continue,
                Some(Err(_)) => return SocketEvent::Closed,
            }
        }
    }

    async fn send(&mut self, bytes: Vec<u8>) -> bool {
        WebSocketConn::send(self, Message::Binary(bytes)).await.is_ok()
    }

    async fn send_ping(&mut self) -> bool {
        WebSocketConn::send(self, Message::Ping(Vec::new())).await.is_ok()
    }
}

/// Extracts the `Authorization` header value from a pre-upgrade
/// request, as required for DID-WBA admission.
pub fn authorization_header(conn: &WebSocketConn) -> Option<&str> {
    conn.headers().get_str(KnownHeaderName::Authorization)
}

/// The effective domain a DID-WBA signature must be bound to: the
/// `Host` header of the upgrade request.
pub fn request_domain(conn: &WebSocketConn) -> Option<&str> {
    conn.headers().get_str(KnownHeaderName::Host)
}

/// Closes the socket with a specific close code, something
/// [`WebSocketConn::close`] does not expose directly.
pub async fn close_with_code(conn: &mut WebSocketConn, code: u16, reason: &'static str) {
    let _ = WebSocketConn::send(
        conn,
        Message::Close(Some(CloseFrame {
            code: CloseCode::Library(code),
            reason: Cow::Borrowed(reason),
        })),
    )
    .await;
}
