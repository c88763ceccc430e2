use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The logical (type, request_id, meta?, body?) tuple the codec
/// translates to and from wire frames. Callers never see chunks — the
/// chunking decision lives entirely in the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalFrame {
    pub kind: LogicalFrameKind,
    pub request_id: Uuid,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogicalFrameKind {
    Request(HttpMeta),
    Response(RespMeta),
    Error,
}

impl LogicalFrame {
    pub fn request(request_id: Uuid, meta: HttpMeta, body: Option<Vec<u8>>) -> Self {
        Self {
            kind: LogicalFrameKind::Request(meta),
            request_id,
            body,
        }
    }

    pub fn response(request_id: Uuid, meta: RespMeta, body: Option<Vec<u8>>) -> Self {
        Self {
            kind: LogicalFrameKind::Response(meta),
            request_id,
            body,
        }
    }

    pub fn error(request_id: Uuid) -> Self {
        Self {
            kind: LogicalFrameKind::Error,
            request_id,
            body: None,
        }
    }
}

/// The `http_meta` TLV payload (tag `0x02`): `{method,path,headers,query}`.
///
/// `headers` preserves insertion order (an [`IndexMap`]) and holds at
/// most one value per header name: multiple inbound headers of the
/// same name are folded into a single comma-joined value before
/// encoding, for a stable on-the-wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpMeta {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub query: String,
}

/// The `resp_meta` TLV payload (tag `0x04`): `{status,reason}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespMeta {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl RespMeta {
    /// The reason phrase to use if none was carried on the wire: the
    /// reason is optional, and if absent is derived from the status
    /// code.
    pub fn reason_or_default(&self) -> &str {
        self.reason.as_deref().unwrap_or_else(|| {
            canonical_reason_phrase(self.status)
        })
    }
}

fn canonical_reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
