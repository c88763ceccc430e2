use std::str::FromStr;

use indexmap::IndexMap;
use trillium_client::{Client, Connector, KnownHeaderName, Method};

use crate::error::Error;

/// One reassembled HTTP request, handed whole to a [`LocalApplication`].
/// The request body is fully buffered before dispatch; no chunk
/// streaming into the application.
#[derive(Debug, Clone)]
pub struct LocalRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: IndexMap<String, String>,
    pub body: Vec<u8>,
}

/// The response a [`LocalApplication`] hands back.
#[derive(Debug, Clone)]
pub struct LocalResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: IndexMap<String, String>,
    pub body: Vec<u8>,
}

/// The abstract capability a local application exposes:
/// `accept(method, path, headers, body) -> (status, reason, headers,
/// body)`, expressed as a trait so the dispatcher depends only on this
/// interface and never on a concrete transport.
#[async_trait::async_trait]
pub trait LocalApplication: Send + Sync + 'static {
    async fn accept(&self, request: LocalRequest) -> LocalResponse;
}

/// The concrete [`LocalApplication`] most receiver deployments use: a
/// plain HTTP server on `localhost` (or any other private address)
/// reached via `trillium_client`.
pub struct HttpForwardApplication<C: Connector> {
    client: Client<C>,
    base_url: String,
}

impl<C: Connector> HttpForwardApplication<C> {
    pub fn new(client: Client<C>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl<C: Connector> LocalApplication for HttpForwardApplication<C> {
    async fn accept(&self, request: LocalRequest) -> LocalResponse {
        let method = Method::from_str(&request.method).unwrap_or(Method::Get);
        let mut url = format!("{}{}", self.base_url, request.path);
        if !request.query.is_empty() {
            url.push('?');
            url.push_str(&request.query);
        }

        let mut conn = self.client.conn(method, url);
        for (name, value) in &request.headers {
            conn = conn.with_request_header(name.clone(), value.clone());
        }
        if !request.body.is_empty() {
            conn = conn.with_request_body(request.body);
        }

        match conn.await {
            Ok(mut conn) => {
                let status = conn.status().map(|s| s as u16).unwrap_or(502);
                let headers = conn
                    .response_headers()
                    .iter()
                    .map(|(name, values)| {
                        let joined = values
                            .iter()
                            .filter_map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", ");
                        (name.to_string(), joined)
                    })
                    .filter(|(name, _)| {
                        !matches!(
                            KnownHeaderName::from_str(name).ok(),
                            Some(KnownHeaderName::Connection)
                                | Some(KnownHeaderName::TransferEncoding)
                        )
                    })
                    .collect();
                let body = conn.response_body().read_bytes().await.unwrap_or_default();
                LocalResponse {
                    status,
                    reason: None,
                    headers,
                    body,
                }
            }
            Err(err) => LocalResponse {
                status: 502,
                reason: Some(format!("local application unreachable: {err}")),
                headers: IndexMap::new(),
                body: Vec::new(),
            },
        }
    }
}
