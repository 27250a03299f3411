//! Request forwarding to a selected backend.

use axum::body::Body;
use axum::http::{Request, Uri};
use axum::response::Response;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use std::time::Duration;
use thiserror::Error;
use tokio::time;

use crate::pool::join_target;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("target `{0}` is not a valid URI")]
    InvalidTarget(String),

    #[error("request to `{url}` failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("request to `{url}` timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
}

/// Relays inbound requests to a backend base URL.
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(client: Client<HttpConnector, Body>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Forward a request to `target_base`, preserving method, path, query,
    /// headers, and body. The backend response is returned verbatim,
    /// whatever its status.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target_base: &str,
    ) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let target = join_target(target_base, path_and_query);

        let uri: Uri = target
            .parse()
            .map_err(|_| ForwardError::InvalidTarget(target.clone()))?;

        let mut builder = Request::builder().method(parts.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            *headers = parts.headers;
        }
        let outbound = builder
            .body(body)
            .map_err(|_| ForwardError::InvalidTarget(target.clone()))?;

        match time::timeout(self.timeout, self.client.request(outbound)).await {
            Ok(Ok(response)) => Ok(response.map(Body::new)),
            Ok(Err(source)) => Err(ForwardError::Transport {
                url: target,
                source,
            }),
            Err(_) => Err(ForwardError::Timeout {
                url: target,
                timeout: self.timeout,
            }),
        }
    }
}
