//! Liveness probing of backend candidates.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use std::time::Duration;
use tokio::time;

use crate::pool::join_target;

/// Boolean liveness signal for a backend base URL.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, base_url: &str) -> bool;
}

/// Probes `base_url + route` over HTTP with an explicit timeout.
pub struct HttpProbe {
    client: Client<HttpConnector, Body>,
    route: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(client: Client<HttpConnector, Body>, route: &str, timeout: Duration) -> Self {
        Self {
            client,
            route: route.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, base_url: &str) -> bool {
        let uri = join_target(base_url, &self.route);

        let request = match Request::builder()
            .method(Method::GET)
            .uri(&uri)
            .header("user-agent", "pool-proxy-health-check")
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(url = %uri, error = %e, "failed to build health check request");
                return false;
            }
        };

        match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let success = response.status().is_success();
                if !success {
                    tracing::warn!(
                        url = %uri,
                        status = %response.status(),
                        "health check failed: non-success status"
                    );
                }
                success
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %uri, error = %e, "health check failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(url = %uri, "health check failed: timeout");
                false
            }
        }
    }
}
