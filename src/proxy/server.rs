//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum router (health-check path, pool-management path,
//!   proxy-everything fallback)
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Construct the shared subsystems (store client, probe, selector,
//!   forwarder, alert throttle) into `AppState`
//! - Serve with graceful shutdown

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestId, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::admin::handlers::pool_handler;
use crate::alert::{AlertThrottle, LogNotifier};
use crate::config::ProxyConfig;
use crate::health::HttpProbe;
use crate::pool::Pool;
use crate::proxy::forwarder::{ForwardError, Forwarder};
use crate::selector::{BackendSelector, SelectError};
use crate::store::PoolStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PoolStore>,
    pub selector: Arc<BackendSelector>,
    pub forwarder: Arc<Forwarder>,
    pub alerts: Arc<AlertThrottle>,
    /// Static pool served to reads while the store is down.
    pub fallback: Pool,
    pub pool_name: String,
}

/// Tags each request with a UUID v4 `x-request-id`.
#[derive(Clone, Default)]
struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The reverse-proxy HTTP server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Assemble all subsystems from configuration.
    pub fn new(config: ProxyConfig, store: Arc<dyn PoolStore>) -> Self {
        let client: Client<HttpConnector, Body> =
            Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let alerts = Arc::new(AlertThrottle::new(
            config.alerts.cooldown(),
            &config.alerts.recipient,
            Arc::new(LogNotifier),
        ));

        let probe = Arc::new(HttpProbe::new(
            client.clone(),
            &config.health_check.route,
            config.health_check.timeout(),
        ));

        let fallback = config.pool.seed_pool(config.health_check.min_interval());

        let selector = Arc::new(BackendSelector::new(
            store.clone(),
            probe,
            alerts.clone(),
            &config.pool.name,
            fallback.clone(),
        ));

        let forwarder = Arc::new(Forwarder::new(
            client,
            Duration::from_secs(config.timeouts.request_secs),
        ));

        let state = AppState {
            store,
            selector,
            forwarder,
            alerts,
            fallback,
            pool_name: config.pool.name.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.admin.health_path, any(health_handler))
            .route(&config.admin.pool_path, any(pool_handler))
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(SetRequestIdLayer::x_request_id(MakeUuidRequestId))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until a shutdown signal arrives; in-flight requests
    /// drain before the future resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Health-check path: answers immediately, bypassing the pool.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "pool-proxy is healthy")
}

/// Main proxy handler: select a backend, forward, relay the response.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "proxying request"
    );

    let target_base = match state.selector.select().await {
        Ok(url) => url,
        Err(err) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %err,
                "backend selection failed"
            );
            let status = match err {
                SelectError::PoolEmpty(_) | SelectError::NoHealthyBackend(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            };
            return (status, err.to_string()).into_response();
        }
    };

    match state.forwarder.forward(request, &target_base).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                backend = %target_base,
                error = %err,
                "forwarding failed"
            );
            let status = match err {
                ForwardError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                ForwardError::Transport { .. } | ForwardError::InvalidTarget(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            (status, "upstream request failed").into_response()
        }
    }
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        // Without a signal handler the server would be unstoppable; park
        // this future instead so the shutdown channel stays usable.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
