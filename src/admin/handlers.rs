//! Pool-management request handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::admin::command::{CommandError, PoolCommand};
use crate::alert::AlertEvent;
use crate::proxy::server::AppState;
use crate::store::StoreError;

/// Admin payloads are small; anything larger is malformed.
const MAX_ADMIN_BODY: usize = 64 * 1024;

/// Entry point for the pool-management path. Parses the command at the
/// boundary, then executes it against the store.
pub async fn pool_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();

    let body = match axum::body::to_bytes(request.into_body(), MAX_ADMIN_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("unreadable pool management payload: {e}"),
            )
                .into_response();
        }
    };

    let command = match PoolCommand::parse(&method, &body) {
        Ok(command) => command,
        Err(err @ CommandError::UnsupportedMethod(_)) => {
            return (StatusCode::METHOD_NOT_ALLOWED, err.to_string()).into_response();
        }
        Err(err @ CommandError::InvalidPayload(_)) => {
            tracing::warn!(method = %method, error = %err, "rejected pool management request");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    execute(&state, command).await
}

async fn execute(state: &AppState, command: PoolCommand) -> Response {
    let pool_name = state.pool_name.as_str();
    match command {
        PoolCommand::Get => match state.store.get(pool_name).await {
            Ok(pool) => Json(pool).into_response(),
            Err(err @ StoreError::Unavailable(_)) => {
                tracing::warn!(
                    pool = %pool_name,
                    error = %err,
                    "pool store unavailable, answering with static fallback pool"
                );
                state
                    .alerts
                    .notify(
                        AlertEvent::StorageDisconnected,
                        "Pool store disconnected",
                        &format!("Pool store unreachable while reading pool `{pool_name}`: {err}"),
                    )
                    .await;
                Json(state.fallback.clone()).into_response()
            }
            Err(err @ StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string()).into_response()
            }
        },
        PoolCommand::Add { url } => {
            reply_with_urls(state.store.add_url(pool_name, &url).await, pool_name)
        }
        PoolCommand::Remove { url } => {
            reply_with_urls(state.store.remove_url(pool_name, &url).await, pool_name)
        }
        PoolCommand::Replace { urls } => {
            reply_with_urls(state.store.replace_urls(pool_name, &urls).await, pool_name)
        }
    }
}

fn reply_with_urls(result: Result<Vec<String>, StoreError>, pool_name: &str) -> Response {
    match result {
        Ok(urls) => Json(urls).into_response(),
        Err(err) => {
            tracing::error!(pool = %pool_name, error = %err, "pool mutation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
