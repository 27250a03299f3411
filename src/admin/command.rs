//! Pool-management command parsing.

use axum::http::Method;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("method `{0}` is not supported for pool management")]
    UnsupportedMethod(Method),

    #[error("invalid pool management payload: {0}")]
    InvalidPayload(String),
}

/// The closed set of pool-management operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolCommand {
    /// Read the pool snapshot.
    Get,
    /// Append one URL to the rotation.
    Add { url: String },
    /// Remove one URL from the rotation.
    Remove { url: String },
    /// Replace the whole rotation.
    Replace { urls: Vec<String> },
}

#[derive(Deserialize)]
struct UrlPayload {
    url: String,
}

#[derive(Deserialize)]
struct UrlsPayload {
    urls: Vec<String>,
}

impl PoolCommand {
    /// Parse an inbound method and JSON body into a command, rejecting
    /// anything outside the closed set before any mutation happens.
    pub fn parse(method: &Method, body: &[u8]) -> Result<Self, CommandError> {
        match method.as_str() {
            "GET" => Ok(PoolCommand::Get),
            "POST" => {
                let payload: UrlPayload = serde_json::from_slice(body)
                    .map_err(|e| CommandError::InvalidPayload(e.to_string()))?;
                validate_url(&payload.url)?;
                Ok(PoolCommand::Add { url: payload.url })
            }
            "DELETE" => {
                let payload: UrlPayload = serde_json::from_slice(body)
                    .map_err(|e| CommandError::InvalidPayload(e.to_string()))?;
                Ok(PoolCommand::Remove { url: payload.url })
            }
            "PUT" => {
                let payload: UrlsPayload = serde_json::from_slice(body)
                    .map_err(|e| CommandError::InvalidPayload(e.to_string()))?;
                for url in &payload.urls {
                    validate_url(url)?;
                }
                Ok(PoolCommand::Replace { urls: payload.urls })
            }
            _ => Err(CommandError::UnsupportedMethod(method.clone())),
        }
    }
}

fn validate_url(url: &str) -> Result<(), CommandError> {
    let parsed = Url::parse(url)
        .map_err(|e| CommandError::InvalidPayload(format!("`{url}` is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(CommandError::InvalidPayload(format!(
            "`{url}` has unsupported scheme `{scheme}`"
        ))),
    }
}
