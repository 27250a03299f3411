//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees. Returns every
//! violation, not just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    BindAddress(String),

    #[error("pool.initial_urls entry `{0}` is not a valid http(s) URL")]
    InitialUrl(String),

    #[error("pool.name must not be empty")]
    PoolName,

    #[error("{0} must start with `/`")]
    PathShape(&'static str),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.pool.name.trim().is_empty() {
        errors.push(ValidationError::PoolName);
    }

    for url in config.pool.initial_url_list() {
        match Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => errors.push(ValidationError::InitialUrl(url)),
        }
    }

    for (path, name) in [
        (&config.health_check.route, "health_check.route"),
        (&config.admin.health_path, "admin.health_path"),
        (&config.admin.pool_path, "admin.pool_path"),
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::PathShape(name));
        }
    }

    for (value, name) in [
        (config.health_check.timeout_secs, "health_check.timeout_secs"),
        (config.timeouts.request_secs, "timeouts.request_secs"),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroDuration(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
