//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route URLs parse and place `**` last
//! - Validate value ranges (timeouts > 0, statuses valid, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::http::server::{BuildError, StaticResponse};
use crate::routing::{Route, RouteError};

/// A single semantic problem in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("routes[{index}]: {source}")]
    InvalidRoute {
        index: usize,
        #[source]
        source: RouteError,
    },

    #[error("{location}: {source}")]
    InvalidResponse {
        location: String,
        #[source]
        source: BuildError,
    },
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(source) = Route::new(&route.method, &route.url, ()) {
            errors.push(ValidationError::InvalidRoute { index, source });
        }
        if let Err(source) = StaticResponse::try_from(&route.response) {
            errors.push(ValidationError::InvalidResponse {
                location: format!("routes[{index}]"),
                source,
            });
        }
    }

    if let Some(not_found) = &config.not_found {
        if let Err(source) = StaticResponse::try_from(not_found) {
            errors.push(ValidationError::InvalidResponse {
                location: "not_found".to_string(),
                source,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
