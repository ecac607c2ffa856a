//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoint URLs and the contract address
//! - Validate value ranges (intervals > 0, cap > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MintConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::MintConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &MintConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(rpc_url) = &config.wallet.rpc_url {
        if let Err(e) = rpc_url.parse::<url::Url>() {
            errors.push(ValidationError::new("wallet.rpc_url", format!("invalid URL '{}': {}", rpc_url, e)));
        }
    }
    for failover in &config.wallet.failover_urls {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new("wallet.failover_urls", format!("invalid URL '{}'", failover)));
        }
    }
    if config.wallet.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("wallet.rpc_timeout_secs", "must be greater than 0"));
    }

    if config.contract.address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "contract.address",
            format!("'{}' is not a 20-byte hex address", config.contract.address),
        ));
    }
    if config.contract.total_mint_count == 0 {
        errors.push(ValidationError::new("contract.total_mint_count", "must be greater than 0"));
    }
    if config.contract.poll_interval_ms == 0 {
        errors.push(ValidationError::new("contract.poll_interval_ms", "must be greater than 0"));
    }
    if !config.contract.marketplace_url.is_empty()
        && config.contract.marketplace_url.parse::<url::Url>().is_err()
    {
        errors.push(ValidationError::new("contract.marketplace_url", "invalid URL"));
    }

    if config.ui.tick_ms == 0 {
        errors.push(ValidationError::new("ui.tick_ms", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
