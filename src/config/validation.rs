//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the control plane is addressable (URL, ids, credentials)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Request timeout outlasts both control plane calls
//! - Check the derived rule hostname has every component
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: UpdaterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::UpdaterConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
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

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a loaded configuration for semantic problems.
pub fn validate_config(config: &UpdaterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let cp = &config.control_plane;
    match url::Url::parse(&cp.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "control_plane.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "control_plane.base_url",
            format!("'{}' is not a valid URL: {}", cp.base_url, e),
        )),
    }
    for (field, value) in [
        ("control_plane.api_version", &cp.api_version),
        ("control_plane.project_id", &cp.project_id),
        ("control_plane.load_balancer_id", &cp.load_balancer_id),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }
    if cp.access_key.is_empty() != cp.secret_key.is_empty() {
        errors.push(ValidationError::new(
            "control_plane.secret_key",
            "access_key and secret_key must be set together",
        ));
    }
    if cp.request_timeout_secs == 0 {
        errors.push(ValidationError::new("control_plane.request_timeout_secs", "must be > 0"));
    }

    let rule = &config.rule;
    for (field, value) in [
        ("rule.protocol", &rule.protocol),
        ("rule.rule_type", &rule.rule_type),
        ("rule.project_slug", &rule.project_slug),
        ("rule.environment_slug", &rule.environment_slug),
        ("rule.domain", &rule.domain),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }
    if rule.external_port == 0 {
        errors.push(ValidationError::new("rule.external_port", "must be > 0"));
    }
    if rule.internal_port == 0 {
        errors.push(ValidationError::new("rule.internal_port", "must be > 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    } else if config.timeouts.request_secs <= 2 * cp.request_timeout_secs {
        // A request makes two control plane calls; the outer timeout must not
        // fire while the submit is in flight.
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must exceed twice control_plane.request_timeout_secs ({})",
                2 * cp.request_timeout_secs
            ),
        ));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
