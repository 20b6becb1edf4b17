//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the updater.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the load balancer updater.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Control plane endpoint, credentials and target load balancer.
    pub control_plane: ControlPlaneConfig,

    /// Settings every new port rule is built from.
    pub rule: RuleConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:80").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:80".to_string(),
        }
    }
}

/// Control plane API settings.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ControlPlaneConfig {
    /// Base URL of the API (e.g., "https://rancher.example.com").
    pub base_url: String,

    /// API version path segment.
    pub api_version: String,

    /// Basic auth user.
    pub access_key: String,

    /// Basic auth password.
    pub secret_key: String,

    /// Project (environment) owning the load balancer.
    pub project_id: String,

    /// Load balancer service to update.
    pub load_balancer_id: String,

    /// Per-call timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_version: "v2-beta".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            project_id: String::new(),
            load_balancer_id: String::new(),
            request_timeout_secs: 10,
        }
    }
}

// Keeps the secret out of logs.
impl std::fmt::Debug for ControlPlaneConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPlaneConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("load_balancer_id", &self.load_balancer_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Settings for the port rule added per request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    /// Rule protocol (e.g., "http").
    pub protocol: String,

    /// Rule type as the control plane names it.
    pub rule_type: String,

    /// First hostname label component, usually the CI project path slug.
    pub project_slug: String,

    /// Second hostname label component, usually the CI environment slug.
    pub environment_slug: String,

    /// Domain appended to the hostname.
    pub domain: String,

    /// Public port of the rule (`sourcePort`).
    pub external_port: u16,

    /// Container port of the rule (`targetPort`).
    pub internal_port: u16,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            rule_type: "portRule".to_string(),
            project_slug: String::new(),
            environment_slug: "rlbu-url-not-set".to_string(),
            domain: String::new(),
            external_port: 80,
            internal_port: 80,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for fetch, reconcile and submit) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
