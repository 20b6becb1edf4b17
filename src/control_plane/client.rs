//! Control plane REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Fetch a load balancer service definition
//! - Submit an updated definition
//! - Bound every call with a timeout; no retries

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::ControlPlaneConfig;
use crate::observability::metrics;

/// Errors that can occur while talking to the control plane.
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    /// Connection or protocol failure.
    #[error("Control plane request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Call did not finish in time.
    #[error("Control plane timeout after {0} seconds")]
    Timeout(u64),

    /// Non-success status code.
    #[error("Control plane returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON.
    #[error("Invalid control plane response: {0}")]
    InvalidResponse(String),

    /// Client could not be constructed.
    #[error("Invalid control plane settings: {0}")]
    Config(String),
}

/// Result type for control plane operations.
pub type ControlPlaneResult<T> = Result<T, ControlPlaneError>;

/// Client for the load balancer endpoints of the control plane.
#[derive(Clone)]
pub struct ControlPlaneClient {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
    project_id: String,
    access_key: String,
    secret_key: String,
    timeout_duration: Duration,
}

impl ControlPlaneClient {
    /// Create a new client from validated settings.
    pub fn new(config: &ControlPlaneConfig) -> ControlPlaneResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ControlPlaneError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            project_id: config.project_id.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            timeout_duration: Duration::from_secs(config.request_timeout_secs),
        })
    }

    pub fn load_balancer_url(&self, lb_id: &str) -> String {
        format!("{}/{}/loadbalancerservices/{}", self.base_url, self.api_version, lb_id)
    }

    pub fn project_load_balancer_url(&self, lb_id: &str) -> String {
        format!(
            "{}/{}/projects/{}/loadbalancerservices/{}",
            self.base_url, self.api_version, self.project_id, lb_id
        )
    }

    /// Get the current definition of a load balancer service.
    pub async fn fetch_load_balancer(&self, lb_id: &str) -> ControlPlaneResult<Value> {
        let url = self.load_balancer_url(lb_id);
        tracing::debug!(url = %url, "Fetching load balancer");

        let request = self.authorize(self.http.get(&url));
        self.send("fetch", request).await
    }

    /// Replace the definition of a load balancer service.
    pub async fn update_load_balancer(&self, lb_id: &str, payload: &Value) -> ControlPlaneResult<Value> {
        let url = self.project_load_balancer_url(lb_id);
        tracing::debug!(url = %url, "Submitting load balancer");

        let request = self.authorize(self.http.put(&url).json(payload));
        let response = self.send("update", request).await?;

        match response.get("id") {
            Some(id) => tracing::info!(lb_id = %lb_id, resource_id = %id, "Load balancer updated"),
            None => tracing::warn!(lb_id = %lb_id, "Update response carried no id"),
        }
        Ok(response)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.access_key.is_empty() {
            request
        } else {
            request.basic_auth(&self.access_key, Some(&self.secret_key))
        }
    }

    async fn send(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ControlPlaneResult<Value> {
        match timeout(self.timeout_duration, execute(operation, request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, "Control plane call timed out");
                Err(ControlPlaneError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

async fn execute(
    operation: &'static str,
    request: reqwest::RequestBuilder,
) -> ControlPlaneResult<Value> {
    let response = request.send().await?;
    let status = response.status();
    metrics::record_control_plane_call(operation, status.as_u16());

    let body = response.text().await?;
    if !status.is_success() {
        return Err(ControlPlaneError::Status {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| ControlPlaneError::InvalidResponse(e.to_string()))
}
