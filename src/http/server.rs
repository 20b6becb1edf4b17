//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the update handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener, stop on shutdown signal
//! - Per request: fetch → reconcile → submit → reply with endpoint

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::UpdaterConfig;
use crate::control_plane::{ControlPlaneClient, ControlPlaneError};
use crate::http::request::{request_id_of, UuidRequestId, X_REQUEST_ID};
use crate::http::response::{endpoint_response, UpdateError};
use crate::observability::metrics;
use crate::reconcile::{reconcile, PortRuleTemplate};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: ControlPlaneClient,
    pub template: Arc<PortRuleTemplate>,
    pub load_balancer_id: Arc<str>,
}

impl AppState {
    pub fn from_config(config: &UpdaterConfig) -> Result<Self, ControlPlaneError> {
        Ok(Self {
            client: ControlPlaneClient::new(&config.control_plane)?,
            template: Arc::new(PortRuleTemplate::from_config(&config.rule)),
            load_balancer_id: Arc::from(config.control_plane.load_balancer_id.as_str()),
        })
    }
}

/// HTTP server for the load balancer updater.
pub struct HttpServer {
    router: Router,
    config: UpdaterConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: UpdaterConfig) -> Result<Self, ControlPlaneError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &UpdaterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{service_id}", get(update_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            load_balancer_id = %self.config.control_plane.load_balancer_id,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Add a port rule routing the configured hostname to `service_id`.
async fn update_handler(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id_of(&headers);

    tracing::debug!(
        request_id = %request_id,
        service_id = %service_id,
        "Updating load balancer"
    );

    match update_load_balancer(&state, &service_id).await {
        Ok(endpoint) => {
            metrics::record_reconciliation("updated", start_time);
            tracing::info!(
                request_id = %request_id,
                service_id = %service_id,
                endpoint = %endpoint,
                "Load balancer rule in place"
            );
            endpoint_response(endpoint)
        }
        Err(e) => {
            metrics::record_reconciliation(e.outcome(), start_time);
            tracing::warn!(
                request_id = %request_id,
                service_id = %service_id,
                error = %e,
                "Load balancer update failed"
            );
            e.into_response()
        }
    }
}

/// One fetch-modify-submit cycle. Returns the public endpoint.
///
/// Concurrent cycles against the same load balancer are not coordinated;
/// the last submit wins.
pub async fn update_load_balancer(state: &AppState, service_id: &str) -> Result<String, UpdateError> {
    let existing = state.client.fetch_load_balancer(&state.load_balancer_id).await?;

    let rule = state.template.for_service(service_id);
    let reconciled = reconcile(existing, &rule)?;
    metrics::record_dropped_rules(reconciled.dropped_rules);
    if reconciled.dropped_rules > 0 {
        tracing::info!(dropped = reconciled.dropped_rules, "Pruned existing port rules");
    }

    state
        .client
        .update_load_balancer(&state.load_balancer_id, &reconciled.config)
        .await?;

    Ok(state.template.endpoint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let mut config = UpdaterConfig::default();
        config.control_plane.base_url = "http://127.0.0.1:9".into();
        config.control_plane.project_id = "1a5".into();
        config.control_plane.load_balancer_id = "1s9".into();
        let state = AppState::from_config(&config).unwrap();
        HttpServer::build_router(&config, state)
    }

    #[tokio::test]
    async fn test_root_is_not_routed() {
        let res = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(res.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_caller_request_id_is_echoed() {
        let request = Request::get("/")
            .header(X_REQUEST_ID, "req-1")
            .body(Body::empty())
            .unwrap();
        let res = router().oneshot(request).await.unwrap();
        assert_eq!(res.headers()[X_REQUEST_ID], "req-1");
    }

    #[test]
    fn test_state_from_config() {
        let mut config = UpdaterConfig::default();
        config.control_plane.load_balancer_id = "1s9".into();
        config.rule.project_slug = "app".into();
        config.rule.domain = "example.com".into();
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(&*state.load_balancer_id, "1s9");
        assert_eq!(state.template.endpoint(), "app-rlbu-url-not-set.example.com:80");
    }
}
