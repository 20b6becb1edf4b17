//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use lb_updater::config::UpdaterConfig;
use lb_updater::http::HttpServer;
use lb_updater::lifecycle::Shutdown;

/// What the mock control plane has seen and currently stores.
#[derive(Debug, Default)]
pub struct MockState {
    pub load_balancer: Value,
    pub submitted: Vec<Value>,
    pub authorization: Vec<Option<String>>,
    /// Delay before every fetch is answered.
    pub fetch_delay: Duration,
}

#[derive(Clone)]
pub struct MockControlPlane {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<MockState>>,
}

impl MockControlPlane {
    pub fn submitted(&self) -> Vec<Value> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn authorization(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().authorization.clone()
    }
}

/// Start a control plane serving `load_balancer` as load balancer `1s9` of project `1a5`.
///
/// A submitted definition replaces the stored one, like the real API.
pub async fn start_mock_control_plane(load_balancer: Value) -> MockControlPlane {
    start_slow_control_plane(load_balancer, Duration::ZERO).await
}

/// Like [`start_mock_control_plane`], but every fetch stalls for `fetch_delay`.
pub async fn start_slow_control_plane(load_balancer: Value, fetch_delay: Duration) -> MockControlPlane {
    let state = Arc::new(Mutex::new(MockState {
        load_balancer,
        fetch_delay,
        ..MockState::default()
    }));

    let app = Router::new()
        .route("/v2-beta/loadbalancerservices/{id}", get(fetch))
        .route("/v2-beta/projects/{project}/loadbalancerservices/{id}", put(update))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockControlPlane { addr, state }
}

async fn fetch(
    State(state): State<Arc<Mutex<MockState>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let delay = state.lock().unwrap().fetch_delay;
    tokio::time::sleep(delay).await;

    let mut state = state.lock().unwrap();
    state.authorization.push(authorization(&headers));
    if id != "1s9" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(state.load_balancer.clone()))
}

async fn update(
    State(state): State<Arc<Mutex<MockState>>>,
    Path((project, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().unwrap();
    state.authorization.push(authorization(&headers));
    if project != "1a5" || id != "1s9" {
        return Err(StatusCode::NOT_FOUND);
    }
    state.submitted.push(body.clone());
    state.load_balancer = body;
    Ok(Json(json!({"id": id, "state": "updating-active"})))
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Valid updater settings pointing at `control_plane`.
pub fn updater_config(control_plane: SocketAddr) -> UpdaterConfig {
    let mut config = UpdaterConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.control_plane.base_url = format!("http://{}", control_plane);
    config.control_plane.access_key = "ak".into();
    config.control_plane.secret_key = "sk".into();
    config.control_plane.project_id = "1a5".into();
    config.control_plane.load_balancer_id = "1s9".into();
    config.control_plane.request_timeout_secs = 5;
    config.rule.project_slug = "group-app".into();
    config.rule.environment_slug = "review".into();
    config.rule.domain = "apps.example.com".into();
    config.rule.internal_port = 3000;
    config
}

/// Run an updater on an ephemeral port. Returns its address and shutdown handle.
pub async fn start_updater(config: UpdaterConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
