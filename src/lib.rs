//! Load balancer rule updater library.

pub mod config;
pub mod control_plane;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod reconcile;

pub use config::schema::UpdaterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use reconcile::{merge, reconcile, sanitize_port_rules, MergeConflict};
