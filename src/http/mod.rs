//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! GET /{service_id}
//!     → request.rs (assign / propagate request ID)
//!     → server.rs (fetch existing config from the control plane)
//!     → [reconcile engine sanitizes and merges]
//!     → server.rs (submit merged config)
//!     → response.rs (endpoint body or mapped error)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::UpdateError;
pub use server::{AppState, HttpServer};
