//! Control plane integration.
//!
//! # Data Flow
//! ```text
//! GET  {base}/{version}/loadbalancerservices/{lb}                  → existing config
//! PUT  {base}/{version}/projects/{project}/loadbalancerservices/{lb} ← merged config
//! ```
//!
//! # Design Decisions
//! - Credentials are passed through as HTTP basic auth, never inspected
//! - One attempt per call; failures surface to the caller immediately
//! - Bodies stay untyped JSON so unknown metadata round-trips untouched

pub mod client;

pub use client::{ControlPlaneClient, ControlPlaneError, ControlPlaneResult};
