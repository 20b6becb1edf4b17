//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides, read once)
//!     → validation.rs (semantic checks)
//!     → UpdaterConfig (validated, immutable)
//!     → handed explicitly to the client, server and rule template
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The reconciliation engine never reads the environment itself

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::UpdaterConfig;
pub use schema::ListenerConfig;
pub use schema::ControlPlaneConfig;
pub use schema::RuleConfig;
pub use schema::ObservabilityConfig;
