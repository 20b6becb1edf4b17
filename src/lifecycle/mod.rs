//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Metrics → HTTP server → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then metrics, then listener
//! - In-flight reconciliations finish before exit
//! - The request timeout is validated to outlast fetch plus submit, so a
//!   timeout never fires mid-submit

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
