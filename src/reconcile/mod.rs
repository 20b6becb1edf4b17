//! Rule reconciliation engine.
//!
//! # Data Flow
//! ```text
//! fetched load balancer config
//!     → sanitizer.rs (drop unroutable and duplicate portRules)
//!     → merge.rs (deep-merge the new rule, reject conflicts)
//!     → merged config, ready to submit
//!
//! rule.rs builds the incoming rule from settings + target service id
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no process state, no locks
//! - Configuration trees are `serde_json::Value`, matched variant by variant
//! - A conflict aborts the whole pass; nothing partially merged is returned

pub mod merge;
pub mod rule;
pub mod sanitizer;

use serde_json::Value;

pub use merge::{merge, MergeConflict};
pub use rule::{NewPortRule, PortRuleTemplate};
pub use sanitizer::{sanitize_config, sanitize_port_rules, SanitizeOutcome};

/// Merged configuration plus what the sanitizer did to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub config: Value,
    pub dropped_rules: usize,
}

/// Sanitize `existing`, then merge `rule` into it.
pub fn reconcile(mut existing: Value, rule: &NewPortRule) -> Result<Reconciled, MergeConflict> {
    let dropped_rules = sanitize_config(&mut existing);
    let config = merge(existing, rule.as_incoming())?;
    Ok(Reconciled {
        config,
        dropped_rules,
    })
}
