//! Port rule pruning and deduplication.
//!
//! # Responsibilities
//! - Drop rules that point at nothing (no `serviceId`, no `selector`)
//! - Normalize null-valued optional fields before comparison
//! - Drop rules that duplicate an earlier kept rule
//!
//! # Design Decisions
//! - Never fails: malformed rules are dropped, not rejected
//! - Kept rules are emitted exactly as fetched; normalization only feeds equality
//! - Relative order of kept rules is preserved

use serde_json::{Map, Value};

const SERVICE_ID: &str = "serviceId";
const SELECTOR: &str = "selector";
const PATH: &str = "path";
const BACKEND_NAME: &str = "backendName";
const PRIORITY: &str = "priority";

/// Result of a sanitizing pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizeOutcome {
    /// Kept rules in their original, un-normalized form.
    pub rules: Vec<Value>,
    /// Number of rules removed as unroutable, malformed, or duplicate.
    pub dropped: usize,
}

/// Prune a port rule sequence down to routable, distinct rules.
pub fn sanitize_port_rules(rules: &[Value]) -> SanitizeOutcome {
    let mut seen: Vec<Map<String, Value>> = Vec::with_capacity(rules.len());
    let mut kept = Vec::with_capacity(rules.len());

    for rule in rules {
        let Some(original) = rule.as_object() else {
            tracing::debug!(rule = %rule, "Dropping port rule that is not a mapping");
            continue;
        };

        let routable = is_set(original, SERVICE_ID) || is_set(original, SELECTOR);
        let normalized = normalize(original);

        if !routable {
            tracing::debug!(rule = %rule, "Dropping unroutable port rule");
            continue;
        }
        if seen.contains(&normalized) {
            tracing::debug!(rule = %rule, "Dropping duplicate port rule");
            continue;
        }

        seen.push(normalized);
        kept.push(rule.clone());
    }

    SanitizeOutcome {
        dropped: rules.len() - kept.len(),
        rules: kept,
    }
}

/// Sanitize `lbConfig.portRules` of a fetched configuration in place.
///
/// Leaves the configuration untouched when the rule list is missing or is not
/// a sequence; the merge step reports the latter as a conflict.
/// Returns the number of dropped rules.
pub fn sanitize_config(config: &mut Value) -> usize {
    let Some(Value::Array(rules)) = config
        .get_mut("lbConfig")
        .and_then(|lb| lb.get_mut("portRules"))
    else {
        return 0;
    };

    let outcome = sanitize_port_rules(rules);
    *rules = outcome.rules;
    outcome.dropped
}

/// Present and not null.
fn is_set(rule: &Map<String, Value>, key: &str) -> bool {
    rule.get(key).is_some_and(|v| !v.is_null())
}

/// Comparison form of a rule: null `path`, `selector` or `backendName` are
/// removed, and any one of them being null also removes `priority`.
fn normalize(rule: &Map<String, Value>) -> Map<String, Value> {
    let mut copy = rule.clone();
    let mut priority_meaningless = false;

    for key in [PATH, SELECTOR, BACKEND_NAME] {
        if copy.get(key).is_some_and(Value::is_null) {
            copy.remove(key);
            priority_meaningless = true;
        }
    }

    if priority_meaningless {
        copy.remove(PRIORITY);
    }
    copy
}
