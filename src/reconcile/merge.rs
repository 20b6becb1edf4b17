//! Deep merge with conflict detection.
//!
//! Merge semantics, per key of the incoming tree:
//! - Missing in existing: inserted
//! - Objects: deep-merge by key (recursive)
//! - Equal values: kept as is
//! - Arrays: incoming elements not already present are appended
//! - Anything else: conflict at the dotted key path

use serde_json::{Map, Value};
use thiserror::Error;

/// Two trees disagree at a key that cannot be merged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Conflict at {}", display_path(.path))]
pub struct MergeConflict {
    /// Dotted key path of the mismatch; empty when the roots themselves clash.
    pub path: String,
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Merge `incoming` into `existing` and return the combined tree.
///
/// `existing` is consumed so a failed merge never leaks a half-merged value.
pub fn merge(existing: Value, incoming: Value) -> Result<Value, MergeConflict> {
    match (existing, incoming) {
        (Value::Object(mut left), Value::Object(right)) => {
            let mut path = Vec::new();
            merge_objects(&mut left, right, &mut path)?;
            Ok(Value::Object(left))
        }
        (left, right) if left == right => Ok(left),
        _ => Err(MergeConflict { path: String::new() }),
    }
}

fn merge_objects(
    left: &mut Map<String, Value>,
    right: Map<String, Value>,
    path: &mut Vec<String>,
) -> Result<(), MergeConflict> {
    for (key, incoming) in right {
        let Some(existing) = left.get_mut(&key) else {
            left.insert(key, incoming);
            continue;
        };

        path.push(key);
        match (existing, incoming) {
            (Value::Object(l), Value::Object(r)) => merge_objects(l, r, path)?,
            (l, r) if *l == r => {}
            (Value::Array(l), Value::Array(r)) => append_missing(l, r),
            _ => return Err(MergeConflict { path: path.join(".") }),
        }
        path.pop();
    }
    Ok(())
}

fn append_missing(left: &mut Vec<Value>, right: Vec<Value>) {
    for item in right {
        if !left.contains(&item) {
            left.push(item);
        }
    }
}
