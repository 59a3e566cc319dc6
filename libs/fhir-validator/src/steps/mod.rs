//! Per-concern validation steps
//!
//! Each step is a free function appending to the run's issue vector; the
//! orchestrator in [`crate::validator`] sequences them per element.

pub(crate) mod cardinality;
pub(crate) mod invariants;
pub(crate) mod terminology;
pub(crate) mod values;

use serde_json::Value;

/// Collect the occurrences of a dotted element path: 0 when absent, 1 for
/// a scalar, N for a repeating element. The leading path segment addresses
/// the resource root. Arrays flatten; nulls contribute nothing.
pub(crate) fn element_occurrences<'a>(resource: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![resource];
    for name in path.split('.').skip(1) {
        let mut next = Vec::new();
        for node in current {
            let Some(child) = node.get(name) else {
                continue;
            };
            match child {
                Value::Null => {}
                Value::Array(items) => next.extend(items.iter().filter(|v| !v.is_null())),
                other => next.push(other),
            }
        }
        current = next;
    }
    current
}
