//! Event Classifier
//!
//! Maps a decoded record to a role-tagged [`DomainEvent`]. The record's
//! top-level role key selects the role; role-specific fields are then read
//! from the value under that key. Records with no recognized key are ignored.
//!
//! Field presence follows the backend's loose conventions: a field counts as
//! present only when it is a non-empty string (or, for role keys, any value
//! other than `null`, `false`, `0` or `""`).

use serde_json::{Map, Value};

use crate::event::{AgentRole, AgentStatus, ComplexityReport, DomainEvent, Vulnerability};

pub const DEVELOPER_FALLBACK: &str = "Generating code patch...";
pub const SECURITY_ENGINEER_FALLBACK: &str = "Auditing code for vulnerabilities...";
pub const OPTIMIZER_FALLBACK: &str = "Optimizing code...";
pub const CRITIC_FALLBACK: &str = "Reviewing code...";
pub const TESTER_FALLBACK: &str = "Running tests...";
pub const BENCHMARKER_FALLBACK: &str = "Benchmarking performance...";
pub const UPSTREAM_ERROR_FALLBACK: &str = "An unknown error occurred";

/// Classify a decoded record.
///
/// Pure and total: the same value always yields the same result, and any
/// value (including non-objects) is accepted. When several role keys are
/// present the first in [`AgentRole::ALL`] order wins.
pub fn classify(value: &Value) -> Option<DomainEvent> {
    let record = value.as_object()?;

    match role_fields(record) {
        Some((role, fields)) => Some(extract(role, fields)),
        None if is_tagged_error(record) => Some(DomainEvent::upstream_error(
            text(record, "payload").unwrap_or_else(|| UPSTREAM_ERROR_FALLBACK.to_string()),
        )),
        None => None,
    }
}

fn role_fields(record: &Map<String, Value>) -> Option<(AgentRole, &Value)> {
    AgentRole::ALL.into_iter().find_map(|role| {
        record
            .get(role.record_key())
            .filter(|v| is_truthy(v))
            .map(|fields| (role, fields))
    })
}

fn extract(role: AgentRole, fields: &Value) -> DomainEvent {
    let empty = Map::new();
    let obj = fields.as_object().unwrap_or(&empty);

    match role {
        AgentRole::Developer => DomainEvent::Developer {
            message: text_or(obj, "developer_thought", DEVELOPER_FALLBACK),
            code: text(obj, "current_patch").or_else(|| text(obj, "current_optimized_code")),
            iteration: iteration(obj),
        },
        AgentRole::SecurityEngineer => DomainEvent::SecurityEngineer {
            message: text_or(obj, "security_thought", SECURITY_ENGINEER_FALLBACK),
            code: text(obj, "current_patch"),
            vulnerabilities: vulnerabilities(obj),
            iteration: iteration(obj),
        },
        AgentRole::Optimizer => DomainEvent::Optimizer {
            message: text_or(obj, "optimizer_thought", OPTIMIZER_FALLBACK),
            code: text(obj, "current_optimized_code"),
            complexity: complexity(obj),
            iteration: iteration(obj),
        },
        AgentRole::Critic => DomainEvent::Critic {
            message: text_or(obj, "critique_feedback", CRITIC_FALLBACK),
            status: status(obj),
        },
        AgentRole::Tester => DomainEvent::Tester {
            message: text_or(obj, "test_feedback", TESTER_FALLBACK),
            status: status(obj),
        },
        AgentRole::Benchmarker => DomainEvent::Benchmarker {
            message: text_or(obj, "benchmark_feedback", BENCHMARKER_FALLBACK),
            results: obj.get("benchmark_results").filter(|v| !v.is_null()).cloned(),
            status: status(obj),
        },
        AgentRole::OptimizationCritic => DomainEvent::OptimizationCritic {
            message: text(obj, "critique_feedback"),
            status: status(obj),
        },
        AgentRole::Error => {
            let message = match fields {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => text(obj, "payload"),
            };
            DomainEvent::upstream_error(
                message.unwrap_or_else(|| UPSTREAM_ERROR_FALLBACK.to_string()),
            )
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_tagged_error(record: &Map<String, Value>) -> bool {
    record.get("type").and_then(Value::as_str) == Some("error")
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_or(obj: &Map<String, Value>, key: &str, fallback: &str) -> String {
    text(obj, key).unwrap_or_else(|| fallback.to_string())
}

fn status(obj: &Map<String, Value>) -> Option<AgentStatus> {
    text(obj, "status").map(AgentStatus::from)
}

fn iteration(obj: &Map<String, Value>) -> Option<u32> {
    obj.get("iterations")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn complexity(obj: &Map<String, Value>) -> Option<ComplexityReport> {
    let original_time = text(obj, "original_time_complexity")?;
    Some(ComplexityReport {
        original_time: Some(original_time),
        original_space: text(obj, "original_space_complexity"),
        optimized_time: text(obj, "optimized_time_complexity"),
        optimized_space: text(obj, "optimized_space_complexity"),
    })
}

fn vulnerabilities(obj: &Map<String, Value>) -> Vec<Vulnerability> {
    obj.get("vulnerabilities")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
