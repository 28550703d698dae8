//! Kubernetes-style status conditions.
//!
//! Conditions are keyed by `type`; a record carries at most one condition
//! per type. `set_status_condition` follows the apimachinery convention of
//! only moving `last_transition_time` when the status actually flips.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Condition type reported on the fleet record.
pub const HOSTED_CLUSTER_AVAILABLE: &str = "Available";

/// Health condition type reported by the managed control plane.
pub const HOSTED_CONTROL_PLANE_AVAILABLE: &str = "Available";

/// Status of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    pub fn from_bool(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A single status condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: ConditionStatus,
    #[serde(default)]
    pub observed_generation: i64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub last_transition_time: Timestamp,
}

impl Condition {
    pub fn new(type_: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            type_: type_.into(),
            status,
            observed_generation: 0,
            reason: String::new(),
            message: String::new(),
            last_transition_time: 0,
        }
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }
}

/// Find the condition of the given type.
pub fn find_status_condition<'a>(
    conditions: &'a [Condition],
    condition_type: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.type_ == condition_type)
}

/// Whether a condition of the given type exists with status `True`.
pub fn is_status_condition_true(conditions: &[Condition], condition_type: &str) -> bool {
    find_status_condition(conditions, condition_type).is_some_and(Condition::is_true)
}

/// Insert or replace the condition with the same type as `new`.
///
/// Returns true if the stored condition changed.
pub fn set_status_condition(conditions: &mut Vec<Condition>, new: Condition) -> bool {
    match conditions.iter_mut().find(|c| c.type_ == new.type_) {
        Some(existing) => {
            let mut merged = new;
            if existing.status == merged.status {
                merged.last_transition_time = existing.last_transition_time;
            }
            if *existing == merged {
                return false;
            }
            *existing = merged;
            true
        }
        None => {
            conditions.push(new);
            true
        }
    }
}
