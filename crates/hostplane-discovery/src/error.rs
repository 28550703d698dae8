//! Discovery error types.

use std::collections::BTreeMap;

use thiserror::Error;

use hostplane_core::GroupVersion;

/// Why a single group could not be enumerated during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFailure {
    /// The server reports the group as not served.
    NotServed,
    /// The group exists but listing its resources failed.
    Unavailable(String),
}

/// Errors returned alongside (possibly partial) discovery results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// Some groups failed to enumerate while others succeeded.
    #[error("unable to retrieve the complete list of server APIs: {}", failed_groups(.groups))]
    GroupDiscoveryFailed {
        groups: BTreeMap<GroupVersion, GroupFailure>,
    },

    #[error("discovery transport error: {0}")]
    Transport(String),

    #[error("unexpected discovery error: {0}")]
    Unexpected(String),
}

impl DiscoveryError {
    /// Whether this is a partial failure scoped to specific groups.
    pub fn is_group_discovery_failed(&self) -> bool {
        matches!(self, Self::GroupDiscoveryFailed { .. })
    }

    /// Per-group failure for `gv`, if this is a partial failure naming it.
    pub fn group_failure(&self, gv: &GroupVersion) -> Option<&GroupFailure> {
        match self {
            Self::GroupDiscoveryFailed { groups } => groups.get(gv),
            _ => None,
        }
    }
}

fn failed_groups(groups: &BTreeMap<GroupVersion, GroupFailure>) -> String {
    groups
        .iter()
        .map(|(gv, failure)| match failure {
            GroupFailure::NotServed => format!("{gv}: not served"),
            GroupFailure::Unavailable(msg) => format!("{gv}: {msg}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
