//! Capability probe: is an optional API group served?
//!
//! Discovery servers under load commonly fail to enumerate a subset of
//! groups while answering for the rest. The probe distinguishes that
//! partial failure from unclassified errors:
//!
//! ```text
//! Optimistic (default)                    Strict
//! ─────────────────────────────────────   ─────────────────────────────────
//! listed                  → true          unclassified error  → Err
//! partial, not excluded   → true          partial, names gv   → true
//! partial, NotServed(gv)  → false         otherwise           → listed?
//! unclassified error      → Err
//! otherwise               → false
//! ```

use std::collections::BTreeSet;

use tracing::{debug, warn};

use hostplane_core::{FallbackPolicy, GroupVersion};

use crate::error::{DiscoveryError, GroupFailure};

/// Resources served for one group version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResourceList {
    /// `group/version` string as reported by the server.
    pub group_version: String,
    pub resources: Vec<String>,
}

impl ApiResourceList {
    pub fn new(gv: &GroupVersion) -> Self {
        Self {
            group_version: gv.to_string(),
            resources: Vec::new(),
        }
    }
}

/// Everything one discovery call produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Discovered {
    pub resources: Vec<ApiResourceList>,
    pub error: Option<DiscoveryError>,
}

impl Discovered {
    fn lists(&self, gv: &GroupVersion) -> bool {
        let wanted = gv.to_string();
        self.resources.iter().any(|r| r.group_version == wanted)
    }
}

/// Source of API discovery information.
pub trait DiscoveryClient {
    /// List all groups and resources the server could enumerate, plus any error.
    fn server_groups_and_resources(&self) -> Discovered;
}

/// Decide whether `gv` is registered given a discovery result.
pub fn evaluate(
    discovered: &Discovered,
    gv: &GroupVersion,
    policy: FallbackPolicy,
) -> Result<bool, DiscoveryError> {
    match policy {
        FallbackPolicy::Optimistic => evaluate_optimistic(discovered, gv),
        FallbackPolicy::Strict => evaluate_strict(discovered, gv),
    }
}

fn evaluate_optimistic(discovered: &Discovered, gv: &GroupVersion) -> Result<bool, DiscoveryError> {
    if discovered.lists(gv) {
        return Ok(true);
    }
    match &discovered.error {
        None => Ok(false),
        Some(err) if err.is_group_discovery_failed() => match err.group_failure(gv) {
            Some(GroupFailure::NotServed) => {
                debug!(group_version = %gv, "group reported as not served");
                Ok(false)
            }
            failure => {
                warn!(
                    group_version = %gv,
                    named = failure.is_some(),
                    error = %err,
                    "partial discovery failure, assuming group is registered"
                );
                Ok(true)
            }
        },
        Some(err) => Err(err.clone()),
    }
}

fn evaluate_strict(discovered: &Discovered, gv: &GroupVersion) -> Result<bool, DiscoveryError> {
    if let Some(err) = &discovered.error {
        if !err.is_group_discovery_failed() {
            return Err(err.clone());
        }
        // A group that failed to enumerate still exists.
        if let Some(GroupFailure::Unavailable(_)) = err.group_failure(gv) {
            return Ok(true);
        }
    }
    Ok(discovered.lists(gv))
}

/// Query discovery and decide whether `gv` is registered.
pub fn is_group_version_registered<C: DiscoveryClient + ?Sized>(
    client: &C,
    gv: &GroupVersion,
    policy: FallbackPolicy,
) -> Result<bool, DiscoveryError> {
    evaluate(&client.server_groups_and_resources(), gv, policy)
}

/// Registration state of a set of optional groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Capabilities {
    registered: BTreeSet<GroupVersion>,
}

impl Capabilities {
    pub fn is_registered(&self, gv: &GroupVersion) -> bool {
        self.registered.contains(gv)
    }

    pub fn registered(&self) -> impl Iterator<Item = &GroupVersion> {
        self.registered.iter()
    }
}

/// Probe every group in `groups` against a single discovery call.
pub fn detect_capabilities<C: DiscoveryClient + ?Sized>(
    client: &C,
    groups: &[GroupVersion],
    policy: FallbackPolicy,
) -> Result<Capabilities, DiscoveryError> {
    let discovered = client.server_groups_and_resources();
    let mut caps = Capabilities::default();
    for gv in groups {
        if evaluate(&discovered, gv, policy)? {
            caps.registered.insert(gv.clone());
        }
    }
    debug!(
        requested = groups.len(),
        registered = caps.registered.len(),
        "detected optional capabilities"
    );
    Ok(caps)
}
