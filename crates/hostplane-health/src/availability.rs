//! Availability aggregation for a single hosted cluster.

use tracing::debug;

use hostplane_core::conditions::{
    HOSTED_CLUSTER_AVAILABLE, HOSTED_CONTROL_PLANE_AVAILABLE, is_status_condition_true,
};
use hostplane_core::{Condition, ConditionStatus, HostedCluster, HostedControlPlane, Timestamp};

/// Why a hosted cluster is or is not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityReason {
    /// All preconditions hold.
    AsExpected,
    /// The managed control plane record does not exist yet.
    ControlPlaneNotFound,
    /// The control plane's health condition is missing or not `True`.
    ControlPlaneUnavailable,
    /// No admin kubeconfig has been published for the cluster.
    KubeconfigUnavailable,
}

impl AvailabilityReason {
    /// Machine-readable reason written to the condition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AsExpected => "HostedClusterAsExpected",
            Self::ControlPlaneNotFound => "HostedControlPlaneNotFound",
            Self::ControlPlaneUnavailable => "HostedControlPlaneUnavailable",
            Self::KubeconfigUnavailable => "KubeconfigUnavailable",
        }
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &'static str {
        match self {
            Self::AsExpected => "The hosted control plane is available",
            Self::ControlPlaneNotFound => "The hosted control plane has not been created yet",
            Self::ControlPlaneUnavailable => "Waiting for the hosted control plane to be available",
            Self::KubeconfigUnavailable => {
                "The hosted control plane is available but its kubeconfig is not published yet"
            }
        }
    }
}

/// Availability verdict for a hosted cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    pub reason: AvailabilityReason,
}

impl Availability {
    fn from_reason(reason: AvailabilityReason) -> Self {
        Self {
            available: reason == AvailabilityReason::AsExpected,
            reason,
        }
    }

    /// Render as the fleet record's `Available` condition.
    pub fn into_condition(self, observed_generation: i64, now: Timestamp) -> Condition {
        Condition {
            type_: HOSTED_CLUSTER_AVAILABLE.to_string(),
            status: ConditionStatus::from_bool(self.available),
            observed_generation,
            reason: self.reason.as_str().to_string(),
            message: self.reason.message().to_string(),
            last_transition_time: now,
        }
    }
}

/// Decide whether a hosted cluster is available.
///
/// Checks stop at the first unmet precondition, so a missing control plane
/// is reported as such even when the kubeconfig is also missing.
pub fn compute_hosted_cluster_availability(
    cluster: &HostedCluster,
    control_plane: Option<&HostedControlPlane>,
) -> Availability {
    let reason = match control_plane {
        None => AvailabilityReason::ControlPlaneNotFound,
        Some(hcp)
            if !is_status_condition_true(&hcp.status.conditions, HOSTED_CONTROL_PLANE_AVAILABLE) =>
        {
            AvailabilityReason::ControlPlaneUnavailable
        }
        Some(_) if cluster.status.kubeconfig.is_none() => AvailabilityReason::KubeconfigUnavailable,
        Some(_) => AvailabilityReason::AsExpected,
    };

    debug!(
        cluster = %cluster.metadata.key(),
        reason = reason.as_str(),
        "computed hosted cluster availability"
    );
    Availability::from_reason(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostplane_core::LocalObjectReference;

    fn control_plane(status: ConditionStatus) -> HostedControlPlane {
        let mut hcp = HostedControlPlane::new("ns", "hc");
        hcp.status
            .conditions
            .push(Condition::new(HOSTED_CONTROL_PLANE_AVAILABLE, status));
        hcp
    }

    fn cluster_with_kubeconfig() -> HostedCluster {
        let mut hc = HostedCluster::default();
        hc.status.kubeconfig = Some(LocalObjectReference {
            name: "foo".to_string(),
        });
        hc
    }

    #[test]
    fn missing_control_plane_is_unavailable() {
        let result = compute_hosted_cluster_availability(&cluster_with_kubeconfig(), None);
        assert!(!result.available);
        assert_eq!(result.reason, AvailabilityReason::ControlPlaneNotFound);
    }

    #[test]
    fn missing_kubeconfig_is_unavailable() {
        let hcp = control_plane(ConditionStatus::True);
        let result = compute_hosted_cluster_availability(&HostedCluster::default(), Some(&hcp));
        assert!(!result.available);
        assert_eq!(result.reason, AvailabilityReason::KubeconfigUnavailable);
    }

    #[test]
    fn unhealthy_control_plane_is_unavailable() {
        for status in [ConditionStatus::False, ConditionStatus::Unknown] {
            let hcp = control_plane(status);
            let result =
                compute_hosted_cluster_availability(&cluster_with_kubeconfig(), Some(&hcp));
            assert_eq!(result.reason, AvailabilityReason::ControlPlaneUnavailable);
        }

        let bare = HostedControlPlane::new("ns", "hc");
        let result = compute_hosted_cluster_availability(&cluster_with_kubeconfig(), Some(&bare));
        assert_eq!(result.reason, AvailabilityReason::ControlPlaneUnavailable);
    }

    #[test]
    fn should_be_available() {
        let hcp = control_plane(ConditionStatus::True);
        let result = compute_hosted_cluster_availability(&cluster_with_kubeconfig(), Some(&hcp));
        assert!(result.available);
        assert_eq!(result.reason, AvailabilityReason::AsExpected);
    }

    #[test]
    fn condition_carries_type_status_and_generation() {
        let cond = compute_hosted_cluster_availability(&HostedCluster::default(), None)
            .into_condition(4, 100);
        assert_eq!(cond.type_, "Available");
        assert_eq!(cond.status, ConditionStatus::False);
        assert_eq!(cond.observed_generation, 4);
        assert_eq!(cond.reason, "HostedControlPlaneNotFound");
        assert_eq!(cond.last_transition_time, 100);

        let hcp = control_plane(ConditionStatus::True);
        let cond = compute_hosted_cluster_availability(&cluster_with_kubeconfig(), Some(&hcp))
            .into_condition(1, 100);
        assert_eq!(cond.status, ConditionStatus::True);
    }
}
