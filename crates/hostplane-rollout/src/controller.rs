//! Rollout controller: folds each reconcile pass into the version history.
//!
//! The history is newest-first. A rollout starts as `Partial`, becomes
//! `Completed` only when the managed control plane reports that it
//! finished applying that image, and a new request is held back until the
//! in-flight rollout completes.

use tracing::{debug, info};

use hostplane_core::{
    ClusterVersionStatus, HostedControlPlane, Release, Timestamp, UpdateHistory, UpdateState,
};

/// Release state reported by the managed control plane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedRelease {
    pub release_image: String,
    pub version: String,
    /// Set by the control plane operator once `release_image` is fully applied.
    pub last_transition_time: Option<Timestamp>,
}

impl ObservedRelease {
    /// Read the reported release from a control plane, if one exists yet.
    pub fn from_control_plane(control_plane: Option<&HostedControlPlane>) -> Self {
        match control_plane {
            Some(hcp) => Self {
                release_image: hcp.status.release_image.clone(),
                version: hcp.status.version.clone(),
                last_transition_time: hcp.status.last_release_image_transition_time,
            },
            None => Self::default(),
        }
    }

    /// Whether the control plane reports `image` as fully applied.
    fn has_applied(&self, image: &str) -> Option<Timestamp> {
        if self.release_image == image {
            self.last_transition_time
        } else {
            None
        }
    }
}

/// What a reconcile pass did to the version history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutStep {
    /// No history existed; the first rollout was recorded.
    Initialized,
    /// The in-flight rollout was observed finished.
    Completed,
    /// A new rollout was started on top of a completed one.
    Started,
    /// The in-flight rollout finished and the next one started in the same pass.
    CompletedAndStarted,
    /// A new release was requested while a rollout is in flight; held back.
    Deferred,
    /// Nothing to do.
    Unchanged,
}

/// Compute the next version status. See [`decide`].
pub fn compute_cluster_version_status(
    now: Timestamp,
    wanted: &Release,
    previous: Option<&ClusterVersionStatus>,
    observed: &ObservedRelease,
) -> ClusterVersionStatus {
    decide(now, wanted, previous, observed).0
}

/// Compute the next version status and report which transition was taken.
///
/// Pure: the result depends only on the arguments. Applying it twice with
/// the same inputs yields the same status.
pub fn decide(
    now: Timestamp,
    wanted: &Release,
    previous: Option<&ClusterVersionStatus>,
    observed: &ObservedRelease,
) -> (ClusterVersionStatus, RolloutStep) {
    let mut status = match previous {
        Some(prev) if !prev.history.is_empty() => prev.clone(),
        _ => {
            info!(image = %wanted.image, "initializing rollout history");
            let status = ClusterVersionStatus {
                desired: wanted.clone(),
                history: vec![UpdateHistory::partial(&wanted.image, now)],
            };
            return (status, RolloutStep::Initialized);
        }
    };

    let mut completed = false;
    let head = &mut status.history[0];

    let transitioned = if head.is_partial() {
        observed.has_applied(&head.image)
    } else {
        None
    };
    if let Some(transitioned_at) = transitioned {
        head.state = UpdateState::Completed;
        head.completion_time = Some(transitioned_at.max(head.started_time));
        head.version = observed.version.clone();
        completed = true;
        info!(
            image = %head.image,
            version = %head.version,
            "rollout completed"
        );
    }

    let step = if head.image == wanted.image {
        if completed {
            RolloutStep::Completed
        } else {
            RolloutStep::Unchanged
        }
    } else if head.is_completed() {
        info!(
            from = %head.image,
            to = %wanted.image,
            "starting rollout"
        );
        status
            .history
            .insert(0, UpdateHistory::partial(&wanted.image, now));
        if completed {
            RolloutStep::CompletedAndStarted
        } else {
            RolloutStep::Started
        }
    } else {
        debug!(
            in_flight = %head.image,
            requested = %wanted.image,
            "deferring rollout until in-flight rollout completes"
        );
        RolloutStep::Deferred
    };

    status.desired = wanted.clone();
    (status, step)
}
