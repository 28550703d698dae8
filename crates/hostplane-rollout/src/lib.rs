//! hostplane release rollouts.
//!
//! This crate owns the version history of a hosted cluster. Each reconcile
//! pass folds the requested release and the managed control plane's
//! reported state into a new `ClusterVersionStatus`; the head of that
//! history is the only image ever propagated downstream, so at most one
//! rollout is in flight per control plane.
//!
//! # Components
//!
//! - **`controller`** - Version history state machine (start, complete, defer)
//! - **`propagate`** - Writes the rollout target and API networking into the control plane record

pub mod controller;
pub mod propagate;

pub use controller::{ObservedRelease, RolloutStep, compute_cluster_version_status, decide};
pub use propagate::reconcile_hosted_control_plane;
