//! hostplane-controller: the composed reconcile pass.
//!
//! Ties the rollout state machine, availability aggregation and service
//! exposure together over one observed snapshot of a hosted cluster, and
//! exposes capability detection for the configured optional API groups.

pub mod reconcile;

pub use reconcile::{
    HostedClusterReconciler, Reconciled, Snapshot, SpecCompilerInputs, control_plane_namespace,
};
