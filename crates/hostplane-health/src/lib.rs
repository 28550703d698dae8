//! hostplane-health: availability of hosted clusters.
//!
//! A hosted cluster is available to its users only when its managed
//! control plane exists, reports itself healthy, and an admin kubeconfig
//! has been published. The aggregator folds those signals into one
//! verdict with a reason code; free text is produced only when the
//! verdict is rendered as a `Condition`.

pub mod availability;

pub use availability::{Availability, AvailabilityReason, compute_hosted_cluster_availability};
