//! hostplane-expose: publishing control plane services.
//!
//! Resolves the publishing strategy a fleet record declares for a logical
//! service and converges the matching network endpoint object on it.
//!
//! # Components
//!
//! - **`strategy`** - Strategy lookup and per-service port layout
//! - **`service`** - Idempotent service reconciliation (node port preservation)

pub mod service;
pub mod strategy;

pub use service::{reconcile_service, service_first_node_port_available};
pub use strategy::{ExposedService, IGNITION_SERVER, exposed_service, service_publishing_strategy_by_type};
