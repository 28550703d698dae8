//! hostplane-core: shared records for hosted control plane management.
//!
//! Holds the fleet record (`HostedCluster`), the managed control plane
//! record (`HostedControlPlane`), network endpoint objects, condition
//! helpers, the clock abstraction, and `hostplane.toml` parsing. Every
//! other hostplane crate builds on these types.

pub mod clock;
pub mod conditions;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, FakeClock, SystemClock};
pub use conditions::{Condition, ConditionStatus};
pub use config::{FallbackPolicy, HostplaneConfig};
pub use error::ConfigError;
pub use types::*;
