//! Capability probing for optional API groups.
//!
//! Discovery is injected through [`DiscoveryClient`]; the decision itself is
//! the pure [`evaluate`] so it can be exercised without a server.

pub mod error;
pub mod probe;

pub use error::{DiscoveryError, GroupFailure};
pub use hostplane_core::FallbackPolicy;
pub use probe::{
    ApiResourceList, Capabilities, Discovered, DiscoveryClient, detect_capabilities, evaluate,
    is_group_version_registered,
};
