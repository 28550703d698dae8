//! Publishing strategy lookup and the fixed port layout of each service.

use hostplane_core::{HostedClusterSpec, ServicePublishingStrategyMapping, ServiceType};

/// Port layout of an exposed control plane service.
///
/// Fixed by service identity; reconciles never change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposedService {
    /// Name of the service object.
    pub name: &'static str,
    pub port_name: &'static str,
    pub port: i32,
    pub target_port: i32,
}

pub const KUBE_APISERVER: ExposedService = ExposedService {
    name: "kube-apiserver",
    port_name: "client",
    port: 6443,
    target_port: 6443,
};

pub const OAUTH_SERVER: ExposedService = ExposedService {
    name: "oauth-openshift",
    port_name: "https",
    port: 443,
    target_port: 6443,
};

pub const KONNECTIVITY_SERVER: ExposedService = ExposedService {
    name: "konnectivity-server",
    port_name: "konnectivity",
    port: 8091,
    target_port: 8091,
};

pub const IGNITION_SERVER: ExposedService = ExposedService {
    name: "ignition-server",
    port_name: "https",
    port: 443,
    target_port: 9090,
};

/// Port layout for a logical service, if it is published through a service object.
pub fn exposed_service(service_type: ServiceType) -> Option<&'static ExposedService> {
    match service_type {
        ServiceType::ApiServer => Some(&KUBE_APISERVER),
        ServiceType::OAuthServer => Some(&OAUTH_SERVER),
        ServiceType::Konnectivity => Some(&KONNECTIVITY_SERVER),
        ServiceType::Ignition => Some(&IGNITION_SERVER),
        // Discovery documents are served from object storage.
        ServiceType::Oidc => None,
    }
}

/// First declared strategy for `service_type`.
///
/// `None` means no exposure was requested for the service.
pub fn service_publishing_strategy_by_type(
    spec: &HostedClusterSpec,
    service_type: ServiceType,
) -> Option<&ServicePublishingStrategyMapping> {
    spec.services.iter().find(|m| m.service == service_type)
}
