//! Domain records shared across hostplane crates.
//!
//! These mirror the Kubernetes-style objects the reconcile pass reads and
//! writes: the fleet record, the managed control plane record, and the
//! network endpoint (service) object. All types serialize with camelCase
//! field names so they round-trip through the same JSON the API server
//! stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conditions::Condition;
use crate::error::ConfigError;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

// ── Metadata ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub generation: i64,
}

impl ObjectMeta {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            generation: 0,
        }
    }

    /// `{namespace}/{name}`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Reference to an object in the same namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    pub name: String,
}

// ── Releases and version history ──────────────────────────────────

/// A deployable version, identified by its release image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Release {
    pub image: String,
}

impl Release {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
        }
    }
}

/// Whether a rollout is in flight or has been observed finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateState {
    Partial,
    Completed,
}

/// One rollout, as recorded in `ClusterVersionStatus::history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHistory {
    pub image: String,
    /// Reported version; empty until the rollout completes.
    #[serde(default)]
    pub version: String,
    pub state: UpdateState,
    pub started_time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<Timestamp>,
}

impl UpdateHistory {
    /// A freshly started rollout.
    pub fn partial(image: &str, started_time: Timestamp) -> Self {
        Self {
            image: image.to_string(),
            version: String::new(),
            state: UpdateState::Partial,
            started_time,
            completion_time: None,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.state == UpdateState::Partial
    }

    pub fn is_completed(&self) -> bool {
        self.state == UpdateState::Completed
    }
}

/// Rollout status of a fleet member, newest history entry first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterVersionStatus {
    /// Latest requested release, which may be ahead of `history[0]`.
    pub desired: Release,
    #[serde(default)]
    pub history: Vec<UpdateHistory>,
}

impl ClusterVersionStatus {
    /// The rollout currently targeted, or the most recently completed one.
    pub fn current(&self) -> Option<&UpdateHistory> {
        self.history.first()
    }

    /// Image the managed control plane must converge on.
    pub fn target_image(&self) -> Option<&str> {
        self.current().map(|h| h.image.as_str())
    }

    /// Whether a rollout is in flight.
    pub fn is_progressing(&self) -> bool {
        self.current().is_some_and(UpdateHistory::is_partial)
    }
}

// ── Service publishing ────────────────────────────────────────────

/// Logical control plane services that can be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "APIServer")]
    ApiServer,
    OAuthServer,
    #[serde(rename = "OIDC")]
    Oidc,
    Konnectivity,
    Ignition,
}

/// Mechanism by which a logical service is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishingStrategyType {
    LoadBalancer,
    NodePort,
    Route,
    #[serde(rename = "ClusterIP")]
    ClusterIp,
    None,
}

/// Node port settings for a `NodePort` strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodePortPublishingStrategy {
    #[serde(default)]
    pub address: String,
    /// Requested node port; zero lets the platform allocate one.
    #[serde(default)]
    pub port: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePublishingStrategy {
    #[serde(rename = "type")]
    pub type_: PublishingStrategyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_port: Option<NodePortPublishingStrategy>,
}

impl ServicePublishingStrategy {
    pub fn of(type_: PublishingStrategyType) -> Self {
        Self {
            type_,
            node_port: None,
        }
    }

    pub fn node_port(port: i32) -> Self {
        Self {
            type_: PublishingStrategyType::NodePort,
            node_port: Some(NodePortPublishingStrategy {
                address: String::new(),
                port,
            }),
        }
    }

    /// Positive node port requested by the strategy, if any.
    pub fn requested_node_port(&self) -> Option<i32> {
        self.node_port.as_ref().map(|np| np.port).filter(|p| *p > 0)
    }
}

/// Publishing strategy declared for one logical service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePublishingStrategyMapping {
    pub service: ServiceType,
    #[serde(flatten)]
    pub strategy: ServicePublishingStrategy,
}

// ── Fleet record ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiServerNetworking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertise_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_server: Option<ApiServerNetworking>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostedClusterSpec {
    pub release: Release,
    #[serde(default)]
    pub services: Vec<ServicePublishingStrategyMapping>,
    #[serde(default)]
    pub networking: ClusterNetworking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostedClusterStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ClusterVersionStatus>,
    /// Set once an admin kubeconfig for the hosted cluster has been published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<LocalObjectReference>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Fleet-level record describing a customer's hosted environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostedCluster {
    pub metadata: ObjectMeta,
    pub spec: HostedClusterSpec,
    #[serde(default)]
    pub status: HostedClusterStatus,
}

// ── Managed control plane record ──────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostedControlPlaneSpec {
    #[serde(default)]
    pub release_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_port: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_advertise_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostedControlPlaneStatus {
    /// Release image the control plane has finished applying.
    #[serde(default)]
    pub release_image: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_release_image_transition_time: Option<Timestamp>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Managed control plane instance, reconciled by its own operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostedControlPlane {
    pub metadata: ObjectMeta,
    pub spec: HostedControlPlaneSpec,
    #[serde(default)]
    pub status: HostedControlPlaneStatus,
}

impl HostedControlPlane {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            ..Default::default()
        }
    }

    /// API server port, falling back to `default` when unset.
    pub fn api_port_or(&self, default: i32) -> i32 {
        self.spec.api_port.unwrap_or(default)
    }
}

// ── Network endpoint object ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ServiceKind {
    #[default]
    #[serde(rename = "ClusterIP")]
    ClusterIp,
    NodePort,
    LoadBalancer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

/// Container port a service forwards to, by number or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetPort {
    Number(i32),
    Name(String),
}

impl Default for TargetPort {
    fn default() -> Self {
        Self::Number(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub name: String,
    #[serde(default)]
    pub protocol: Protocol,
    pub port: i32,
    #[serde(default)]
    pub target_port: TargetPort,
    /// Allocated node port; zero until assigned.
    #[serde(default)]
    pub node_port: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(rename = "type", default)]
    pub type_: ServiceKind,
    #[serde(default)]
    pub ports: Vec<ServicePort>,
}

/// Network endpoint object exposing a control plane component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Service {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ServiceSpec,
}

impl Service {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            spec: ServiceSpec::default(),
        }
    }
}

// ── API discovery ─────────────────────────────────────────────────

/// An API group and version, e.g. `route.openshift.io/v1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupVersion {
    /// Empty for the core group.
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

impl FromStr for GroupVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidGroupVersion(s.to_string());
        let s_trim = s.trim();
        if s_trim.is_empty() {
            return Err(invalid());
        }
        match s_trim.split_once('/') {
            None => Ok(Self::new("", s_trim)),
            Some((group, version)) => {
                if group.is_empty() || version.is_empty() || version.contains('/') {
                    return Err(invalid());
                }
                Ok(Self::new(group, version))
            }
        }
    }
}
