//! One reconcile pass over a hosted cluster snapshot.
//!
//! The pass is pure apart from reading the clock: it takes the observed
//! records and returns the desired ones. Persisting them, and retrying on
//! conflict, is the caller's job.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use hostplane_core::conditions::set_status_condition;
use hostplane_core::{
    Clock, HostedCluster, HostedClusterStatus, HostedControlPlane, HostplaneConfig,
    PublishingStrategyType, Service, ServiceType,
};
use hostplane_discovery::{Capabilities, DiscoveryClient, detect_capabilities};
use hostplane_expose::{
    IGNITION_SERVER, reconcile_service, service_first_node_port_available,
    service_publishing_strategy_by_type,
};
use hostplane_health::compute_hosted_cluster_availability;
use hostplane_rollout::{ObservedRelease, RolloutStep, decide, reconcile_hosted_control_plane};

/// Observed state for one hosted cluster.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub cluster: &'a HostedCluster,
    pub control_plane: Option<&'a HostedControlPlane>,
    pub ignition_service: Option<&'a Service>,
}

impl<'a> Snapshot<'a> {
    pub fn new(cluster: &'a HostedCluster) -> Self {
        Self {
            cluster,
            control_plane: None,
            ignition_service: None,
        }
    }

    pub fn with_control_plane(mut self, control_plane: &'a HostedControlPlane) -> Self {
        self.control_plane = Some(control_plane);
        self
    }

    pub fn with_ignition_service(mut self, service: &'a Service) -> Self {
        self.ignition_service = Some(service);
        self
    }
}

/// Parameters handed to the control plane spec compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCompilerInputs {
    /// Head of the version history.
    pub release_image: String,
    pub api_port: i32,
    pub api_advertise_address: Option<String>,
}

/// Desired state produced by a reconcile pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub status: HostedClusterStatus,
    /// Whether `status` differs from the observed one.
    pub status_changed: bool,
    pub rollout: RolloutStep,
    pub control_plane: HostedControlPlane,
    /// `None` when no Ignition strategy is declared.
    pub ignition_service: Option<Service>,
    pub ignition_endpoint_ready: bool,
    pub compiler_inputs: SpecCompilerInputs,
}

/// Namespace holding a hosted cluster's control plane objects.
pub fn control_plane_namespace(cluster: &HostedCluster) -> String {
    format!("{}-{}", cluster.metadata.namespace, cluster.metadata.name)
}

/// Reconciles hosted clusters against their managed control planes.
pub struct HostedClusterReconciler {
    config: HostplaneConfig,
    clock: Arc<dyn Clock>,
}

impl HostedClusterReconciler {
    pub fn new(config: HostplaneConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Build a reconciler from a `hostplane.toml` file.
    pub fn from_config_file(path: &Path, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let config = HostplaneConfig::from_file(path)?;
        info!(
            path = %path.display(),
            fallback = ?config.discovery.fallback,
            "loaded hostplane config"
        );
        Ok(Self::new(config, clock))
    }

    pub fn config(&self) -> &HostplaneConfig {
        &self.config
    }

    pub fn reconcile(&self, snapshot: Snapshot<'_>) -> Reconciled {
        let now = self.clock.now();
        let cluster = snapshot.cluster;
        let key = cluster.metadata.key();

        // Version history.
        let observed = ObservedRelease::from_control_plane(snapshot.control_plane);
        let (version, rollout) = decide(
            now,
            &cluster.spec.release,
            cluster.status.version.as_ref(),
            &observed,
        );
        if rollout != RolloutStep::Unchanged {
            info!(cluster = %key, step = ?rollout, "rollout step");
        }

        let mut next = cluster.clone();
        next.status.version = Some(version);

        // Managed control plane.
        let mut control_plane = match snapshot.control_plane {
            Some(hcp) => hcp.clone(),
            None => {
                let namespace = control_plane_namespace(cluster);
                debug!(cluster = %key, namespace = %namespace, "creating control plane record");
                HostedControlPlane::new(&namespace, &cluster.metadata.name)
            }
        };
        reconcile_hosted_control_plane(&mut control_plane, &next);

        // Availability, judged on what was observed.
        let availability = compute_hosted_cluster_availability(cluster, snapshot.control_plane);
        set_status_condition(
            &mut next.status.conditions,
            availability.into_condition(cluster.metadata.generation, now),
        );

        let (ignition_service, ignition_endpoint_ready) =
            self.reconcile_ignition(cluster, snapshot.ignition_service);

        let compiler_inputs = SpecCompilerInputs {
            release_image: control_plane.spec.release_image.clone(),
            api_port: control_plane.api_port_or(self.config.control_plane.default_api_port),
            api_advertise_address: control_plane.spec.api_advertise_address.clone(),
        };

        let status_changed = next.status != cluster.status;
        debug!(
            cluster = %key,
            available = availability.available,
            status_changed,
            ignition_endpoint_ready,
            "reconciled hosted cluster"
        );

        Reconciled {
            status: next.status,
            status_changed,
            rollout,
            control_plane,
            ignition_service,
            ignition_endpoint_ready,
            compiler_inputs,
        }
    }

    fn reconcile_ignition(
        &self,
        cluster: &HostedCluster,
        observed: Option<&Service>,
    ) -> (Option<Service>, bool) {
        let Some(mapping) = service_publishing_strategy_by_type(&cluster.spec, ServiceType::Ignition)
        else {
            return (None, false);
        };

        let mut svc = match observed {
            Some(svc) => svc.clone(),
            None => Service::new(&control_plane_namespace(cluster), IGNITION_SERVER.name),
        };
        reconcile_service(&mut svc, &IGNITION_SERVER, &mapping.strategy);

        let ready = match mapping.strategy.type_ {
            PublishingStrategyType::NodePort => service_first_node_port_available(Some(&svc)),
            _ => true,
        };
        (Some(svc), ready)
    }

    /// Probe the configured optional API groups with one discovery call.
    pub fn detect_capabilities<C: DiscoveryClient + ?Sized>(
        &self,
        client: &C,
    ) -> anyhow::Result<Capabilities> {
        let groups = self.config.optional_group_versions()?;
        let caps = detect_capabilities(client, &groups, self.config.discovery.fallback)?;
        Ok(caps)
    }
}
