//! Multi-pass reconcile scenarios: the caller persists each pass's output
//! and feeds it back as the next snapshot, while a simulated control plane
//! operator reports progress in between.

use std::sync::Arc;

use hostplane_controller::{HostedClusterReconciler, Reconciled, Snapshot};
use hostplane_core::conditions::{HOSTED_CLUSTER_AVAILABLE, find_status_condition};
use hostplane_core::{
    Clock, Condition, ConditionStatus, FakeClock, HostedCluster, HostedControlPlane, HostplaneConfig,
    LocalObjectReference, ObjectMeta, PublishingStrategyType, Release, Service,
    ServicePublishingStrategy, ServicePublishingStrategyMapping, ServiceType, UpdateState,
};
use hostplane_rollout::RolloutStep;

/// In-memory store standing in for the API server.
struct World {
    clock: Arc<FakeClock>,
    reconciler: HostedClusterReconciler,
    cluster: HostedCluster,
    control_plane: Option<HostedControlPlane>,
    ignition: Option<Service>,
}

impl World {
    fn new(image: &str, start: u64) -> Self {
        let clock = Arc::new(FakeClock::new(start));
        let mut cluster = HostedCluster {
            metadata: ObjectMeta::new("clusters", "prod"),
            ..Default::default()
        };
        cluster.metadata.generation = 1;
        cluster.spec.release = Release::new(image);
        Self {
            reconciler: HostedClusterReconciler::new(HostplaneConfig::default(), clock.clone()),
            clock,
            cluster,
            control_plane: None,
            ignition: None,
        }
    }

    fn request(&mut self, image: &str) {
        self.cluster.spec.release = Release::new(image);
        self.cluster.metadata.generation += 1;
    }

    /// Run one pass and persist everything it produced.
    fn pass(&mut self) -> Reconciled {
        let mut snapshot = Snapshot::new(&self.cluster);
        if let Some(hcp) = &self.control_plane {
            snapshot = snapshot.with_control_plane(hcp);
        }
        if let Some(svc) = &self.ignition {
            snapshot = snapshot.with_ignition_service(svc);
        }
        let out = self.reconciler.reconcile(snapshot);

        self.cluster.status = out.status.clone();
        self.control_plane = Some(out.control_plane.clone());
        self.ignition = out.ignition_service.clone();
        out
    }

    /// The control plane operator finishes applying its current target.
    fn operator_applies(&mut self, version: &str) {
        let now = self.clock.now();
        let hcp = self.control_plane.as_mut().expect("control plane exists");
        hcp.status.release_image = hcp.spec.release_image.clone();
        hcp.status.version = version.to_string();
        hcp.status.last_release_image_transition_time = Some(now);
    }

    fn history_images(&self) -> Vec<(String, UpdateState)> {
        self.cluster
            .status
            .version
            .as_ref()
            .map(|v| {
                v.history
                    .iter()
                    .map(|h| (h.image.clone(), h.state))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn partial(image: &str) -> (String, UpdateState) {
    (image.to_string(), UpdateState::Partial)
}

fn completed(image: &str) -> (String, UpdateState) {
    (image.to_string(), UpdateState::Completed)
}

#[test]
fn requests_during_rollout_are_serialized() {
    let mut w = World::new("release:4.9", 1_000);

    let out = w.pass();
    assert_eq!(out.rollout, RolloutStep::Initialized);
    assert_eq!(out.compiler_inputs.release_image, "release:4.9");

    // Two new requests arrive before the first rollout finishes.
    w.clock.advance(60);
    w.request("release:4.10");
    let out = w.pass();
    assert_eq!(out.rollout, RolloutStep::Deferred);
    assert_eq!(out.control_plane.spec.release_image, "release:4.9");

    w.clock.advance(60);
    w.request("release:4.11");
    let out = w.pass();
    assert_eq!(out.rollout, RolloutStep::Deferred);
    assert_eq!(out.compiler_inputs.release_image, "release:4.9");
    assert_eq!(
        w.cluster.status.version.as_ref().unwrap().desired.image,
        "release:4.11"
    );
    assert_eq!(w.history_images(), vec![partial("release:4.9")]);

    // The first rollout lands; the latest request starts, the skipped one never does.
    w.clock.advance(60);
    w.operator_applies("4.9.0");
    w.clock.advance(60);
    let out = w.pass();
    assert_eq!(out.rollout, RolloutStep::CompletedAndStarted);
    assert_eq!(out.control_plane.spec.release_image, "release:4.11");
    assert_eq!(
        w.history_images(),
        vec![partial("release:4.11"), completed("release:4.9")]
    );
    let done = &w.cluster.status.version.as_ref().unwrap().history[1];
    assert_eq!(done.version, "4.9.0");
    assert_eq!(done.completion_time, Some(1_180));

    w.clock.advance(60);
    w.operator_applies("4.11.0");
    w.clock.advance(60);
    let out = w.pass();
    assert_eq!(out.rollout, RolloutStep::Completed);
    assert_eq!(
        w.history_images(),
        vec![completed("release:4.11"), completed("release:4.9")]
    );

    // Steady state.
    w.clock.advance(60);
    let out = w.pass();
    assert_eq!(out.rollout, RolloutStep::Unchanged);
    assert!(!out.status_changed);
}

#[test]
fn stale_transition_time_is_clamped() {
    let mut w = World::new("release:a", 5_000);
    w.pass();

    let hcp = w.control_plane.as_mut().unwrap();
    hcp.status.release_image = "release:a".to_string();
    hcp.status.last_release_image_transition_time = Some(4_000);

    w.clock.advance(10);
    let out = w.pass();
    assert_eq!(out.rollout, RolloutStep::Completed);
    let head = &out.status.version.as_ref().unwrap().history[0];
    assert_eq!(head.started_time, 5_000);
    assert_eq!(head.completion_time, Some(5_000));
}

#[test]
fn availability_follows_control_plane_and_kubeconfig() {
    let mut w = World::new("release:a", 100);

    let reason = |w: &World| {
        let cond = find_status_condition(&w.cluster.status.conditions, HOSTED_CLUSTER_AVAILABLE)
            .expect("availability condition");
        (cond.status, cond.reason.clone(), cond.last_transition_time)
    };

    w.pass();
    assert_eq!(
        reason(&w),
        (ConditionStatus::False, "HostedControlPlaneNotFound".to_string(), 100)
    );

    w.clock.advance(10);
    w.pass();
    assert_eq!(
        reason(&w),
        (ConditionStatus::False, "HostedControlPlaneUnavailable".to_string(), 100)
    );

    w.control_plane
        .as_mut()
        .unwrap()
        .status
        .conditions
        .push(Condition::new("Available", ConditionStatus::True));
    w.clock.advance(10);
    w.pass();
    assert_eq!(
        reason(&w),
        (ConditionStatus::False, "KubeconfigUnavailable".to_string(), 100)
    );

    w.cluster.status.kubeconfig = Some(LocalObjectReference {
        name: "prod-admin-kubeconfig".to_string(),
    });
    w.clock.advance(10);
    w.pass();
    assert_eq!(
        reason(&w),
        (ConditionStatus::True, "HostedClusterAsExpected".to_string(), 130)
    );
}

#[test]
fn ignition_node_port_survives_passes() {
    let mut w = World::new("release:a", 1);
    w.cluster.spec.services = vec![ServicePublishingStrategyMapping {
        service: ServiceType::Ignition,
        strategy: ServicePublishingStrategy::of(PublishingStrategyType::NodePort),
    }];

    let out = w.pass();
    assert!(!out.ignition_endpoint_ready);

    // The platform allocates a port.
    w.ignition.as_mut().unwrap().spec.ports[0].node_port = 30443;

    for _ in 0..3 {
        w.clock.advance(30);
        let out = w.pass();
        assert!(out.ignition_endpoint_ready);
        let svc = out.ignition_service.unwrap();
        assert_eq!(svc.spec.ports.len(), 1);
        assert_eq!(svc.spec.ports[0].port, 443);
        assert_eq!(svc.spec.ports[0].node_port, 30443);
    }
}

#[test]
fn reconciler_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostplane.toml");
    std::fs::write(
        &path,
        "[control_plane]\ndefault_api_port = 7443\n\n[discovery]\nfallback = \"strict\"\n",
    )
    .unwrap();

    let clock = Arc::new(FakeClock::new(1));
    let r = HostedClusterReconciler::from_config_file(&path, clock).unwrap();
    let cluster = HostedCluster {
        metadata: ObjectMeta::new("clusters", "dev"),
        spec: hostplane_core::HostedClusterSpec {
            release: Release::new("release:a"),
            ..Default::default()
        },
        ..Default::default()
    };
    let out = r.reconcile(Snapshot::new(&cluster));
    assert_eq!(out.compiler_inputs.api_port, 7443);
}
