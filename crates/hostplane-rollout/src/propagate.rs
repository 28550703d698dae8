//! Propagation of the rollout target into the managed control plane record.

use tracing::debug;

use hostplane_core::{HostedCluster, HostedControlPlane};

/// Converge the control plane spec on the fleet record.
///
/// The release image written is the head of the version history, never
/// `desired`, so the control plane keeps converging on the in-flight
/// rollout no matter how often the requested release changes. Before any
/// version status exists the requested release is used directly.
///
/// API server networking is copied only when the fleet record declares it.
pub fn reconcile_hosted_control_plane(hcp: &mut HostedControlPlane, cluster: &HostedCluster) {
    let target = cluster
        .status
        .version
        .as_ref()
        .and_then(|v| v.target_image())
        .unwrap_or(cluster.spec.release.image.as_str());

    if hcp.spec.release_image != target {
        debug!(
            control_plane = %hcp.metadata.key(),
            from = %hcp.spec.release_image,
            to = %target,
            "updating control plane release target"
        );
        hcp.spec.release_image = target.to_string();
    }

    if let Some(api_server) = &cluster.spec.networking.api_server {
        hcp.spec.api_port = api_server.port;
        hcp.spec.api_advertise_address = api_server.advertise_address.clone();
    }
}
