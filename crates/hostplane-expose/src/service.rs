//! Service reconciliation: converges a service object on a publishing strategy.
//!
//! Reconciles are idempotent and never disturb an allocated node port:
//! once the first port entry carries a non-zero node port (requested by us
//! or assigned by the platform), it is kept as is. Two reconciles racing on
//! stale reads therefore converge on the same port.

use tracing::debug;

use hostplane_core::{
    Protocol, PublishingStrategyType, Service, ServiceKind, ServicePort, ServicePublishingStrategy,
    TargetPort,
};

use crate::strategy::ExposedService;

/// Converge `svc` on `strategy`. Returns true if the object changed.
pub fn reconcile_service(
    svc: &mut Service,
    exposed: &ExposedService,
    strategy: &ServicePublishingStrategy,
) -> bool {
    let before = svc.spec.clone();

    let mut port = svc.spec.ports.first().cloned().unwrap_or_default();
    port.name = exposed.port_name.to_string();
    port.protocol = Protocol::Tcp;
    port.port = exposed.port;
    port.target_port = TargetPort::Number(exposed.target_port);

    svc.spec.type_ = match strategy.type_ {
        PublishingStrategyType::NodePort => {
            assign_node_port(&mut port, strategy, &svc.metadata.name);
            ServiceKind::NodePort
        }
        PublishingStrategyType::LoadBalancer => ServiceKind::LoadBalancer,
        PublishingStrategyType::Route
        | PublishingStrategyType::ClusterIp
        | PublishingStrategyType::None => ServiceKind::ClusterIp,
    };
    svc.spec.ports = vec![port];

    let changed = svc.spec != before;
    if changed {
        debug!(
            service = %svc.metadata.key(),
            kind = ?svc.spec.type_,
            "reconciled service"
        );
    }
    changed
}

fn assign_node_port(port: &mut ServicePort, strategy: &ServicePublishingStrategy, service: &str) {
    let Some(requested) = strategy.requested_node_port() else {
        return;
    };
    if port.node_port == 0 {
        port.node_port = requested;
    } else if port.node_port != requested {
        debug!(
            service,
            allocated = port.node_port,
            requested,
            "keeping allocated node port"
        );
    }
}

/// Whether the platform has allocated a node port on the first port entry.
pub fn service_first_node_port_available(svc: Option<&Service>) -> bool {
    svc.and_then(|s| s.spec.ports.first())
        .is_some_and(|p| p.node_port != 0)
}
