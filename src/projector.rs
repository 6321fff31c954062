//! Entity -> response projection.
//!
//! Children only carry their owner's id. The owner's name is looked up here
//! and copied into the response, so a projected record never references
//! another record and serializes without cycles.

use std::collections::HashMap;
use tracing::warn;

use crate::models::{
    ClusterEntity, ClusterResponse, IngressEntity, IngressResponse, ServiceEntity,
    ServiceResponse,
};

/// Cluster id -> cluster name lookup.
#[derive(Debug, Default, Clone)]
pub struct ClusterIndex {
    names: HashMap<i64, String>,
}

impl ClusterIndex {
    pub fn new(names: HashMap<i64, String>) -> Self {
        Self { names }
    }

    pub fn from_clusters<'a>(clusters: impl IntoIterator<Item = &'a ClusterEntity>) -> Self {
        Self {
            names: clusters
                .into_iter()
                .map(|c| (c.id, c.cluster_name.clone()))
                .collect(),
        }
    }

    pub fn name_of(&self, cluster_id: i64) -> Option<&str> {
        self.names.get(&cluster_id).map(String::as_str)
    }
}

pub fn project_ingress(ingress: &IngressEntity, cluster_name: &str) -> IngressResponse {
    IngressResponse {
        id: ingress.id,
        cluster_name: cluster_name.to_string(),
        namespace: ingress.namespace.clone(),
        ingress_name: ingress.ingress_name.clone(),
        hosts: ingress.hosts.clone(),
        ports: ingress.ports.clone(),
        created_at: ingress.created_at,
        updated_at: ingress.updated_at,
    }
}

pub fn project_service(service: &ServiceEntity, cluster_name: &str) -> ServiceResponse {
    ServiceResponse {
        id: service.id,
        cluster_name: cluster_name.to_string(),
        namespace: service.namespace.clone(),
        service_name: service.service_name.clone(),
        external_ip: service.external_ip.clone(),
        ports: service.ports.clone(),
        service_type: service.service_type,
        created_at: service.created_at,
        updated_at: service.updated_at,
    }
}

/// Projects a cluster with its children. Children belonging to other
/// clusters are ignored, so callers may pass unfiltered lists.
pub fn project_cluster(
    cluster: &ClusterEntity,
    ingresses: &[IngressEntity],
    services: &[ServiceEntity],
) -> ClusterResponse {
    ClusterResponse {
        id: cluster.id,
        cluster_name: cluster.cluster_name.clone(),
        apiserver_version: cluster.apiserver_version.clone(),
        kubelet_versions: cluster.kubelet_versions.clone(),
        kernel_versions: cluster.kernel_versions.clone(),
        ingresses: ingresses
            .iter()
            .filter(|i| i.cluster_id == cluster.id)
            .map(|i| project_ingress(i, &cluster.cluster_name))
            .collect(),
        services: services
            .iter()
            .filter(|s| s.cluster_id == cluster.id)
            .map(|s| project_service(s, &cluster.cluster_name))
            .collect(),
        created_at: cluster.created_at,
        updated_at: cluster.updated_at,
    }
}

/// Builds the nested inventory snapshot served to the dashboard.
pub fn project_snapshot(
    clusters: &[ClusterEntity],
    ingresses: &[IngressEntity],
    services: &[ServiceEntity],
) -> Vec<ClusterResponse> {
    let mut ingresses_by_cluster: HashMap<i64, Vec<IngressEntity>> = HashMap::new();
    for ingress in ingresses {
        ingresses_by_cluster
            .entry(ingress.cluster_id)
            .or_default()
            .push(ingress.clone());
    }

    let mut services_by_cluster: HashMap<i64, Vec<ServiceEntity>> = HashMap::new();
    for service in services {
        services_by_cluster
            .entry(service.cluster_id)
            .or_default()
            .push(service.clone());
    }

    clusters
        .iter()
        .map(|cluster| {
            project_cluster(
                cluster,
                ingresses_by_cluster.get(&cluster.id).map(Vec::as_slice).unwrap_or(&[]),
                services_by_cluster.get(&cluster.id).map(Vec::as_slice).unwrap_or(&[]),
            )
        })
        .collect()
}

pub fn project_ingresses(ingresses: &[IngressEntity], index: &ClusterIndex) -> Vec<IngressResponse> {
    ingresses
        .iter()
        .filter_map(|ingress| match index.name_of(ingress.cluster_id) {
            Some(name) => Some(project_ingress(ingress, name)),
            None => {
                warn!("Skipping ingress {} with unknown cluster {}", ingress.id, ingress.cluster_id);
                None
            }
        })
        .collect()
}

pub fn project_services(services: &[ServiceEntity], index: &ClusterIndex) -> Vec<ServiceResponse> {
    services
        .iter()
        .filter_map(|service| match index.name_of(service.cluster_id) {
            Some(name) => Some(project_service(service, name)),
            None => {
                warn!("Skipping service {} with unknown cluster {}", service.id, service.cluster_id);
                None
            }
        })
        .collect()
}
