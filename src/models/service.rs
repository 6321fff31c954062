use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{require_non_blank, require_valid_ports};
use crate::error::InventoryError;

/// Closed set of Kubernetes service kinds accepted at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "ClusterIP")]
    ClusterIp,
    LoadBalancer,
    NodePort,
    ExternalName,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::ClusterIp,
        ServiceType::LoadBalancer,
        ServiceType::NodePort,
        ServiceType::ExternalName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ClusterIp => "ClusterIP",
            ServiceType::LoadBalancer => "LoadBalancer",
            ServiceType::NodePort => "NodePort",
            ServiceType::ExternalName => "ExternalName",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                InventoryError::BadRequest(format!(
                    "Unknown service type '{}'; expected one of ClusterIP, LoadBalancer, NodePort, ExternalName",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntity {
    pub id: i64,
    pub cluster_id: i64,
    pub namespace: String,
    pub service_name: String,
    pub external_ip: Option<String>,
    pub ports: Vec<i32>,
    pub service_type: Option<ServiceType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreateDto {
    pub cluster_name: String,
    pub namespace: String,
    pub service_name: String,
    #[serde(default)]
    pub external_ip: Option<String>,
    #[serde(default)]
    pub ports: Vec<i32>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
}

impl ServiceCreateDto {
    pub fn validate(&self) -> Result<(), InventoryError> {
        require_non_blank("clusterName", &self.cluster_name)?;
        require_non_blank("namespace", &self.namespace)?;
        require_non_blank("serviceName", &self.service_name)?;
        require_valid_ports(&self.ports)?;
        Ok(())
    }

    /// Blank external IPs are stored as absent.
    pub fn normalized_external_ip(&self) -> Option<String> {
        self.external_ip
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: i64,
    pub cluster_name: String,
    pub namespace: String,
    pub service_name: String,
    #[serde(default)]
    pub external_ip: Option<String>,
    #[serde(default)]
    pub ports: Vec<i32>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
