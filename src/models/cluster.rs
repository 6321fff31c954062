use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_blank, IngressResponse, ServiceResponse};
use crate::error::InventoryError;

/// Cluster row as held by the store. Children are not embedded; they point
/// back here through `cluster_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterEntity {
    pub id: i64,
    pub cluster_name: String,
    pub apiserver_version: String,
    pub kubelet_versions: Vec<String>,
    pub kernel_versions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of both create and update: updates replace every mutable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCreateDto {
    pub cluster_name: String,
    // collector agents send the capitalised spelling
    #[serde(alias = "apiServerVersion")]
    pub apiserver_version: String,
    #[serde(default)]
    pub kubelet_versions: Vec<String>,
    #[serde(default)]
    pub kernel_versions: Vec<String>,
}

impl ClusterCreateDto {
    pub fn validate(&self) -> Result<(), InventoryError> {
        require_non_blank("clusterName", &self.cluster_name)?;
        require_non_blank("apiserverVersion", &self.apiserver_version)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResponse {
    pub id: i64,
    pub cluster_name: String,
    pub apiserver_version: String,
    #[serde(default)]
    pub kubelet_versions: Vec<String>,
    #[serde(default)]
    pub kernel_versions: Vec<String>,
    #[serde(default)]
    pub ingresses: Vec<IngressResponse>,
    #[serde(default)]
    pub services: Vec<ServiceResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
