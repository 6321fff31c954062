use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_blank, require_valid_ports};
use crate::error::InventoryError;

#[derive(Debug, Clone, PartialEq)]
pub struct IngressEntity {
    pub id: i64,
    pub cluster_id: i64,
    pub namespace: String,
    pub ingress_name: String,
    pub hosts: Vec<String>,
    pub ports: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressCreateDto {
    pub cluster_name: String,
    pub namespace: String,
    pub ingress_name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub ports: Vec<i32>,
}

impl IngressCreateDto {
    pub fn validate(&self) -> Result<(), InventoryError> {
        require_non_blank("clusterName", &self.cluster_name)?;
        require_non_blank("namespace", &self.namespace)?;
        require_non_blank("ingressName", &self.ingress_name)?;
        require_valid_ports(&self.ports)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressResponse {
    pub id: i64,
    pub cluster_name: String,
    pub namespace: String,
    pub ingress_name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub ports: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
