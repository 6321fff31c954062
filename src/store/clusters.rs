use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, SqliteConnection};
use std::collections::HashMap;

use crate::models::ClusterEntity;

const COLUMNS: &str =
    "id, cluster_name, apiserver_version, kubelet_versions, kernel_versions, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ClusterRow {
    id: i64,
    cluster_name: String,
    apiserver_version: String,
    kubelet_versions: Json<Vec<String>>,
    kernel_versions: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClusterRow> for ClusterEntity {
    fn from(row: ClusterRow) -> Self {
        Self {
            id: row.id,
            cluster_name: row.cluster_name,
            apiserver_version: row.apiserver_version,
            kubelet_versions: row.kubelet_versions.0,
            kernel_versions: row.kernel_versions.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Mutable cluster columns, written by both insert and update.
#[derive(Debug, Clone, Copy)]
pub struct ClusterFields<'a> {
    pub cluster_name: &'a str,
    pub apiserver_version: &'a str,
    pub kubelet_versions: &'a [String],
    pub kernel_versions: &'a [String],
}

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<ClusterEntity>, sqlx::Error> {
    let rows: Vec<ClusterRow> =
        sqlx::query_as(&format!("SELECT {} FROM clusters ORDER BY id", COLUMNS))
            .fetch_all(&mut *conn)
            .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<ClusterEntity>, sqlx::Error> {
    let row: Option<ClusterRow> =
        sqlx::query_as(&format!("SELECT {} FROM clusters WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.map(Into::into))
}

pub async fn get_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<ClusterEntity>, sqlx::Error> {
    let row: Option<ClusterRow> =
        sqlx::query_as(&format!("SELECT {} FROM clusters WHERE cluster_name = ?", COLUMNS))
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.map(Into::into))
}

/// id -> cluster name for every cluster.
pub async fn names(conn: &mut SqliteConnection) -> Result<HashMap<i64, String>, sqlx::Error> {
    let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, cluster_name FROM clusters")
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.into_iter().collect())
}

pub async fn insert(
    conn: &mut SqliteConnection,
    fields: ClusterFields<'_>,
) -> Result<ClusterEntity, sqlx::Error> {
    let now = Utc::now();
    let row: ClusterRow = sqlx::query_as(&format!(
        "INSERT INTO clusters
            (cluster_name, apiserver_version, kubelet_versions, kernel_versions, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {}",
        COLUMNS
    ))
    .bind(fields.cluster_name)
    .bind(fields.apiserver_version)
    .bind(Json(fields.kubelet_versions))
    .bind(Json(fields.kernel_versions))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.into())
}

/// Returns `None` when no cluster has this id (never existed or deleted concurrently).
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    fields: ClusterFields<'_>,
) -> Result<Option<ClusterEntity>, sqlx::Error> {
    let row: Option<ClusterRow> = sqlx::query_as(&format!(
        "UPDATE clusters
            SET cluster_name = ?, apiserver_version = ?, kubelet_versions = ?,
                kernel_versions = ?, updated_at = ?
          WHERE id = ?
         RETURNING {}",
        COLUMNS
    ))
    .bind(fields.cluster_name)
    .bind(fields.apiserver_version)
    .bind(Json(fields.kubelet_versions))
    .bind(Json(fields.kernel_versions))
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(Into::into))
}

/// Deletes the cluster together with its ingresses and services. Children
/// are removed explicitly so the cascade does not depend on the connection's
/// foreign key pragma. Returns `false` when the cluster did not exist.
pub async fn delete_cascade(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM ingresses WHERE cluster_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM services WHERE cluster_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM clusters WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
