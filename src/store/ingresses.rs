use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::models::IngressEntity;

const COLUMNS: &str =
    "id, cluster_id, namespace, ingress_name, hosts, ports, created_at, updated_at";

#[derive(Debug, FromRow)]
struct IngressRow {
    id: i64,
    cluster_id: i64,
    namespace: String,
    ingress_name: String,
    hosts: Json<Vec<String>>,
    ports: Json<Vec<i32>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IngressRow> for IngressEntity {
    fn from(row: IngressRow) -> Self {
        Self {
            id: row.id,
            cluster_id: row.cluster_id,
            namespace: row.namespace,
            ingress_name: row.ingress_name,
            hosts: row.hosts.0,
            ports: row.ports.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IngressFields<'a> {
    pub cluster_id: i64,
    pub namespace: &'a str,
    pub ingress_name: &'a str,
    pub hosts: &'a [String],
    pub ports: &'a [i32],
}

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<IngressEntity>, sqlx::Error> {
    let rows: Vec<IngressRow> =
        sqlx::query_as(&format!("SELECT {} FROM ingresses ORDER BY id", COLUMNS))
            .fetch_all(&mut *conn)
            .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_by_cluster_id(
    conn: &mut SqliteConnection,
    cluster_id: i64,
) -> Result<Vec<IngressEntity>, sqlx::Error> {
    let rows: Vec<IngressRow> = sqlx::query_as(&format!(
        "SELECT {} FROM ingresses WHERE cluster_id = ? ORDER BY id",
        COLUMNS
    ))
    .bind(cluster_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_by_cluster_name(
    conn: &mut SqliteConnection,
    cluster_name: &str,
) -> Result<Vec<IngressEntity>, sqlx::Error> {
    let rows: Vec<IngressRow> = sqlx::query_as(
        "SELECT i.id, i.cluster_id, i.namespace, i.ingress_name, i.hosts, i.ports,
                i.created_at, i.updated_at
           FROM ingresses i
           JOIN clusters c ON c.id = i.cluster_id
          WHERE c.cluster_name = ?
          ORDER BY i.id",
    )
    .bind(cluster_name)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<IngressEntity>, sqlx::Error> {
    let row: Option<IngressRow> =
        sqlx::query_as(&format!("SELECT {} FROM ingresses WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.map(Into::into))
}

/// Looks up the live ingress holding the (cluster, namespace, name) key.
pub async fn find_by_key(
    conn: &mut SqliteConnection,
    cluster_id: i64,
    namespace: &str,
    ingress_name: &str,
) -> Result<Option<IngressEntity>, sqlx::Error> {
    let row: Option<IngressRow> = sqlx::query_as(&format!(
        "SELECT {} FROM ingresses WHERE cluster_id = ? AND namespace = ? AND ingress_name = ?",
        COLUMNS
    ))
    .bind(cluster_id)
    .bind(namespace)
    .bind(ingress_name)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(Into::into))
}

pub async fn insert(
    conn: &mut SqliteConnection,
    fields: IngressFields<'_>,
) -> Result<IngressEntity, sqlx::Error> {
    let now = Utc::now();
    let row: IngressRow = sqlx::query_as(&format!(
        "INSERT INTO ingresses
            (cluster_id, namespace, ingress_name, hosts, ports, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {}",
        COLUMNS
    ))
    .bind(fields.cluster_id)
    .bind(fields.namespace)
    .bind(fields.ingress_name)
    .bind(Json(fields.hosts))
    .bind(Json(fields.ports))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.into())
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    fields: IngressFields<'_>,
) -> Result<Option<IngressEntity>, sqlx::Error> {
    let row: Option<IngressRow> = sqlx::query_as(&format!(
        "UPDATE ingresses
            SET cluster_id = ?, namespace = ?, ingress_name = ?, hosts = ?, ports = ?,
                updated_at = ?
          WHERE id = ?
         RETURNING {}",
        COLUMNS
    ))
    .bind(fields.cluster_id)
    .bind(fields.namespace)
    .bind(fields.ingress_name)
    .bind(Json(fields.hosts))
    .bind(Json(fields.ports))
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(Into::into))
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ingresses WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
