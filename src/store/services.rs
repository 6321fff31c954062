use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, SqliteConnection};
use tracing::warn;

use crate::models::{ServiceEntity, ServiceType};

const COLUMNS: &str =
    "id, cluster_id, namespace, service_name, external_ip, ports, service_type, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ServiceRow {
    id: i64,
    cluster_id: i64,
    namespace: String,
    service_name: String,
    external_ip: Option<String>,
    ports: Json<Vec<i32>>,
    service_type: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for ServiceEntity {
    fn from(row: ServiceRow) -> Self {
        // Rows written before the type was validated may hold anything.
        let service_type = row.service_type.as_deref().and_then(|raw| {
            raw.parse::<ServiceType>()
                .map_err(|_| warn!("Ignoring unknown service type '{}' on service {}", raw, row.id))
                .ok()
        });

        Self {
            id: row.id,
            cluster_id: row.cluster_id,
            namespace: row.namespace,
            service_name: row.service_name,
            external_ip: row.external_ip,
            ports: row.ports.0,
            service_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ServiceFields<'a> {
    pub cluster_id: i64,
    pub namespace: &'a str,
    pub service_name: &'a str,
    pub external_ip: Option<&'a str>,
    pub ports: &'a [i32],
    pub service_type: Option<ServiceType>,
}

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<ServiceEntity>, sqlx::Error> {
    let rows: Vec<ServiceRow> =
        sqlx::query_as(&format!("SELECT {} FROM services ORDER BY id", COLUMNS))
            .fetch_all(&mut *conn)
            .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_by_cluster_id(
    conn: &mut SqliteConnection,
    cluster_id: i64,
) -> Result<Vec<ServiceEntity>, sqlx::Error> {
    let rows: Vec<ServiceRow> = sqlx::query_as(&format!(
        "SELECT {} FROM services WHERE cluster_id = ? ORDER BY id",
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
) -> Result<Vec<ServiceEntity>, sqlx::Error> {
    let rows: Vec<ServiceRow> = sqlx::query_as(
        "SELECT s.id, s.cluster_id, s.namespace, s.service_name, s.external_ip, s.ports,
                s.service_type, s.created_at, s.updated_at
           FROM services s
           JOIN clusters c ON c.id = s.cluster_id
          WHERE c.cluster_name = ?
          ORDER BY s.id",
    )
    .bind(cluster_name)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<ServiceEntity>, sqlx::Error> {
    let row: Option<ServiceRow> =
        sqlx::query_as(&format!("SELECT {} FROM services WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.map(Into::into))
}

pub async fn find_by_key(
    conn: &mut SqliteConnection,
    cluster_id: i64,
    namespace: &str,
    service_name: &str,
) -> Result<Option<ServiceEntity>, sqlx::Error> {
    let row: Option<ServiceRow> = sqlx::query_as(&format!(
        "SELECT {} FROM services WHERE cluster_id = ? AND namespace = ? AND service_name = ?",
        COLUMNS
    ))
    .bind(cluster_id)
    .bind(namespace)
    .bind(service_name)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(Into::into))
}

pub async fn insert(
    conn: &mut SqliteConnection,
    fields: ServiceFields<'_>,
) -> Result<ServiceEntity, sqlx::Error> {
    let now = Utc::now();
    let row: ServiceRow = sqlx::query_as(&format!(
        "INSERT INTO services
            (cluster_id, namespace, service_name, external_ip, ports, service_type, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {}",
        COLUMNS
    ))
    .bind(fields.cluster_id)
    .bind(fields.namespace)
    .bind(fields.service_name)
    .bind(fields.external_ip)
    .bind(Json(fields.ports))
    .bind(fields.service_type.map(|t| t.as_str()))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.into())
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    fields: ServiceFields<'_>,
) -> Result<Option<ServiceEntity>, sqlx::Error> {
    let row: Option<ServiceRow> = sqlx::query_as(&format!(
        "UPDATE services
            SET cluster_id = ?, namespace = ?, service_name = ?, external_ip = ?, ports = ?,
                service_type = ?, updated_at = ?
          WHERE id = ?
         RETURNING {}",
        COLUMNS
    ))
    .bind(fields.cluster_id)
    .bind(fields.namespace)
    .bind(fields.service_name)
    .bind(fields.external_ip)
    .bind(Json(fields.ports))
    .bind(fields.service_type.map(|t| t.as_str()))
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(Into::into))
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
