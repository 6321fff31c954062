//! Relational storage for clusters and their ingress/service children.
//!
//! Every access function takes a `&mut SqliteConnection` so callers decide
//! the transaction boundary: services open one transaction per logical
//! operation and pass the connection down. Reads use a plain deferred
//! transaction, writes use [`WriteTx`].

pub mod clusters;
pub mod ingresses;
pub mod services;

use anyhow::{Context, Result};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Sqlite, SqliteConnection, SqlitePool, Transaction,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// How long a writer queues for the database write lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS clusters (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        cluster_name      TEXT NOT NULL,
        apiserver_version TEXT NOT NULL,
        kubelet_versions  TEXT NOT NULL DEFAULT '[]',
        kernel_versions   TEXT NOT NULL DEFAULT '[]',
        created_at        TEXT NOT NULL,
        updated_at        TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS ux_clusters_name ON clusters(cluster_name)",
    "CREATE TABLE IF NOT EXISTS ingresses (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        cluster_id   INTEGER NOT NULL REFERENCES clusters(id) ON DELETE CASCADE,
        namespace    TEXT NOT NULL,
        ingress_name TEXT NOT NULL,
        hosts        TEXT NOT NULL DEFAULT '[]',
        ports        TEXT NOT NULL DEFAULT '[]',
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS ux_ingresses_key
        ON ingresses(cluster_id, namespace, ingress_name)",
    "CREATE TABLE IF NOT EXISTS services (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        cluster_id   INTEGER NOT NULL REFERENCES clusters(id) ON DELETE CASCADE,
        namespace    TEXT NOT NULL,
        service_name TEXT NOT NULL,
        external_ip  TEXT,
        ports        TEXT NOT NULL DEFAULT '[]',
        service_type TEXT,
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS ux_services_key
        ON services(cluster_id, namespace, service_name)",
];

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        // An in-memory database lives and dies with its connection, so the
        // pool must hand out the same one forever.
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database url '{}'", database_url))?
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database '{}'", database_url))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Creates tables and unique indexes if they are missing.
    pub async fn migrate(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await.context("Failed to acquire connection")?;
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&mut *conn)
                .await
                .context("Failed to apply schema")?;
        }
        info!("Inventory schema ready");
        Ok(())
    }

    /// Read-only snapshot transaction.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Transaction that holds the write lock from its first statement.
    ///
    /// A deferred transaction that reads before it writes cannot wait for a
    /// competing writer: SQLite fails the lock upgrade with `SQLITE_BUSY`.
    /// Taking the lock up front makes writers queue (for up to the busy
    /// timeout) so the second one runs its identity checks against the
    /// first one's committed rows.
    pub async fn begin_write(&self) -> Result<WriteTx, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(WriteTx { conn: Some(conn) })
    }

    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map(|_| ())
    }
}

/// Open `BEGIN IMMEDIATE` transaction on a pooled connection.
///
/// Must be finished with [`WriteTx::commit`]. Dropping it while open (an
/// early `?` return, or a cancelled request) rolls back before the
/// connection goes back to the pool.
pub struct WriteTx {
    conn: Option<PoolConnection<Sqlite>>,
}

impl WriteTx {
    pub fn conn(&mut self) -> Result<&mut SqliteConnection, sqlx::Error> {
        self.conn
            .as_deref_mut()
            .ok_or_else(|| sqlx::Error::Protocol("write transaction already finished".to_string()))
    }

    pub async fn commit(mut self) -> Result<(), sqlx::Error> {
        let Some(mut conn) = self.conn.take() else {
            return Ok(());
        };
        if let Err(e) = sqlx::query("COMMIT").execute(&mut *conn).await {
            // a failed COMMIT leaves the transaction open
            rollback(&mut conn).await;
            return Err(e);
        }
        Ok(())
    }
}

impl Drop for WriteTx {
    fn drop(&mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { rollback(&mut conn).await });
            }
            Err(_) => {
                // No runtime to roll back on. Closing the connection makes
                // SQLite discard the transaction.
                drop(conn.detach());
            }
        }
    }
}

async fn rollback(conn: &mut SqliteConnection) {
    if let Err(e) = sqlx::query("ROLLBACK").execute(conn).await {
        warn!("Failed to roll back write transaction: {}", e);
    }
}
