use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::session::DashboardSession;
use crate::config::Config;
use crate::models::ClusterResponse;

pub type SharedSession = Arc<RwLock<DashboardSession>>;

/// Where the dashboard gets its full inventory snapshot from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ClusterResponse>>;
}

/// Reads `GET /api/clusters` over HTTP.
#[derive(Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    url: String,
}

impl HttpSnapshotSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.snapshot_url(), config.request_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<Vec<ClusterResponse>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch clusters from {}", self.url))?;

        if !resp.status().is_success() {
            return Err(anyhow!("Failed to fetch clusters: HTTP {}", resp.status()));
        }

        resp.json::<Vec<ClusterResponse>>()
            .await
            .context("Failed to decode cluster snapshot")
    }
}

/// Fixed-cadence snapshot poller. The wait restarts after every fetch, so a
/// slow fetch delays the next one instead of overlapping with it.
#[derive(Debug, Clone)]
pub struct DashboardPoller {
    interval: Duration,
}

impl Default for DashboardPoller {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl DashboardPoller {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts polling immediately. Dropping the handle ends the session the
    /// same way `stop` does.
    pub fn spawn(&self, source: Arc<dyn SnapshotSource>, session: SharedSession) -> PollerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (updates_tx, updates_rx) = watch::channel(0u64);
        let task = tokio::spawn(poll_loop(source, session, self.interval, stop_rx, updates_tx));

        PollerHandle {
            stop_tx,
            updates_rx,
            task,
        }
    }
}

pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
    updates_rx: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops future polls. A fetch already in flight runs to completion and
    /// its result is thrown away.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Counts applied poll results; changes after every fetch that reached
    /// the session.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates_rx.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops and waits for the loop to exit.
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            warn!("Dashboard poller task ended abnormally: {}", e);
        }
    }
}

async fn poll_loop(
    source: Arc<dyn SnapshotSource>,
    session: SharedSession,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
    updates_tx: watch::Sender<u64>,
) {
    loop {
        let result = source.fetch().await;

        // a closed channel means the handle was dropped
        if *stop_rx.borrow() || stop_rx.has_changed().is_err() {
            debug!("Session ended during fetch; discarding result");
            break;
        }

        {
            let mut session = session.write().await;
            match result {
                Ok(clusters) => {
                    debug!("Fetched snapshot with {} clusters", clusters.len());
                    session.apply_snapshot(clusters);
                }
                Err(e) => {
                    warn!("Dashboard poll failed: {:#}", e);
                    session.apply_failure(format!("{:#}", e));
                }
            }
        }
        updates_tx.send_modify(|n| *n += 1);

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = stop_rx.changed() => break,
        }
    }

    info!("Dashboard poller stopped");
}
