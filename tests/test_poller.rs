mod common;

use anyhow::{anyhow, Result};
use chrono::Utc;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, RwLock};

use cluster_inventory::{
    create_router,
    dashboard::{
        DashboardPoller, DashboardSession, HttpSnapshotSource, SessionStatus, SharedSession,
        SnapshotSource,
    },
    models::ClusterResponse,
};
use common::{cluster_dto, create_test_app_state};

fn new_session() -> SharedSession {
    Arc::new(RwLock::new(DashboardSession::new()))
}

/// Источник, который всегда возвращает пустой снапшот и считает вызовы
#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl SnapshotSource for CountingSource {
    async fn fetch(&self) -> Result<Vec<ClusterResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// Источник с заранее заданной последовательностью ответов
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<ClusterResponse>>>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<Vec<ClusterResponse>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch(&self) -> Result<Vec<ClusterResponse>> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Источник, который держит запрос до сигнала теста
#[derive(Default)]
struct GatedSource {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl SnapshotSource for GatedSource {
    async fn fetch(&self) -> Result<Vec<ClusterResponse>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Vec::new())
    }
}

fn snapshot_with_one_cluster() -> Vec<ClusterResponse> {
    let now = Utc::now();
    vec![ClusterResponse {
        id: 1,
        cluster_name: "prod-a".to_string(),
        apiserver_version: "1.28.3".to_string(),
        kubelet_versions: vec!["1.28".to_string()],
        kernel_versions: vec!["5.15".to_string()],
        ingresses: vec![],
        services: vec![],
        created_at: now,
        updated_at: now,
    }]
}

#[tokio::test(start_paused = true)]
async fn test_poller_fetches_on_fixed_interval() {
    let source = Arc::new(CountingSource::default());
    let session = new_session();
    let started = tokio::time::Instant::now();

    let poller = DashboardPoller::new(Duration::from_secs(5)).spawn(source.clone(), session.clone());
    let mut updates = poller.subscribe();

    for _ in 0..3 {
        updates.changed().await.unwrap();
    }

    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert!(started.elapsed() < Duration::from_secs(15));
    assert_eq!(session.read().await.status(), &SessionStatus::Ready);

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_poller_reports_failures_and_recovers() {
    let snapshot = snapshot_with_one_cluster();
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(snapshot.clone()),
        Err(anyhow!("Failed to fetch clusters: HTTP 503 Service Unavailable")),
        Ok(snapshot.clone()),
    ]));
    let session = new_session();

    let poller = DashboardPoller::new(Duration::from_secs(5)).spawn(source, session.clone());
    let mut updates = poller.subscribe();

    updates.changed().await.unwrap();
    assert_eq!(session.read().await.status(), &SessionStatus::Ready);
    assert_eq!(session.read().await.clusters().len(), 1);

    updates.changed().await.unwrap();
    {
        let session = session.read().await;
        assert_eq!(
            session.status(),
            &SessionStatus::Error("Failed to fetch clusters: HTTP 503 Service Unavailable".to_string())
        );
        // Последний успешный снапшот сохраняется
        assert_eq!(session.clusters(), snapshot.as_slice());
    }

    updates.changed().await.unwrap();
    assert_eq!(session.read().await.status(), &SessionStatus::Ready);

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_result_arriving_after_stop_is_discarded() {
    let source = Arc::new(GatedSource::default());
    let session = new_session();

    let poller = DashboardPoller::new(Duration::from_secs(5)).spawn(source.clone(), session.clone());
    let updates = poller.subscribe();

    source.entered.notified().await;
    poller.stop();
    source.release.notify_one();
    poller.shutdown().await;

    assert_eq!(session.read().await.status(), &SessionStatus::Loading);
    assert_eq!(*updates.borrow(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_wait_prevents_further_fetches() {
    let source = Arc::new(CountingSource::default());
    let session = new_session();

    let poller = DashboardPoller::new(Duration::from_secs(5)).spawn(source.clone(), session);
    let mut updates = poller.subscribe();
    updates.changed().await.unwrap();

    poller.stop();
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(poller.is_finished());
}

#[tokio::test]
async fn test_http_source_reads_cluster_snapshot() {
    let state = create_test_app_state().await;
    state
        .cluster_inventory
        .create(cluster_dto("prod-a", &["1.28"], &[]))
        .await
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    let source = HttpSnapshotSource::new(
        format!("http://{}/api/clusters", addr),
        Duration::from_secs(5),
    )
    .unwrap();
    let clusters = source.fetch().await.unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].cluster_name, "prod-a");

    let missing = HttpSnapshotSource::new(format!("http://{}/api/nowhere", addr), Duration::from_secs(5)).unwrap();
    let err = missing.fetch().await.unwrap_err();
    assert!(err.to_string().contains("HTTP 404"));

    server.abort();
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_discards_in_flight_result() {
    let source = Arc::new(GatedSource::default());
    let session = new_session();

    let poller = DashboardPoller::new(Duration::from_secs(5)).spawn(source.clone(), session.clone());

    source.entered.notified().await;
    drop(poller);
    source.release.notify_one();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(session.read().await.status(), &SessionStatus::Loading);
}
