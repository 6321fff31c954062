#![allow(dead_code)]

use std::path::PathBuf;

use cluster_inventory::{
    models::{ClusterCreateDto, IngressCreateDto, ServiceCreateDto, ServiceType},
    AppState, Config, Store,
};

/// Конфигурация для тестов: база в памяти
pub fn create_test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        log_level: "debug".to_string(),
        dashboard_api_url: "http://localhost:8080".to_string(),
        poll_interval_secs: 5,
        request_timeout_secs: 2,
    }
}

pub async fn create_test_store() -> Store {
    Store::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory store should open")
}

/// Файл базы во временном каталоге; удаляется вместе с WAL при drop
pub struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("cluster-inventory-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}

/// Хранилище в файле с пулом из нескольких соединений, как в продакшене
pub async fn create_file_store(max_connections: u32) -> (Store, TempDatabase) {
    let database = TempDatabase::new();
    let store = Store::connect(&database.url(), max_connections)
        .await
        .expect("file store should open");
    (store, database)
}

pub async fn create_test_app_state() -> AppState {
    AppState::new(create_test_config(), create_test_store().await)
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn cluster_dto(name: &str, kubelet: &[&str], kernel: &[&str]) -> ClusterCreateDto {
    ClusterCreateDto {
        cluster_name: name.to_string(),
        apiserver_version: "1.28.3".to_string(),
        kubelet_versions: strings(kubelet),
        kernel_versions: strings(kernel),
    }
}

pub fn ingress_dto(cluster: &str, namespace: &str, name: &str) -> IngressCreateDto {
    IngressCreateDto {
        cluster_name: cluster.to_string(),
        namespace: namespace.to_string(),
        ingress_name: name.to_string(),
        hosts: strings(&["app.example.com"]),
        ports: vec![80, 443],
    }
}

pub fn service_dto(cluster: &str, namespace: &str, name: &str) -> ServiceCreateDto {
    ServiceCreateDto {
        cluster_name: cluster.to_string(),
        namespace: namespace.to_string(),
        service_name: name.to_string(),
        external_ip: Some("10.0.0.1".to_string()),
        ports: vec![80, 443],
        service_type: Some(ServiceType::LoadBalancer),
    }
}
