// Cluster inventory backend library
// Public modules are exported for the binaries and the integration tests

pub mod config;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod projector;
pub mod services;
pub mod store;

use axum::{
    middleware::from_fn,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::InventoryError;
pub use services::{ClusterInventory, IngressInventory, ServiceInventory};
pub use store::Store;

use handlers::{cluster_handler, health_handler, ingress_handler, service_handler};
use middleware::request_id_middleware;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub cluster_inventory: ClusterInventory,
    pub ingress_inventory: IngressInventory,
    pub service_inventory: ServiceInventory,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            cluster_inventory: ClusterInventory::new(store.clone()),
            ingress_inventory: IngressInventory::new(store.clone()),
            service_inventory: ServiceInventory::new(store.clone()),
            config,
            store,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let clusters = Router::new()
        .route(
            "/api/clusters",
            get(cluster_handler::list_clusters).post(cluster_handler::create_cluster),
        )
        .route(
            "/api/clusters/:id",
            get(cluster_handler::get_cluster)
                .put(cluster_handler::update_cluster)
                .delete(cluster_handler::delete_cluster),
        )
        .route("/api/clusters/name/:name", get(cluster_handler::get_cluster_by_name));

    let ingresses = Router::new()
        .route(
            "/api/ingress",
            get(ingress_handler::list_ingresses).post(ingress_handler::create_ingress),
        )
        .route(
            "/api/ingress/cluster/:cluster_name",
            get(ingress_handler::list_ingresses_by_cluster),
        )
        .route(
            "/api/ingress/:id",
            get(ingress_handler::get_ingress)
                .put(ingress_handler::update_ingress)
                .delete(ingress_handler::delete_ingress),
        );

    let services = Router::new()
        .route(
            "/api/service",
            get(service_handler::list_services).post(service_handler::create_service),
        )
        .route(
            "/api/service/cluster/:cluster_name",
            get(service_handler::list_services_by_cluster),
        )
        .route(
            "/api/service/:id",
            get(service_handler::get_service)
                .put(service_handler::update_service)
                .delete(service_handler::delete_service),
        );

    Router::new()
        .route("/health", get(health_handler::health_check))
        .merge(clusters)
        .merge(ingresses)
        .merge(services)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(from_fn(request_id_middleware)),
        )
        .with_state(state)
}
