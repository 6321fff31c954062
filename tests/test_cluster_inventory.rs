mod common;

use cluster_inventory::{ClusterInventory, IngressInventory, InventoryError, ServiceInventory};
use common::{cluster_dto, create_test_store, ingress_dto, service_dto};

#[tokio::test]
async fn test_create_cluster_removes_duplicate_versions() {
    let clusters = ClusterInventory::new(create_test_store().await);

    let cluster = clusters
        .create(cluster_dto("test-cluster", &["1.0", "1.0", "1.1"], &["5.15", "5.15", "6.1"]))
        .await
        .unwrap();

    assert_eq!(cluster.kubelet_versions.len(), 2);
    assert_eq!(cluster.kubelet_versions.iter().filter(|v| *v == "1.0").count(), 1);
    assert_eq!(cluster.kubelet_versions.iter().filter(|v| *v == "1.1").count(), 1);
    assert_eq!(cluster.kernel_versions.len(), 2);
    // first-seen order
    assert_eq!(cluster.kernel_versions, vec!["5.15".to_string(), "6.1".to_string()]);
}

#[tokio::test]
async fn test_created_cluster_round_trips_through_get() {
    let clusters = ClusterInventory::new(create_test_store().await);

    let created = clusters
        .create(cluster_dto("prod-a", &["1.28"], &["5.15"]))
        .await
        .unwrap();
    let fetched = clusters.get_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.cluster_name, "prod-a");
    assert!(fetched.ingresses.is_empty());
    assert!(fetched.services.is_empty());
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[tokio::test]
async fn test_create_cluster_enforces_unique_name() {
    let clusters = ClusterInventory::new(create_test_store().await);
    clusters.create(cluster_dto("test-cluster", &["1.0"], &["5.15"])).await.unwrap();

    let err = clusters
        .create(cluster_dto("test-cluster", &["1.1"], &["6.1"]))
        .await
        .unwrap_err();

    assert!(err.is_conflict(), "expected conflict, got {:?}", err);
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_update_missing_cluster_is_not_found() {
    let clusters = ClusterInventory::new(create_test_store().await);

    let err = clusters
        .update(999999, cluster_dto("ghost", &[], &[]))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Cluster with ID 999999 not found");
}

#[tokio::test]
async fn test_update_cluster_rename_conflicts_only_with_other_clusters() {
    let clusters = ClusterInventory::new(create_test_store().await);
    let a = clusters.create(cluster_dto("alpha", &["1.0"], &[])).await.unwrap();
    clusters.create(cluster_dto("beta", &["1.0"], &[])).await.unwrap();

    // Переименование в занятое имя
    let err = clusters
        .update(a.id, cluster_dto("beta", &["1.0"], &[]))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // Собственное имя конфликтом не считается
    let same = clusters
        .update(a.id, cluster_dto("alpha", &["1.2", "1.2"], &["6.1"]))
        .await
        .unwrap();
    assert_eq!(same.cluster_name, "alpha");
    assert_eq!(same.kubelet_versions, vec!["1.2".to_string()]);

    let renamed = clusters
        .update(a.id, cluster_dto("gamma", &["1.2"], &["6.1"]))
        .await
        .unwrap();
    assert_eq!(renamed.cluster_name, "gamma");
    assert!(clusters.get_by_name("alpha").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_keeps_creation_timestamp() {
    let clusters = ClusterInventory::new(create_test_store().await);
    let created = clusters.create(cluster_dto("stamped", &["1.0"], &[])).await.unwrap();

    let updated = clusters
        .update(created.id, cluster_dto("stamped", &["1.1"], &[]))
        .await
        .unwrap();

    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.apiserver_version, "1.28.3");
}

#[tokio::test]
async fn test_update_returns_owned_children() {
    let store = create_test_store().await;
    let clusters = ClusterInventory::new(store.clone());
    let ingresses = IngressInventory::new(store.clone());

    let cluster = clusters.create(cluster_dto("parent", &["1.0"], &[])).await.unwrap();
    ingresses.create(ingress_dto("parent", "web", "frontend")).await.unwrap();

    let updated = clusters
        .update(cluster.id, cluster_dto("parent-renamed", &["1.0"], &[]))
        .await
        .unwrap();

    assert_eq!(updated.ingresses.len(), 1);
    assert_eq!(updated.ingresses[0].cluster_name, "parent-renamed");
}

#[tokio::test]
async fn test_delete_cluster_cascades_to_children() {
    let store = create_test_store().await;
    let clusters = ClusterInventory::new(store.clone());
    let ingresses = IngressInventory::new(store.clone());
    let services = ServiceInventory::new(store.clone());

    let cluster = clusters.create(cluster_dto("doomed", &["1.0"], &[])).await.unwrap();
    let ingress = ingresses.create(ingress_dto("doomed", "web", "frontend")).await.unwrap();
    let service = services.create(service_dto("doomed", "web", "frontend")).await.unwrap();

    clusters.delete(cluster.id).await.unwrap();

    assert!(clusters.get_by_id(cluster.id).await.unwrap().is_none());
    assert!(ingresses.list_by_cluster("doomed").await.unwrap().is_empty());
    assert!(services.list_by_cluster("doomed").await.unwrap().is_empty());
    assert!(ingresses.get_by_id(ingress.id).await.unwrap().is_none());
    assert!(services.get_by_id(service.id).await.unwrap().is_none());
    assert!(ingresses.delete(ingress.id).await.unwrap_err().is_not_found());
    assert!(services.delete(service.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_missing_cluster_is_not_found() {
    let clusters = ClusterInventory::new(create_test_store().await);

    let err = clusters.delete(42).await.unwrap_err();

    assert!(matches!(err, InventoryError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_leaves_other_clusters_untouched() {
    let store = create_test_store().await;
    let clusters = ClusterInventory::new(store.clone());
    let services = ServiceInventory::new(store.clone());

    let a = clusters.create(cluster_dto("a", &[], &[])).await.unwrap();
    clusters.create(cluster_dto("b", &[], &[])).await.unwrap();
    services.create(service_dto("a", "default", "api")).await.unwrap();
    services.create(service_dto("b", "default", "api")).await.unwrap();

    clusters.delete(a.id).await.unwrap();

    let remaining = services.list_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].cluster_name, "b");
}

#[tokio::test]
async fn test_list_all_embeds_children() {
    let store = create_test_store().await;
    let clusters = ClusterInventory::new(store.clone());
    let ingresses = IngressInventory::new(store.clone());
    let services = ServiceInventory::new(store.clone());

    clusters.create(cluster_dto("one", &["1.0"], &[])).await.unwrap();
    clusters.create(cluster_dto("two", &["1.1"], &[])).await.unwrap();
    ingresses.create(ingress_dto("one", "web", "site")).await.unwrap();
    ingresses.create(ingress_dto("one", "api", "site")).await.unwrap();
    services.create(service_dto("two", "db", "postgres")).await.unwrap();

    let snapshot = clusters.list_all().await.unwrap();

    assert_eq!(snapshot.len(), 2);
    let one = snapshot.iter().find(|c| c.cluster_name == "one").unwrap();
    let two = snapshot.iter().find(|c| c.cluster_name == "two").unwrap();
    assert_eq!(one.ingresses.len(), 2);
    assert!(one.services.is_empty());
    assert!(two.ingresses.is_empty());
    assert_eq!(two.services.len(), 1);
    assert!(one.ingresses.iter().all(|i| i.cluster_name == "one"));
}

#[tokio::test]
async fn test_get_by_name_and_list_by_cluster() {
    let clusters = ClusterInventory::new(create_test_store().await);
    clusters.create(cluster_dto("test-cluster", &["1.0"], &[])).await.unwrap();

    let found = clusters.get_by_name("test-cluster").await.unwrap();
    assert_eq!(found.map(|c| c.cluster_name), Some("test-cluster".to_string()));
    assert!(clusters.get_by_name("missing").await.unwrap().is_none());

    assert_eq!(clusters.list_by_cluster("test-cluster").await.unwrap().len(), 1);
    assert!(clusters.list_by_cluster("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_cluster_name_is_bad_request() {
    let clusters = ClusterInventory::new(create_test_store().await);

    let err = clusters.create(cluster_dto("   ", &[], &[])).await.unwrap_err();

    assert!(matches!(err, InventoryError::BadRequest(_)));
    assert!(clusters.list_all().await.unwrap().is_empty());
}
