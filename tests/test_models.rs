use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use cluster_inventory::models::{
    ClusterCreateDto, ClusterResponse, ErrorResponse, IngressCreateDto, ServiceCreateDto,
    ServiceResponse, ServiceType,
};

#[tokio::test]
async fn test_cluster_dto_deserialization_uses_camel_case() {
    let dto: ClusterCreateDto = serde_json::from_value(json!({
        "clusterName": "prod-a",
        "apiserverVersion": "1.28.3",
        "kubeletVersions": ["1.28.3"]
    }))
    .unwrap();

    assert_eq!(dto.cluster_name, "prod-a");
    assert_eq!(dto.kubelet_versions, vec!["1.28.3".to_string()]);
    // Отсутствующий список версий считается пустым
    assert!(dto.kernel_versions.is_empty());
    assert!(dto.validate().is_ok());
}

#[tokio::test]
async fn test_cluster_response_serialization() {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    let response = ClusterResponse {
        id: 7,
        cluster_name: "prod-a".to_string(),
        apiserver_version: "1.28.3".to_string(),
        kubelet_versions: vec!["1.28".to_string()],
        kernel_versions: vec![],
        ingresses: vec![],
        services: vec![],
        created_at: timestamp,
        updated_at: timestamp,
    };

    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["id"], 7);
    assert_eq!(value["clusterName"], "prod-a");
    assert_eq!(value["apiserverVersion"], "1.28.3");
    assert_eq!(value["kubeletVersions"], json!(["1.28"]));
    assert_eq!(value["createdAt"], "2024-01-15T10:30:00Z");
    assert!(value["ingresses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_service_type_wire_names() {
    assert_eq!(serde_json::to_value(ServiceType::ClusterIp).unwrap(), "ClusterIP");
    assert_eq!(serde_json::to_value(ServiceType::LoadBalancer).unwrap(), "LoadBalancer");
    assert_eq!(serde_json::to_value(ServiceType::NodePort).unwrap(), "NodePort");
    assert_eq!(serde_json::to_value(ServiceType::ExternalName).unwrap(), "ExternalName");

    for service_type in ServiceType::ALL {
        let parsed: ServiceType = service_type.as_str().parse().unwrap();
        assert_eq!(parsed, service_type);
        assert_eq!(service_type.to_string(), service_type.as_str());
    }
}

#[tokio::test]
async fn test_unknown_service_type_is_rejected() {
    let result: Result<ServiceCreateDto, _> = serde_json::from_value(json!({
        "clusterName": "prod-a",
        "namespace": "web",
        "serviceName": "frontend",
        "serviceType": "clusterip"
    }));
    assert!(result.is_err());

    let err = "Headless".parse::<ServiceType>().unwrap_err();
    assert!(err.to_string().contains("Headless"));
}

#[tokio::test]
async fn test_service_dto_optional_fields() {
    let dto: ServiceCreateDto = serde_json::from_value(json!({
        "clusterName": "prod-a",
        "namespace": "web",
        "serviceName": "frontend",
        "externalIp": " "
    }))
    .unwrap();

    assert!(dto.service_type.is_none());
    assert!(dto.ports.is_empty());
    assert_eq!(dto.normalized_external_ip(), None);
}

#[tokio::test]
async fn test_service_response_round_trip() {
    let raw = json!({
        "id": 3,
        "clusterName": "prod-a",
        "namespace": "web",
        "serviceName": "frontend",
        "externalIp": "34.1.2.3",
        "ports": [80, 443],
        "serviceType": "NodePort",
        "createdAt": "2024-01-15T10:30:00Z",
        "updatedAt": "2024-01-15T10:30:00Z"
    });

    let service: ServiceResponse = serde_json::from_value(raw.clone()).unwrap();

    assert_eq!(service.service_type, Some(ServiceType::NodePort));
    assert_eq!(serde_json::to_value(&service).unwrap(), raw);
}

#[tokio::test]
async fn test_dto_validation() {
    let blank_namespace = IngressCreateDto {
        cluster_name: "prod-a".to_string(),
        namespace: "".to_string(),
        ingress_name: "gateway".to_string(),
        hosts: vec![],
        ports: vec![],
    };
    assert!(blank_namespace.validate().is_err());

    let bad_port = IngressCreateDto {
        namespace: "web".to_string(),
        ports: vec![0],
        ..blank_namespace
    };
    assert!(bad_port.validate().is_err());

    let valid = IngressCreateDto {
        ports: vec![1, 65535],
        ..bad_port
    };
    assert!(valid.validate().is_ok());
}

#[tokio::test]
async fn test_error_response_shape() {
    let error = ErrorResponse {
        error: "Conflict".to_string(),
        message: Some("A cluster with name 'prod-a' already exists".to_string()),
    };

    let value: Value = serde_json::to_value(&error).unwrap();

    assert_eq!(value["error"], "Conflict");
    assert_eq!(value["message"], "A cluster with name 'prod-a' already exists");
}

#[tokio::test]
async fn test_cluster_dto_accepts_collector_agent_payload() {
    // Тело, которое отправляет агент сбора информации о кластере
    let body = r#"{
        "clusterName": "prod-a",
        "apiServerVersion": "v1.28.3",
        "kubeletVersions": ["v1.28.3", "v1.28.3"],
        "kernelVersions": ["5.15.0-1051-azure"]
    }"#;

    let dto: ClusterCreateDto = serde_json::from_str(body).unwrap();

    assert_eq!(dto.cluster_name, "prod-a");
    assert_eq!(dto.apiserver_version, "v1.28.3");
    assert_eq!(dto.kubelet_versions.len(), 2);
    assert!(dto.validate().is_ok());

    // Ответ по-прежнему использует каноническое имя поля
    let value = serde_json::to_value(&dto).unwrap();
    assert_eq!(value["apiserverVersion"], "v1.28.3");
    assert!(value.get("apiServerVersion").is_none());
}
