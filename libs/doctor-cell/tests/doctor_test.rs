use std::sync::Arc;
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use doctor_cell::{DoctorQuery, DoctorService};
use shared_api::{ApiClient, NoToken};
use shared_config::ClientConfig;
use shared_models::error::ClientError;
use shared_utils::test_utils::MockApiResponses;

fn create_service(server: &MockServer) -> DoctorService {
    let config = ClientConfig::default().with_base_url(server.uri());
    DoctorService::new(Arc::new(ApiClient::new(&config, Arc::new(NoToken))))
}

#[tokio::test]
async fn test_list_doctors_with_filters() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doctors"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "9"))
        .and(query_param("search", "house"))
        .and(query_param("specialization", "Diagnostics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::paginated(
            vec![MockApiResponses::doctor_json("d1", "Gregory House", "Diagnostics")],
            2,
            3,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server);
    let query = DoctorQuery::default()
        .page(2)
        .search(Some("house"))
        .specialization(Some("Diagnostics"));

    let page = service.list_doctors(&query).await.unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].specialization, "Diagnostics");
    assert_eq!(page.pagination.current_page, 2);
    assert_eq!(page.pagination.total_pages, 3);
    assert!(page.pagination.has_next());
}

#[tokio::test]
async fn test_list_specializations() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/specializations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Cardiology", "Dermatology"])))
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server);
    let specializations = service.list_specializations().await.unwrap();

    assert_eq!(specializations, vec!["Cardiology".to_string(), "Dermatology".to_string()]);
}

#[tokio::test]
async fn test_server_failure_surfaces_as_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(503).set_body_json(MockApiResponses::error_response("Service unavailable")))
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server);
    let result = service.list_doctors(&DoctorQuery::default()).await;

    assert_matches!(result, Err(ClientError::Api { status: 503, .. }));
}
