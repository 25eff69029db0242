// libs/shared/backend/tests/client_test.rs

use reqwest::Method;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_backend::client::BackendClient;
use shared_utils::test_utils::TestConfig;

#[tokio::test]
async fn request_sends_api_key_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/ping"))
        .and(header("x-api-key", "test-api-key"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let config = TestConfig::default()
        .with_base_url(&server.uri())
        .to_app_config();
    let client = BackendClient::new(&config);

    let body: Value = client
        .request(Method::GET, "/api/v1/ping", Some("secret-token"), None)
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn execute_posts_body_and_ignores_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/flag"))
        .and(body_json(json!({ "active": false })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = TestConfig::default()
        .with_base_url(&server.uri())
        .to_app_config();
    let client = BackendClient::new(&config);

    client
        .execute(
            Method::PATCH,
            "/api/v1/flag",
            Some("secret-token"),
            Some(json!({ "active": false })),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn non_success_status_becomes_an_error_with_the_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let config = TestConfig::default()
        .with_base_url(&server.uri())
        .to_app_config();
    let client = BackendClient::new(&config);

    let err = client
        .request::<Value>(Method::GET, "/api/v1/ping", None, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("upstream exploded"));
}
