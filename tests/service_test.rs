//! Connect-token proxy and webhook forwarding over a live listener.

use pleme_cadastro::service::{app, AppState, ServiceConfig};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(upstream: &MockServer, forward: Option<Url>) -> ServiceConfig {
    ServiceConfig {
        port: 0,
        pluggy_base_url: Url::parse(&upstream.uri()).expect("mock uri"),
        client_id: Some("client-id".to_string()),
        client_secret: Some("client-secret".to_string()),
        webhook_forward_url: forward,
    }
}

async fn spawn(config: ServiceConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(AppState::new(config)))
            .await
            .expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn connect_token_exchange_happy_path() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_json(json!({
            "clientId": "client-id",
            "clientSecret": "client-secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "apiKey": "api-key-1" })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/connect_token"))
        .and(header("X-API-KEY", "api-key-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "token-abc" })),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let base = spawn(config_for(&upstream, None)).await;

    let response = reqwest::get(format!("{base}/api/get-connect-token"))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body, json!({ "connectToken": "token-abc" }));
}

#[tokio::test]
async fn missing_credentials_yield_configuration_error() {
    let upstream = MockServer::start().await;
    let mut config = config_for(&upstream, None);
    config.client_id = None;

    let base = spawn(config).await;
    let response = reqwest::get(format!("{base}/api/get-connect-token"))
        .await
        .expect("request");
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body, json!({ "error": "Server configuration error." }));
}

#[tokio::test]
async fn upstream_auth_failure_passes_the_status_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&upstream)
        .await;

    let base = spawn(config_for(&upstream, None)).await;
    let response = reqwest::get(format!("{base}/api/get-connect-token"))
        .await
        .expect("request");
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(
        body,
        json!({ "error": "Failed to authenticate with service provider." })
    );
}

#[tokio::test]
async fn webhook_is_acknowledged_and_forwarded() {
    let upstream = MockServer::start().await;
    let forward = MockServer::start().await;
    let event = json!({ "event": "item/created", "itemId": "abc-123" });
    Mock::given(method("POST"))
        .and(body_json(event.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&forward)
        .await;

    let forward_url = Url::parse(&forward.uri()).expect("forward uri");
    let base = spawn(config_for(&upstream, Some(forward_url))).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/webhook"))
        .json(&event)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "Webhook received");
}

#[tokio::test]
async fn webhook_is_acknowledged_even_when_forwarding_fails() {
    let upstream = MockServer::start().await;
    let forward = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&forward)
        .await;

    let forward_url = Url::parse(&forward.uri()).expect("forward uri");
    let base = spawn(config_for(&upstream, Some(forward_url))).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/webhook"))
        .json(&json!({ "event": "item/error" }))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
}
