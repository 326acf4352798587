use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::request_id::XRequestId;
use api_ingress::{ApiIngress, ApiIngressConfig};

fn app(config: ApiIngressConfig) -> Router {
    let routes = Router::new()
        .route("/echo-id", get(echo_request_id))
        .route("/upload", post(accept_body))
        .route("/slow", get(slow))
        .route("/stuck", get(std::future::pending::<()>));

    let doc = utoipa::openapi::OpenApiBuilder::new().build();
    ApiIngress::new(config).with_openapi(doc).build_router(routes)
}

async fn echo_request_id(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> Json<serde_json::Value> {
    Json(json!({ "request_id": request_id }))
}

async fn accept_body(body: String) -> String {
    body
}

async fn slow() -> &'static str {
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    "done"
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn generates_request_id_when_missing() {
    let response = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/echo-id").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header.is_empty());

    // the handler sees the same id that goes back to the client
    let json = body_json(response).await;
    assert_eq!(json["request_id"], header.as_str());
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let response = app(ApiIngressConfig::default())
        .oneshot(
            Request::builder()
                .uri("/echo-id")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok());
    assert_eq!(request_id, Some("abc-123"));
    assert_eq!(body_json(response).await["request_id"], "abc-123");
}

#[tokio::test]
async fn health_endpoints_respond() {
    for uri in ["/health", "/healthz"] {
        let response = app(ApiIngressConfig::default())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn openapi_document_only_when_docs_enabled() {
    let disabled = app(ApiIngressConfig::default())
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(disabled.status(), StatusCode::NOT_FOUND);

    let enabled = app(ApiIngressConfig {
        enable_docs: true,
        ..Default::default()
    })
    .oneshot(
        Request::builder()
            .uri("/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(enabled.status(), StatusCode::OK);
    let json = body_json(enabled).await;
    assert!(json["openapi"].is_string());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ApiIngressConfig {
        body_limit_bytes: 8,
        ..Default::default()
    };
    let payload = "x".repeat(64);
    let response = app(config)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload")
                .header("content-length", payload.len())
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn stuck_handler_times_out_with_408() {
    let config = ApiIngressConfig {
        request_timeout_sec: 1,
        ..Default::default()
    };
    let response = app(config)
        .oneshot(Request::builder().uri("/stuck").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn zero_timeout_disables_the_limit() {
    let config = ApiIngressConfig {
        request_timeout_sec: 0,
        ..Default::default()
    };
    let response = app(config)
        .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
