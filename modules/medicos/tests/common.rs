#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use medicos::infra::storage::migrations::Migrator;
use medicos::{MedicosConfig, MedicosModule};

/// Fresh in-memory SQLite database with migrations applied.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_module() -> MedicosModule {
    create_test_module_with(MedicosConfig::default()).await
}

pub async fn create_test_module_with(cfg: MedicosConfig) -> MedicosModule {
    MedicosModule::new(create_test_db().await, cfg)
}

pub fn registration(name: &str, document_id: &str, email: &str) -> Value {
    json!({
        "name": name,
        "documentId": document_id,
        "email": email,
        "phone": "81999990000",
        "specialty": "CARDIOLOGY",
        "address": {
            "street": "Rua das Flores",
            "number": "10",
            "complement": null,
            "district": "Boa Vista",
            "city": "Recife",
            "zip": "50050-000"
        }
    })
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one request through the router. A non-JSON or empty body reads as `Value::Null`.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    send_raw(app, method, uri, body.map(|b| b.to_string())).await
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(raw) => builder
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        body,
    }
}
