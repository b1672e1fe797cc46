use std::io::Cursor;
use std::str::FromStr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::{Extension, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use mtsk_core::service::{AccessPolicy, DashboardService};
use mtsk_core::snapshot::BackendSnapshot;
use mtsk_core::store::InMemoryStore;
use mtsk_dashboard::{with_dashboard_routes, AppState};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

const EXPORT: &str = include_str!("../crates/mtsk-core/tests/fixtures/backend_export.json");
const ADMIN: &str = "admin@surucukursu.com";

fn app() -> (Router, AppState) {
    let snapshot = BackendSnapshot::from_reader(Cursor::new(EXPORT)).expect("fixture parses");
    let service = Arc::new(DashboardService::new(
        Arc::new(InMemoryStore::new(snapshot)),
        AccessPolicy::new(ADMIN),
    ));
    let state = AppState::new(PrometheusBuilder::new().build_recorder().handle());
    let router = with_dashboard_routes(service).layer(Extension(state.clone()));
    (router, state)
}

fn get(uri: &str, operator: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(email) = operator {
        builder = builder.header("x-operator-email", email);
    }
    builder.body(Body::empty()).expect("request builds")
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(raw) => Decimal::from_str(raw).expect("decimal string"),
        other => Decimal::from_str(&other.to_string()).expect("decimal number"),
    }
}

#[tokio::test]
async fn health_and_readiness_endpoints_report_status() {
    let (router, state) = app();
    let response = router
        .clone()
        .oneshot(get("/health", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(get("/ready", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    state.readiness.store(true, Ordering::Release);
    let response = router
        .oneshot(get("/ready", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "status": "ready" }));
}

#[tokio::test]
async fn admin_overview_spans_the_network() {
    let (router, _) = app();
    let response = router
        .oneshot(get("/api/v1/overview", Some(ADMIN)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["total_candidates"], 83);
    assert_eq!(decimal(&payload["total_fee"]), Decimal::from(1_095_000));
    assert!(payload.get("school").is_none());

    let labels: Vec<_> = payload["announcements"]
        .as_array()
        .expect("announcements")
        .iter()
        .map(|announcement| announcement["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(labels, vec!["-O1meeting", "-O2fees", "-O3prices"]);
}

#[tokio::test]
async fn fee_updates_flow_into_the_report() {
    let (router, _) = app();
    let fees = json!({
        "B": 16000,
        "A1": 12000,
        "A2": 12000,
        "C": 15000,
        "D": 15000,
        "FARK_A1": 10000,
        "FARK_A2": 12000,
        "BAKANLIK_A1": 7500
    });
    let response = router
        .clone()
        .oneshot(
            Request::put("/api/v1/fees")
                .header("x-operator-email", ADMIN)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&fees).expect("serialize")))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get("/api/v1/report", Some(ADMIN)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["rows"].as_array().map(Vec::len), Some(5));
    assert_eq!(payload["total_candidates"], 83);
    assert_eq!(decimal(&payload["total_fee"]), Decimal::from(1_146_000));
}

#[tokio::test]
async fn school_operators_cannot_change_fees() {
    let (router, _) = app();
    let response = router
        .oneshot(
            Request::put("/api/v1/fees")
                .header("x-operator-email", "bigalidermtsk@biga.com")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"B": 1}"#))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().is_some());
}
