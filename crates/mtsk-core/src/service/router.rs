use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::{DashboardService, ServiceError, Session};
use crate::domain::{AnnouncementId, FeeTable, LicenseClass, MoveDirection, School};
use crate::error::AppError;
use crate::report::views::AnnouncementView;
use crate::report::{DashboardOverview, DetailedReportView, ReportLayout};
use crate::snapshot::fee_table_from_raw;
use crate::store::DashboardStore;

/// Header carrying the e-mail the external auth provider signed in.
pub const OPERATOR_HEADER: &str = "x-operator-email";

/// Router builder exposing the dashboard endpoints.
pub fn dashboard_router<S>(service: Arc<DashboardService<S>>) -> Router
where
    S: DashboardStore + 'static,
{
    Router::new()
        .route("/api/v1/overview", get(overview_handler::<S>))
        .route("/api/v1/report", get(report_handler::<S>))
        .route("/api/v1/report.csv", get(report_csv_handler::<S>))
        .route("/api/v1/candidates", post(candidates_handler::<S>))
        .route("/api/v1/candidates/reset", post(reset_handler::<S>))
        .route("/api/v1/fees", put(fees_handler::<S>))
        .route("/api/v1/announcements", get(announcements_handler::<S>))
        .route(
            "/api/v1/announcements/:announcement_id/move",
            post(move_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    layout: ReportLayout,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateChangeRequest {
    class: LicenseClass,
    delta: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveRequest {
    direction: MoveDirection,
}

/// Runs `action` inside a session scoped to this request.
fn with_session<S, T>(
    service: &Arc<DashboardService<S>>,
    headers: &HeaderMap,
    action: impl FnOnce(&Session) -> Result<T, ServiceError>,
) -> Result<T, AppError>
where
    S: DashboardStore + 'static,
{
    let email = headers
        .get(OPERATOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ServiceError::MissingOperator)?;

    let session = service.open_session(email)?;
    let outcome = action(&session);
    service.close_session(session);
    Ok(outcome?)
}

pub(crate) async fn overview_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    headers: HeaderMap,
) -> Result<Json<DashboardOverview>, AppError>
where
    S: DashboardStore + 'static,
{
    with_session(&service, &headers, |session| service.overview(session)).map(Json)
}

pub(crate) async fn report_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Json<DetailedReportView>, AppError>
where
    S: DashboardStore + 'static,
{
    let report = with_session(&service, &headers, |session| {
        service.detailed_report(session)
    })?;
    Ok(Json(report.summary(query.layout)))
}

pub(crate) async fn report_csv_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError>
where
    S: DashboardStore + 'static,
{
    let report = with_session(&service, &headers, |session| {
        service.detailed_report(session)
    })?;

    let mut body = Vec::new();
    report.write_csv(&mut body, query.layout)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response())
}

pub(crate) async fn candidates_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    headers: HeaderMap,
    Json(request): Json<CandidateChangeRequest>,
) -> Result<Json<School>, AppError>
where
    S: DashboardStore + 'static,
{
    with_session(&service, &headers, |session| {
        service.change_candidates(session, request.class, request.delta)
    })
    .map(Json)
}

pub(crate) async fn reset_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: DashboardStore + 'static,
{
    let reset = with_session(&service, &headers, |session| {
        service.reset_candidates(session)
    })?;
    Ok(Json(json!({ "schools_reset": reset })))
}

pub(crate) async fn fees_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    headers: HeaderMap,
    Json(raw): Json<BTreeMap<String, Value>>,
) -> Result<Json<FeeTable>, AppError>
where
    S: DashboardStore + 'static,
{
    let fees = fee_table_from_raw(&raw);
    with_session(&service, &headers, |session| {
        service.update_fees(session, fees)
    })
    .map(Json)
}

pub(crate) async fn announcements_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AnnouncementView>>, AppError>
where
    S: DashboardStore + 'static,
{
    let announcements = with_session(&service, &headers, |session| {
        service.announcements(session)
    })?;
    Ok(Json(
        announcements.iter().map(AnnouncementView::from).collect(),
    ))
}

pub(crate) async fn move_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    headers: HeaderMap,
    Path(announcement_id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<Vec<AnnouncementView>>, AppError>
where
    S: DashboardStore + 'static,
{
    let id = AnnouncementId(announcement_id);
    let moved = with_session(&service, &headers, |session| {
        service.move_announcement(session, &id, request.direction)
    })?;
    Ok(Json(moved.iter().map(AnnouncementView::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Announcement, AnnouncementKind, CandidateCounts};
    use crate::service::AccessPolicy;
    use crate::snapshot::BackendSnapshot;
    use crate::store::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    const ADMIN: &str = "admin@surucukursu.com";
    const LIDER: &str = "lider@biga.com";

    fn announcement(id: &str, order: u32) -> Announcement {
        Announcement {
            id: AnnouncementId::new(id),
            content: format!("duyuru {id}"),
            kind: AnnouncementKind::Meeting,
            order,
            created_at: Utc
                .timestamp_millis_opt(1_717_000_000_000)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn build_router() -> (Router, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new(BackendSnapshot {
            schools: vec![
                School::new("1", "ÖZEL BİGA LİDER MTSK", LIDER).with_candidates(
                    CandidateCounts::new()
                        .with(LicenseClass::B, 12)
                        .with(LicenseClass::FarkA1, 3),
                ),
                School::new("2", "ÖZEL BİGA GÖZDE MTSK", "gozde@biga.com"),
            ],
            fees: FeeTable::reference(),
            announcements: vec![announcement("a", 0), announcement("b", 1)],
        }));
        let service = Arc::new(DashboardService::new(
            store.clone(),
            AccessPolicy::new(ADMIN),
        ));
        (dashboard_router(service), store)
    }

    fn request(
        method: &str,
        uri: &str,
        operator: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = operator {
            builder = builder.header(OPERATOR_HEADER, email);
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).expect("serialize body")))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        }
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn requests_without_operator_are_unauthorized() {
        let (router, _) = build_router();
        let response = router
            .oneshot(request("GET", "/api/v1/overview", None, None))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let (router, _) = build_router();
        let response = router
            .oneshot(request("GET", "/api/v1/overview", Some("stranger@x.com"), None))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn overview_reports_own_standing() {
        let (router, _) = build_router();
        let response = router
            .oneshot(request("GET", "/api/v1/overview", Some(LIDER), None))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json_body(response).await;
        assert_eq!(payload["total_candidates"], 15);
        assert_eq!(payload["school"]["quota"]["b_quota"], 18);
        assert_eq!(payload["school"]["quota"]["difference_quota"], 12);
        assert_eq!(payload["announcements"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn candidate_changes_are_persisted() {
        let (router, store) = build_router();
        let response = router
            .oneshot(request(
                "POST",
                "/api/v1/candidates",
                Some(LIDER),
                Some(serde_json::json!({ "class": "B", "delta": -20 })),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let schools = store.schools().expect("read");
        assert_eq!(schools[0].candidates.count(LicenseClass::B), 0);
        assert_eq!(schools[0].candidates.count(LicenseClass::FarkA1), 3);
    }

    #[tokio::test]
    async fn fee_updates_merge_and_skip_unknown_classes() {
        let (router, store) = build_router();
        let response = router
            .oneshot(request(
                "PUT",
                "/api/v1/fees",
                Some(ADMIN),
                Some(serde_json::json!({ "B": 16000, "A2": "13000", "TRUCK": 5 })),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let fees = store.fee_table().expect("read");
        assert_eq!(fees.fee(LicenseClass::B), Decimal::from(16_000));
        assert_eq!(fees.fee(LicenseClass::A2), Decimal::from(13_000));
        assert_eq!(fees.fee(LicenseClass::A1), Decimal::from(12_000));
        assert_eq!(fees.iter().count(), LicenseClass::COUNT);
    }

    #[tokio::test]
    async fn admin_only_routes_reject_school_operators() {
        let (router, _) = build_router();
        let response = router
            .oneshot(request("POST", "/api/v1/candidates/reset", Some(LIDER), None))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let (router, store) = build_router();
        let response = router
            .oneshot(request("POST", "/api/v1/candidates/reset", Some(ADMIN), None))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await["schools_reset"], 2);
        assert_eq!(
            crate::aggregation::total_candidates(&store.schools().expect("read")),
            0
        );
    }

    #[tokio::test]
    async fn compact_report_and_csv_export() {
        let (router, _) = build_router();
        let response = router
            .oneshot(request("GET", "/api/v1/report?layout=compact", Some(ADMIN), None))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["layout"], "compact");
        assert_eq!(payload["rows"].as_array().map(Vec::len), Some(2));

        let (router, _) = build_router();
        let response = router
            .oneshot(request("GET", "/api/v1/report.csv", Some(ADMIN), None))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/csv; charset=utf-8")
        );
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let text = String::from_utf8(body.to_vec()).expect("utf-8 csv");
        assert!(text.starts_with("MTSK,"));
    }

    #[tokio::test]
    async fn moving_announcements_renumbers_and_reports_unknown_ids() {
        let (router, store) = build_router();
        let response = router
            .oneshot(request(
                "POST",
                "/api/v1/announcements/b/move",
                Some(ADMIN),
                Some(serde_json::json!({ "direction": "up" })),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let ordered: Vec<_> = store
            .announcements()
            .expect("read")
            .into_iter()
            .map(|a| (a.id.0, a.order))
            .collect();
        assert_eq!(ordered, vec![("b".to_string(), 0), ("a".to_string(), 1)]);

        let (router, _) = build_router();
        let response = router
            .oneshot(request(
                "POST",
                "/api/v1/announcements/missing/move",
                Some(ADMIN),
                Some(serde_json::json!({ "direction": "down" })),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
