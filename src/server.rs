use crate::cli::ServeArgs;
use crate::infra::{seed_store, AppState};
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mtsk_core::config::AppConfig;
use mtsk_core::error::AppError;
use mtsk_core::service::{AccessPolicy, DashboardService};
use mtsk_core::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(snapshot) = args.snapshot.take() {
        config.dashboard.snapshot_path = Some(snapshot);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::new(prometheus_handle);
    let readiness_flag = app_state.readiness.clone();

    let store = Arc::new(seed_store(config.dashboard.snapshot_path.as_deref())?);
    let policy = AccessPolicy::new(config.dashboard.admin_email.clone());
    let service = Arc::new(DashboardService::new(store, policy));

    let app = with_dashboard_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mtsk dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
