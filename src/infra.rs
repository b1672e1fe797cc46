use metrics_exporter_prometheus::PrometheusHandle;
use mtsk_core::error::AppError;
use mtsk_core::snapshot::BackendSnapshot;
use mtsk_core::store::InMemoryStore;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Shared state for the operational endpoints.
#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
        }
    }
}

/// Seeds the in-memory store from a backend export, or starts empty.
pub(crate) fn seed_store(snapshot_path: Option<&Path>) -> Result<InMemoryStore, AppError> {
    let snapshot = match snapshot_path {
        Some(path) => {
            let snapshot = BackendSnapshot::from_path(path)?;
            info!(
                path = %path.display(),
                schools = snapshot.schools.len(),
                announcements = snapshot.announcements.len(),
                "backend snapshot loaded"
            );
            snapshot
        }
        None => BackendSnapshot::default(),
    };
    Ok(InMemoryStore::new(snapshot))
}
