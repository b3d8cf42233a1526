use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::error::AppError;
use crate::workflows::audit::{InMemoryAuditStore, QuestionCatalog};
use crate::workflows::snapshot::SnapshotImporter;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory store, optionally pre-loaded from a CSV snapshot.
pub(crate) fn seeded_store(
    catalog: &QuestionCatalog,
    snapshot_path: Option<&Path>,
) -> Result<InMemoryAuditStore, AppError> {
    let store = InMemoryAuditStore::new();
    if let Some(path) = snapshot_path {
        let snapshot = SnapshotImporter::from_path(path, catalog)?;
        let saved = snapshot.seed(&store)?;
        tracing::info!(
            path = %path.display(),
            records = saved,
            "audit store seeded from snapshot"
        );
    }
    Ok(store)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
