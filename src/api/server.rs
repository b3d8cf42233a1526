use super::cli::ServeArgs;
use super::infra::{seeded_store, AppState};
use super::routes::with_audit_routes;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::telemetry;
use crate::workflows::audit::{AuditService, QuestionCatalog};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = QuestionCatalog::load()?;
    let store = seeded_store(&catalog, config.storage.snapshot_path.as_deref())?;
    let audit_service = Arc::new(AuditService::new(Arc::new(store), Arc::new(catalog)));

    let app = with_audit_routes(audit_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "co2e audit service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
