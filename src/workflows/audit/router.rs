use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::catalog::{NavGroup, SectionView};
use super::completion::score_completion;
use super::domain::{
    AuditRecordId, CompanyId, CompanyInfo, Department, EmissionsEstimate, FieldMap,
};
use super::emissions::{calculate_emissions, calculate_it_breakdown, ItEmissionsBreakdown};
use super::service::{AuditService, AuditServiceError};
use super::store::{AuditStore, StoreError};

/// Router builder exposing the calculation engine and record management.
pub fn audit_router<S>(service: Arc<AuditService<S>>) -> Router
where
    S: AuditStore + 'static,
{
    Router::new()
        .route("/api/v1/catalog/:department", get(catalog_handler::<S>))
        .route("/api/v1/audit/score", post(score_handler))
        .route("/api/v1/audit/emissions", post(emissions_handler))
        .route(
            "/api/v1/companies/:company_id/audits",
            get(list_handler::<S>),
        )
        .route(
            "/api/v1/companies/:company_id/audits/:department",
            get(record_handler::<S>).put(save_handler::<S>),
        )
        .route("/api/v1/audits/:audit_id", delete(delete_handler::<S>))
        .route(
            "/api/v1/companies/:company_id/info",
            get(company_info_handler::<S>).put(save_company_info_handler::<S>),
        )
        .route(
            "/api/v1/companies/:company_id/summary",
            get(summary_handler::<S>),
        )
        .route(
            "/api/v1/companies/:company_id/report",
            get(report_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct CatalogView<'a> {
    department: Department,
    label: &'static str,
    declared_fields: usize,
    groups: &'a [NavGroup],
    sections: Vec<SectionView<'a>>,
}

#[derive(Debug, Deserialize)]
pub struct EmissionsRequest {
    pub department: String,
    #[serde(default)]
    pub fields: FieldMap,
}

#[derive(Debug, Serialize)]
pub struct EmissionsResponse {
    pub department: Department,
    #[serde(flatten)]
    pub estimate: EmissionsEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub it_breakdown: Option<ItEmissionsBreakdown>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub date: Option<String>,
}

pub(crate) async fn catalog_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path(department): Path<String>,
) -> Response
where
    S: AuditStore + 'static,
{
    let Some(department) = Department::from_id(&department) else {
        return unknown_department(&department);
    };

    let catalog = service.catalog();
    let view = CatalogView {
        department,
        label: department.label(),
        declared_fields: catalog.declared_field_count(department),
        groups: catalog.groups(),
        sections: catalog.sections_for(department),
    };
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn score_handler(axum::Json(fields): axum::Json<FieldMap>) -> Response {
    (StatusCode::OK, axum::Json(score_completion(&fields))).into_response()
}

pub(crate) async fn emissions_handler(
    axum::Json(request): axum::Json<EmissionsRequest>,
) -> Response {
    let Some(department) = Department::from_id(&request.department) else {
        return unknown_department(&request.department);
    };

    let response = EmissionsResponse {
        department,
        estimate: calculate_emissions(department, &request.fields),
        it_breakdown: (department == Department::It)
            .then(|| calculate_it_breakdown(&request.fields)),
    };
    (StatusCode::OK, axum::Json(response)).into_response()
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path(company_id): Path<String>,
) -> Response
where
    S: AuditStore + 'static,
{
    match service.list(&CompanyId(company_id)) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn record_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path((company_id, department)): Path<(String, String)>,
) -> Response
where
    S: AuditStore + 'static,
{
    let Some(department) = Department::from_id(&department) else {
        return unknown_department(&department);
    };

    match service.record(&CompanyId(company_id), department) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("no audit saved for department '{department}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => service_error(error),
    }
}

pub(crate) async fn save_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path((company_id, department)): Path<(String, String)>,
    axum::Json(fields): axum::Json<FieldMap>,
) -> Response
where
    S: AuditStore + 'static,
{
    let Some(department) = Department::from_id(&department) else {
        return unknown_department(&department);
    };

    match service.save(CompanyId(company_id), department, fields) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path(audit_id): Path<String>,
) -> Response
where
    S: AuditStore + 'static,
{
    match service.delete(&AuditRecordId(audit_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn company_info_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path(company_id): Path<String>,
) -> Response
where
    S: AuditStore + 'static,
{
    match service.company_info(&CompanyId(company_id)) {
        Ok(info) => (StatusCode::OK, axum::Json(info.unwrap_or_default())).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn save_company_info_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path(company_id): Path<String>,
    axum::Json(info): axum::Json<CompanyInfo>,
) -> Response
where
    S: AuditStore + 'static,
{
    match service.save_company_info(&CompanyId(company_id), info) {
        Ok(info) => (StatusCode::OK, axum::Json(info)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn summary_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path(company_id): Path<String>,
) -> Response
where
    S: AuditStore + 'static,
{
    let summary = service.summary(&CompanyId(company_id));
    (StatusCode::OK, axum::Json(summary)).into_response()
}

pub(crate) async fn report_handler<S>(
    State(service): State<Arc<AuditService<S>>>,
    Path(company_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    S: AuditStore + 'static,
{
    let generated_on = match query.date.as_deref() {
        Some(raw) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(error) => {
                let payload = json!({
                    "error": format!("failed to parse '{raw}' as YYYY-MM-DD ({error})"),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => Utc::now().date_naive(),
    };

    let document = service.report(&CompanyId(company_id), generated_on);
    (StatusCode::OK, axum::Json(document)).into_response()
}

fn unknown_department(raw: &str) -> Response {
    let payload = json!({
        "error": format!("unknown department '{raw}'"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn service_error(error: AuditServiceError) -> Response {
    let status = match &error {
        AuditServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        AuditServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
