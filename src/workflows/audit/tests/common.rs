use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::audit::catalog::QuestionCatalog;
use crate::workflows::audit::domain::{
    AuditRecord, AuditRecordId, AuditRecordSummary, CompanyId, CompanyInfo, Department, FieldMap,
    FieldValue,
};
use crate::workflows::audit::store::{AuditStore, InMemoryAuditStore, StoreError};
use crate::workflows::audit::{audit_router, AuditService};

pub(super) fn company() -> CompanyId {
    CompanyId("northwind".to_string())
}

pub(super) fn catalog() -> Arc<QuestionCatalog> {
    Arc::new(QuestionCatalog::load().expect("standard catalog is valid"))
}

pub(super) fn fields(entries: &[(&str, FieldValue)]) -> FieldMap {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub(super) fn office_fields() -> FieldMap {
    fields(&[
        ("annual_electricity", FieldValue::Number(12_500.0)),
        ("annual_natural_gas", FieldValue::Number(1_000.0)),
        ("primary_location", FieldValue::from("Leeds")),
        ("facility_count", FieldValue::from("0")),
    ])
}

/// Reference IT inputs; 4.04712 t CO2e with 8,760 kWh of on-prem hardware.
pub(super) fn it_fields() -> FieldMap {
    fields(&[
        ("it_servers_count", FieldValue::Number(2.0)),
        ("it_servers_watts", FieldValue::Number(500.0)),
        ("it_servers_hours", FieldValue::Number(24.0)),
        ("it_cloud_provider", FieldValue::from("none")),
    ])
}

pub(super) fn build_service() -> (AuditService<InMemoryAuditStore>, Arc<InMemoryAuditStore>) {
    let store = Arc::new(InMemoryAuditStore::new());
    let service = AuditService::new(store.clone(), catalog());
    (service, store)
}

pub(super) fn audit_router_with_service(
    service: AuditService<InMemoryAuditStore>,
) -> axum::Router {
    audit_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("database offline".to_string())
}

pub(super) struct UnavailableStore;

impl AuditStore for UnavailableStore {
    fn get_record(
        &self,
        _company: &CompanyId,
        _department: Department,
    ) -> Result<Option<AuditRecord>, StoreError> {
        Err(unavailable())
    }

    fn list_records(&self, _company: &CompanyId) -> Result<Vec<AuditRecordSummary>, StoreError> {
        Err(unavailable())
    }

    fn save_record(&self, _record: AuditRecord) -> Result<AuditRecord, StoreError> {
        Err(unavailable())
    }

    fn delete_record(&self, _id: &AuditRecordId) -> Result<(), StoreError> {
        Err(unavailable())
    }

    fn get_company_info(&self, _company: &CompanyId) -> Result<Option<CompanyInfo>, StoreError> {
        Err(unavailable())
    }

    fn save_company_info(
        &self,
        _company: &CompanyId,
        _info: CompanyInfo,
    ) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

/// Delegates to an in-memory store but fails reads for one department.
pub(super) struct FlakyStore {
    pub(super) inner: InMemoryAuditStore,
    pub(super) failing: Department,
}

impl AuditStore for FlakyStore {
    fn get_record(
        &self,
        company: &CompanyId,
        department: Department,
    ) -> Result<Option<AuditRecord>, StoreError> {
        if department == self.failing {
            return Err(unavailable());
        }
        self.inner.get_record(company, department)
    }

    fn list_records(&self, company: &CompanyId) -> Result<Vec<AuditRecordSummary>, StoreError> {
        self.inner.list_records(company)
    }

    fn save_record(&self, record: AuditRecord) -> Result<AuditRecord, StoreError> {
        self.inner.save_record(record)
    }

    fn delete_record(&self, id: &AuditRecordId) -> Result<(), StoreError> {
        self.inner.delete_record(id)
    }

    fn get_company_info(&self, company: &CompanyId) -> Result<Option<CompanyInfo>, StoreError> {
        self.inner.get_company_info(company)
    }

    fn save_company_info(&self, company: &CompanyId, info: CompanyInfo) -> Result<(), StoreError> {
        self.inner.save_company_info(company, info)
    }
}
