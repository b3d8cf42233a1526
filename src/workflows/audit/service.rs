use std::sync::Arc;

use chrono::NaiveDate;

use super::boundary::fill_generated_texts;
use super::catalog::QuestionCatalog;
use super::domain::{
    AuditRecord, AuditRecordId, AuditRecordSummary, CompanyId, CompanyInfo, Department, FieldMap,
};
use super::report::{assemble_report, ReportDocument};
use super::store::{AuditStore, StoreError};
use super::summary::{aggregate, AuditSummary};

/// Service composing the record store, the question catalog, and the calculation engine.
pub struct AuditService<S> {
    store: Arc<S>,
    catalog: Arc<QuestionCatalog>,
}

impl<S> AuditService<S>
where
    S: AuditStore + 'static,
{
    pub fn new(store: Arc<S>, catalog: Arc<QuestionCatalog>) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// `None` means the department has not been started.
    pub fn record(
        &self,
        company: &CompanyId,
        department: Department,
    ) -> Result<Option<AuditRecord>, AuditServiceError> {
        Ok(self.store.get_record(company, department)?)
    }

    /// Persist answers for one department. Multi-select questions are stored as arrays and
    /// unanswered boundary notes are generated from the other boundary answers.
    pub fn save(
        &self,
        company: CompanyId,
        department: Department,
        mut fields: FieldMap,
    ) -> Result<AuditRecord, AuditServiceError> {
        self.catalog.materialize_multi_selects(department, &mut fields);
        let generated = fill_generated_texts(&mut fields);
        if !generated.is_empty() {
            tracing::debug!(
                department = %department,
                fields = ?generated,
                "boundary texts generated"
            );
        }
        let stored = self
            .store
            .save_record(AuditRecord::new(company, department, fields))?;
        tracing::debug!(
            company = %stored.company_id.0,
            department = %department,
            fields = stored.fields.len(),
            "audit record saved"
        );
        Ok(stored)
    }

    pub fn list(&self, company: &CompanyId) -> Result<Vec<AuditRecordSummary>, AuditServiceError> {
        Ok(self.store.list_records(company)?)
    }

    pub fn delete(&self, id: &AuditRecordId) -> Result<(), AuditServiceError> {
        self.store.delete_record(id)?;
        tracing::info!(audit_id = %id.0, "audit record deleted");
        Ok(())
    }

    pub fn company_info(
        &self,
        company: &CompanyId,
    ) -> Result<Option<CompanyInfo>, AuditServiceError> {
        Ok(self.store.get_company_info(company)?)
    }

    pub fn save_company_info(
        &self,
        company: &CompanyId,
        info: CompanyInfo,
    ) -> Result<CompanyInfo, AuditServiceError> {
        self.store.save_company_info(company, info.clone())?;
        Ok(info)
    }

    /// Aggregates every catalog department. A department whose record cannot be read is
    /// logged and treated as not started.
    pub fn summary(&self, company: &CompanyId) -> AuditSummary {
        let records: Vec<(Department, Option<AuditRecord>)> = self
            .catalog
            .departments()
            .into_iter()
            .map(|department| {
                let record = match self.store.get_record(company, department) {
                    Ok(record) => record,
                    Err(error) => {
                        tracing::warn!(
                            company = %company.0,
                            department = %department,
                            %error,
                            "audit record unavailable; treating department as not started"
                        );
                        None
                    }
                };
                (department, record)
            })
            .collect();

        aggregate(
            records
                .iter()
                .map(|(department, record)| (*department, record.as_ref().map(|r| &r.fields))),
        )
    }

    pub fn report(&self, company: &CompanyId, generated_on: NaiveDate) -> ReportDocument {
        let summary = self.summary(company);
        let info = match self.store.get_company_info(company) {
            Ok(info) => info,
            Err(error) => {
                tracing::warn!(
                    company = %company.0,
                    %error,
                    "company info unavailable; rendering placeholders"
                );
                None
            }
        };

        assemble_report(info.as_ref(), &summary, generated_on)
    }
}

/// Error raised by the audit service.
#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
