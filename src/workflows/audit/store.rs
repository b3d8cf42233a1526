use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::completion::score_completion;
use super::domain::{
    AuditRecord, AuditRecordId, AuditRecordSummary, CompanyId, CompanyInfo, Department,
};

/// Storage boundary for saved audits and company details.
pub trait AuditStore: Send + Sync {
    fn get_record(
        &self,
        company: &CompanyId,
        department: Department,
    ) -> Result<Option<AuditRecord>, StoreError>;
    fn list_records(&self, company: &CompanyId) -> Result<Vec<AuditRecordSummary>, StoreError>;
    /// Inserts or replaces the company's record for the department, assigning an id and
    /// timestamp.
    fn save_record(&self, record: AuditRecord) -> Result<AuditRecord, StoreError>;
    fn delete_record(&self, id: &AuditRecordId) -> Result<(), StoreError>;
    fn get_company_info(&self, company: &CompanyId) -> Result<Option<CompanyInfo>, StoreError>;
    fn save_company_info(&self, company: &CompanyId, info: CompanyInfo) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Summary row for the audit manager list.
pub fn summarize_record(record: &AuditRecord) -> AuditRecordSummary {
    let score = score_completion(&record.fields);
    AuditRecordSummary {
        id: record.id.clone(),
        department: record.department,
        label: record.department.label(),
        completion_pct: score.completion_pct,
        filled_fields: score.filled_fields,
        total_fields: score.total_fields,
        updated_at: record.updated_at,
    }
}

type RecordKey = (CompanyId, Department);

/// Process-local store backed by mutex-guarded maps.
#[derive(Default, Clone)]
pub struct InMemoryAuditStore {
    records: Arc<Mutex<HashMap<RecordKey, AuditRecord>>>,
    companies: Arc<Mutex<HashMap<CompanyId, CompanyInfo>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> AuditRecordId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        AuditRecordId(format!("audit-{id:06}"))
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<RecordKey, AuditRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("record store mutex poisoned".to_string()))
    }

    fn companies(&self) -> Result<MutexGuard<'_, HashMap<CompanyId, CompanyInfo>>, StoreError> {
        self.companies
            .lock()
            .map_err(|_| StoreError::Unavailable("company store mutex poisoned".to_string()))
    }
}

impl AuditStore for InMemoryAuditStore {
    fn get_record(
        &self,
        company: &CompanyId,
        department: Department,
    ) -> Result<Option<AuditRecord>, StoreError> {
        let guard = self.records()?;
        Ok(guard.get(&(company.clone(), department)).cloned())
    }

    fn list_records(&self, company: &CompanyId) -> Result<Vec<AuditRecordSummary>, StoreError> {
        let guard = self.records()?;
        Ok(Department::ordered()
            .into_iter()
            .filter_map(|department| guard.get(&(company.clone(), department)))
            .map(summarize_record)
            .collect())
    }

    fn save_record(&self, mut record: AuditRecord) -> Result<AuditRecord, StoreError> {
        let mut guard = self.records()?;
        let key = (record.company_id.clone(), record.department);
        record.id = match guard.get(&key).and_then(|existing| existing.id.clone()) {
            Some(id) => Some(id),
            None => Some(self.next_id()),
        };
        record.updated_at = Some(Utc::now());
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn delete_record(&self, id: &AuditRecordId) -> Result<(), StoreError> {
        let mut guard = self.records()?;
        let key = guard
            .iter()
            .find(|(_, record)| record.id.as_ref() == Some(id))
            .map(|(key, _)| key.clone())
            .ok_or(StoreError::NotFound)?;
        guard.remove(&key);
        Ok(())
    }

    fn get_company_info(&self, company: &CompanyId) -> Result<Option<CompanyInfo>, StoreError> {
        let guard = self.companies()?;
        Ok(guard.get(company).cloned())
    }

    fn save_company_info(&self, company: &CompanyId, info: CompanyInfo) -> Result<(), StoreError> {
        let mut guard = self.companies()?;
        guard.insert(company.clone(), info);
        Ok(())
    }
}
