use crate::workflows::audit::catalog::{QuestionCatalog, QuestionKind};
use crate::workflows::audit::domain::{
    AuditRecord, CompanyField, CompanyId, CompanyInfo, Department, FieldMap, FieldValue,
};
use crate::workflows::audit::store::{AuditStore, StoreError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Department column value marking company detail rows.
pub const COMPANY_ROW: &str = "company";

/// Separator for multi-select values within one CSV cell.
const MULTI_SEPARATOR: char = ';';

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownDepartment { line: u64, value: String },
    UnknownCompanyField { line: u64, value: String },
    Store(StoreError),
}

impl std::fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read audit snapshot: {}", err),
            SnapshotImportError::Csv(err) => write!(f, "invalid audit snapshot CSV data: {}", err),
            SnapshotImportError::UnknownDepartment { line, value } => {
                write!(f, "line {}: unknown department '{}'", line, value)
            }
            SnapshotImportError::UnknownCompanyField { line, value } => {
                write!(f, "line {}: unknown company field '{}'", line, value)
            }
            SnapshotImportError::Store(err) => {
                write!(f, "could not seed audit store from snapshot: {}", err)
            }
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Csv(err) => Some(err),
            SnapshotImportError::Store(err) => Some(err),
            SnapshotImportError::UnknownDepartment { .. }
            | SnapshotImportError::UnknownCompanyField { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<StoreError> for SnapshotImportError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    company_id: String,
    department: String,
    field_id: String,
    #[serde(default)]
    value: String,
}

/// Saved audits and company details for any number of companies, as exported by the portal.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AuditSnapshot {
    records: BTreeMap<CompanyId, BTreeMap<Department, FieldMap>>,
    companies: BTreeMap<CompanyId, CompanyInfo>,
}

impl AuditSnapshot {
    pub fn company_ids(&self) -> Vec<CompanyId> {
        let mut ids: Vec<CompanyId> = self
            .records
            .keys()
            .chain(self.companies.keys())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Records for one company in catalog order.
    pub fn records_for(&self, company: &CompanyId) -> Vec<AuditRecord> {
        self.records
            .get(company)
            .map(|departments| {
                departments
                    .iter()
                    .map(|(department, fields)| {
                        AuditRecord::new(company.clone(), *department, fields.clone())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn company_info(&self, company: &CompanyId) -> Option<&CompanyInfo> {
        self.companies.get(company)
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    /// Writes every record and company into `store`, returning the number of records saved.
    pub fn seed<S: AuditStore + ?Sized>(&self, store: &S) -> Result<usize, SnapshotImportError> {
        let mut saved = 0;
        for company in self.company_ids() {
            if let Some(info) = self.companies.get(&company) {
                store.save_company_info(&company, info.clone())?;
            }
            for record in self.records_for(&company) {
                store.save_record(record)?;
                saved += 1;
            }
        }
        Ok(saved)
    }
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        catalog: &QuestionCatalog,
    ) -> Result<AuditSnapshot, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, catalog)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        catalog: &QuestionCatalog,
    ) -> Result<AuditSnapshot, SnapshotImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut snapshot = AuditSnapshot::default();

        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let row: SnapshotRow = record.deserialize(Some(&headers))?;
            let company = CompanyId(row.company_id);

            if row.department.eq_ignore_ascii_case(COMPANY_ROW) {
                let field = CompanyField::from_key(&row.field_id).ok_or_else(|| {
                    SnapshotImportError::UnknownCompanyField {
                        line,
                        value: row.field_id.clone(),
                    }
                })?;
                snapshot
                    .companies
                    .entry(company)
                    .or_default()
                    .set(field, row.value);
                continue;
            }

            let department = Department::from_id(&row.department).ok_or_else(|| {
                SnapshotImportError::UnknownDepartment {
                    line,
                    value: row.department.clone(),
                }
            })?;
            let value = field_value(catalog, &row.field_id, row.value);
            snapshot
                .records
                .entry(company)
                .or_default()
                .entry(department)
                .or_default()
                .insert(row.field_id, value);
        }

        for departments in snapshot.records.values_mut() {
            for (department, fields) in departments.iter_mut() {
                catalog.materialize_multi_selects(*department, fields);
            }
        }

        tracing::debug!(
            records = snapshot.record_count(),
            companies = snapshot.companies.len(),
            "audit snapshot parsed"
        );

        Ok(snapshot)
    }
}

/// Converts a CSV cell according to the declaring question; unknown field ids stay text.
fn field_value(catalog: &QuestionCatalog, field_id: &str, raw: String) -> FieldValue {
    match catalog.question(field_id).map(|question| question.kind) {
        Some(QuestionKind::MultiSelect) => FieldValue::Multi(
            raw.split(MULTI_SEPARATOR)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Some(QuestionKind::Number) => match raw.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => FieldValue::Number(number),
            _ => FieldValue::Text(raw),
        },
        _ => FieldValue::Text(raw),
    }
}
