//! Department audit data, completion scoring, emissions estimation, and report assembly.
//!
//! The calculation modules (`completion`, `emissions`, `summary`, `report`) are pure functions
//! over saved field maps. `service` and `router` wrap them with the [`AuditStore`] boundary.

pub mod boundary;
pub mod catalog;
pub mod completion;
pub mod domain;
pub mod emissions;
pub(crate) mod format;
pub mod report;
pub mod router;
pub mod service;
pub mod store;
pub mod summary;

#[cfg(test)]
mod tests;

pub use boundary::{consolidation_justification, fill_generated_texts, key_notes};
pub use catalog::{CatalogError, NavGroup, Question, QuestionCatalog, QuestionKind, Section};
pub use completion::{score_completion, CompletionScore};
pub use domain::{
    AuditRecord, AuditRecordId, AuditRecordSummary, CompanyField, CompanyId, CompanyInfo,
    Department, EmissionsEstimate, FieldMap, FieldValue,
};
pub use emissions::{
    calculate_emissions, calculate_it_breakdown, EmissionsStrategy, ItEmissionsBreakdown,
};
pub use report::{assemble_report, ReportDocument};
pub use router::audit_router;
pub use service::{AuditService, AuditServiceError};
pub use store::{AuditStore, InMemoryAuditStore, StoreError};
pub use summary::{aggregate, aggregate_records, AuditSummary, DepartmentAuditSummary};
