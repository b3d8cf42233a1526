use super::completion::score_completion;
use super::domain::{AuditRecord, Department, FieldMap};
use super::emissions::calculate_emissions;
use serde::{Deserialize, Serialize};

/// Score and estimate for one department that has a saved record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentAuditSummary {
    pub department: Department,
    pub label: String,
    pub completion_pct: u8,
    pub filled_fields: usize,
    pub total_fields: usize,
    pub co2e_tons: f64,
    pub kwh: f64,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl DepartmentAuditSummary {
    pub fn evaluate(department: Department, fields: &FieldMap) -> Self {
        let score = score_completion(fields);
        let estimate = calculate_emissions(department, fields);

        Self {
            department,
            label: department.label().to_string(),
            completion_pct: score.completion_pct,
            filled_fields: score.filled_fields,
            total_fields: score.total_fields,
            co2e_tons: estimate.co2e_tons,
            kwh: estimate.kwh,
            highlights: estimate.highlights,
        }
    }

    pub fn is_started(&self) -> bool {
        self.completion_pct > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Most complete first; ties keep catalog order.
    pub departments: Vec<DepartmentAuditSummary>,
    pub total_co2e_tons: f64,
    pub total_kwh: f64,
    pub completed_departments: usize,
    pub catalog_size: usize,
}

impl Default for AuditSummary {
    fn default() -> Self {
        Self {
            departments: Vec::new(),
            total_co2e_tons: 0.0,
            total_kwh: 0.0,
            completed_departments: 0,
            catalog_size: Department::COUNT,
        }
    }
}

/// Departments without a record (`None`) are skipped entirely.
pub fn aggregate<'a, I>(records: I) -> AuditSummary
where
    I: IntoIterator<Item = (Department, Option<&'a FieldMap>)>,
{
    let mut departments: Vec<DepartmentAuditSummary> = records
        .into_iter()
        .filter_map(|(department, fields)| {
            fields.map(|fields| DepartmentAuditSummary::evaluate(department, fields))
        })
        .collect();

    // `sort_by` is stable, so equal completion keeps input order.
    departments.sort_by(|a, b| b.completion_pct.cmp(&a.completion_pct));

    let total_co2e_tons = departments.iter().map(|entry| entry.co2e_tons).sum();
    let total_kwh = departments.iter().map(|entry| entry.kwh).sum();
    let completed_departments = departments
        .iter()
        .filter(|entry| entry.is_started())
        .count();

    AuditSummary {
        departments,
        total_co2e_tons,
        total_kwh,
        completed_departments,
        catalog_size: Department::COUNT,
    }
}

/// Aggregates saved records in catalog order; a later record for the same department wins.
pub fn aggregate_records(records: &[AuditRecord]) -> AuditSummary {
    aggregate(Department::ordered().into_iter().map(|department| {
        let fields = records
            .iter()
            .rev()
            .find(|record| record.department == department)
            .map(|record| &record.fields);
        (department, fields)
    }))
}
