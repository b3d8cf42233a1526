use super::super::domain::{CompanyField, CompanyInfo};
use super::super::format::{megawatt_hours, tons};
use super::super::summary::{AuditSummary, DepartmentAuditSummary};
use super::document::{
    CompanyPage, CoverPage, DepartmentPage, ExecutiveSummaryPage, LabelledValue, MetricBox,
    PageContent, ReportDocument, ReportPage,
};
use chrono::NaiveDate;

pub const REPORT_TITLE: &str = "CO2ePortal";
pub const REPORT_SUBTITLE: &str = "Multi-Department Audit Report";
pub const REPORT_EDITION: &str = "Professional Edition • GHG PROTOCOL & ISO 14064 Compatible";
pub const NOT_PROVIDED: &str = "Not Provided";

/// Cover, company, and executive summary precede the department pages.
const FIXED_PAGES: usize = 3;

pub fn assemble_report(
    company: Option<&CompanyInfo>,
    summary: &AuditSummary,
    generated_on: NaiveDate,
) -> ReportDocument {
    let generated_label = long_date(generated_on);
    let total_pages = FIXED_PAGES + summary.departments.len();

    let mut contents = Vec::with_capacity(total_pages);
    contents.push(PageContent::Cover(CoverPage {
        title: REPORT_TITLE.to_string(),
        subtitle: REPORT_SUBTITLE.to_string(),
        edition: REPORT_EDITION.to_string(),
        generated_on: generated_label.clone(),
    }));
    contents.push(PageContent::Company(company_page(company)));
    contents.push(PageContent::ExecutiveSummary(executive_summary(summary)));
    contents.extend(
        summary
            .departments
            .iter()
            .map(|entry| PageContent::Department(department_page(entry))),
    );

    let pages = contents
        .into_iter()
        .enumerate()
        .map(|(index, content)| ReportPage {
            number: index + 1,
            page_label: format!("{} of {}", index + 1, total_pages),
            content,
        })
        .collect();

    ReportDocument {
        generated_on,
        generated_label,
        total_pages,
        pages,
    }
}

/// `January 5, 2025`.
fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn company_page(company: Option<&CompanyInfo>) -> CompanyPage {
    let value = |field: CompanyField| {
        let provided = company.and_then(|info| info.get(field));
        LabelledValue {
            label: field.label().to_string(),
            value: provided.unwrap_or(NOT_PROVIDED).to_string(),
            provided: provided.is_some(),
        }
    };

    let (contact_details, company_details): (Vec<_>, Vec<_>) = CompanyField::ordered()
        .into_iter()
        .partition(|field| field.is_contact());

    CompanyPage {
        heading: "Company & Contact Information".to_string(),
        company_details: company_details.into_iter().map(value).collect(),
        contact_details: contact_details.into_iter().map(value).collect(),
    }
}

fn executive_summary(summary: &AuditSummary) -> ExecutiveSummaryPage {
    let completed = summary.completed_departments;
    let narrative = format!(
        "This comprehensive multi-department audit report presents a detailed analysis of carbon \
         emissions and energy consumption across your organization. The report captures data from \
         {completed} department(s) and provides actionable insights for emissions reduction and \
         sustainability improvements aligned with ISO 14064 standards."
    );

    let metrics = vec![
        metric("Total CO2e Emissions", tons(summary.total_co2e_tons), "metric tons/year"),
        metric(
            "Total Energy Consumption",
            megawatt_hours(summary.total_kwh),
            "MWh/year",
        ),
        metric(
            "Audit Coverage",
            completed.to_string(),
            &format!("of {} departments", summary.catalog_size),
        ),
    ];

    let departments_verb = if completed == 1 {
        "department has"
    } else {
        "departments have"
    };

    let findings = vec![
        format!(
            "Total organizational carbon footprint is {} metric tons CO2e per year",
            tons(summary.total_co2e_tons)
        ),
        format!("{completed} {departments_verb} completed audit assessment"),
        format!(
            "Energy consumption totals {} MWh annually",
            megawatt_hours(summary.total_kwh)
        ),
        "Department-specific emissions profiles detailed in subsequent sections".to_string(),
        "Recommendations for each department included in respective audit sections".to_string(),
    ];

    ExecutiveSummaryPage {
        heading: "Executive Summary".to_string(),
        narrative,
        metrics,
        findings,
    }
}

fn department_page(entry: &DepartmentAuditSummary) -> DepartmentPage {
    DepartmentPage {
        department: entry.department,
        title: entry.label.clone(),
        completion_status: format!("{}%", entry.completion_pct),
        fields_completed: format!("{} of {}", entry.filled_fields, entry.total_fields),
        metrics: vec![
            metric("CO2e Emissions", tons(entry.co2e_tons), "metric tons/year"),
            metric("Annual Energy", megawatt_hours(entry.kwh), "MWh/year"),
        ],
        highlights: entry.highlights.clone(),
    }
}

fn metric(label: &str, value: String, unit: &str) -> MetricBox {
    MetricBox {
        label: label.to_string(),
        value,
        unit: unit.to_string(),
    }
}
