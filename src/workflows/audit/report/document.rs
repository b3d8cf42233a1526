use super::super::domain::Department;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Paginated audit report; page `n` of `total_pages` at index `n - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub generated_on: NaiveDate,
    pub generated_label: String,
    pub total_pages: usize,
    pub pages: Vec<ReportPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPage {
    pub number: usize,
    pub page_label: String,
    pub content: PageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContent {
    Cover(CoverPage),
    Company(CompanyPage),
    ExecutiveSummary(ExecutiveSummaryPage),
    Department(DepartmentPage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverPage {
    pub title: String,
    pub subtitle: String,
    pub edition: String,
    pub generated_on: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledValue {
    pub label: String,
    pub value: String,
    pub provided: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyPage {
    pub heading: String,
    pub company_details: Vec<LabelledValue>,
    pub contact_details: Vec<LabelledValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBox {
    pub label: String,
    pub value: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummaryPage {
    pub heading: String,
    pub narrative: String,
    pub metrics: Vec<MetricBox>,
    pub findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentPage {
    pub department: Department,
    pub title: String,
    pub completion_status: String,
    pub fields_completed: String,
    pub metrics: Vec<MetricBox>,
    /// Omitted from the page when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

impl ReportDocument {
    pub fn page(&self, number: usize) -> Option<&ReportPage> {
        number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
    }

    /// Plain-text rendering for terminals and logs.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (index, page) in self.pages.iter().enumerate() {
            if index > 0 {
                out.push_str("\n----------------------------------------\n\n");
            }
            page.content.render_into(&mut out);
            let _ = writeln!(out, "\nPage {}", page.page_label);
        }
        out
    }
}

impl PageContent {
    fn render_into(&self, out: &mut String) {
        // Writing into a String cannot fail.
        match self {
            PageContent::Cover(cover) => {
                let _ = writeln!(out, "{}", cover.title);
                let _ = writeln!(out, "{}", cover.subtitle);
                let _ = writeln!(out, "{}", cover.edition);
                let _ = writeln!(out, "{}", cover.generated_on);
            }
            PageContent::Company(company) => {
                let _ = writeln!(out, "{}\n", company.heading);
                let _ = writeln!(out, "Company Details");
                render_values(out, &company.company_details);
                let _ = writeln!(out, "\nContact Information");
                render_values(out, &company.contact_details);
            }
            PageContent::ExecutiveSummary(summary) => {
                let _ = writeln!(out, "{}\n", summary.heading);
                let _ = writeln!(out, "{}\n", summary.narrative);
                render_metrics(out, &summary.metrics);
                let _ = writeln!(out, "\nKey Findings");
                for finding in &summary.findings {
                    let _ = writeln!(out, "  -> {finding}");
                }
            }
            PageContent::Department(department) => {
                let _ = writeln!(out, "{}\n", department.title);
                let _ = writeln!(out, "Completion Status: {}", department.completion_status);
                let _ = writeln!(out, "Fields Completed: {}\n", department.fields_completed);
                let _ = writeln!(out, "Emissions & Energy Data");
                render_metrics(out, &department.metrics);
                if !department.highlights.is_empty() {
                    let _ = writeln!(out, "\nKey Metrics");
                    for highlight in &department.highlights {
                        let _ = writeln!(out, "  * {highlight}");
                    }
                }
            }
        }
    }
}

fn render_values(out: &mut String, values: &[LabelledValue]) {
    for value in values {
        let _ = writeln!(out, "  {}: {}", value.label, value.value);
    }
}

fn render_metrics(out: &mut String, metrics: &[MetricBox]) {
    for metric in metrics {
        let _ = writeln!(out, "  {}: {} {}", metric.label, metric.value, metric.unit);
    }
}
