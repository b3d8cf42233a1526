use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::telemetry;
use crate::workflows::audit::router::EmissionsResponse;
use crate::workflows::audit::{
    aggregate_records, assemble_report, calculate_emissions, calculate_it_breakdown, CompanyId,
    Department, FieldMap, QuestionCatalog, ReportDocument,
};
use crate::workflows::snapshot::SnapshotImporter;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CSV snapshot with `company_id,department,field_id,value` rows
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Company whose audits are reported
    #[arg(long)]
    pub(crate) company: String,
    /// Report generation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = super::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Print the structured report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EmissionsArgs {
    /// Department id, e.g. `office` or `cold_storage`
    #[arg(long)]
    pub(crate) department: String,
    /// JSON object of field id to value
    #[arg(long)]
    pub(crate) fields: String,
}

/// Logging for offline commands goes to stderr, configured like the service.
pub(crate) fn init_telemetry() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry, config.environment)?;
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        snapshot,
        company,
        date,
        json,
    } = args;

    let document = build_report(&snapshot, &CompanyId(company), date)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print!("{}", document.render_text());
    }
    Ok(())
}

fn build_report(
    snapshot: &std::path::Path,
    company: &CompanyId,
    date: Option<NaiveDate>,
) -> Result<ReportDocument, AppError> {
    let catalog = QuestionCatalog::load()?;
    let snapshot = SnapshotImporter::from_path(snapshot, &catalog)?;

    let records = snapshot.records_for(company);
    if records.is_empty() {
        tracing::warn!(company = %company.0, "snapshot holds no audits for company");
    }

    let summary = aggregate_records(&records);
    let generated_on = date.unwrap_or_else(|| Local::now().date_naive());
    Ok(assemble_report(
        snapshot.company_info(company),
        &summary,
        generated_on,
    ))
}

pub(crate) fn run_emissions(args: EmissionsArgs) -> Result<(), AppError> {
    let response = estimate(&args.department, &args.fields)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn estimate(department: &str, fields: &str) -> Result<EmissionsResponse, AppError> {
    let department = Department::from_id(department)
        .ok_or_else(|| AppError::UnknownDepartment(department.to_string()))?;
    let fields: FieldMap = serde_json::from_str(fields)?;

    Ok(EmissionsResponse {
        department,
        estimate: calculate_emissions(department, &fields),
        it_breakdown: (department == Department::It).then(|| calculate_it_breakdown(&fields)),
    })
}
