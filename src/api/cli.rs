use super::commands::{init_telemetry, run_emissions, run_report, EmissionsArgs, ReportArgs};
use super::server;
use crate::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "CO2e Portal",
    about = "Score department audits, estimate CO2e emissions, and assemble audit reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Assemble the multi-department audit report from a CSV snapshot
    Report(ReportArgs),
    /// Estimate emissions for one department from a JSON field map
    Emissions(EmissionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => {
            init_telemetry()?;
            run_report(args)
        }
        Command::Emissions(args) => {
            init_telemetry()?;
            run_emissions(args)
        }
    }
}
