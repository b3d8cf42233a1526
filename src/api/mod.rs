//! Process entry point: CLI parsing, the HTTP server, and operator commands.

mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use crate::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
