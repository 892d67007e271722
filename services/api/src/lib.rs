mod cli;
mod infra;
mod offline;
mod routes;
mod server;

use kampus_assessment::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
