mod batch;
mod cli;
mod infra;
mod rate_limit;
mod routes;
mod server;

use rmbs_rating::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
