mod cli;
mod demo;
pub mod infra;
pub mod routes;
mod server;

use talentscope::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
