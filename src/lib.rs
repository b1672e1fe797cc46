mod cli;
mod infra;
mod report;
mod routes;
mod server;

use mtsk_core::error::AppError;

pub use infra::AppState;
pub use routes::with_dashboard_routes;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
