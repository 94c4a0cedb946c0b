use amedas::Amedas;
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Amedas::new().station_table().call().await {
        Ok(report) => {
            info!(
                "Wrote {} stations to {} and {}",
                report.stations,
                report.csv_path.display(),
                report.geojson_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Station table build failed ({:?}): {}", e.kind(), e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
