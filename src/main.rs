use std::process::ExitCode;
use std::sync::Arc;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kobo_scraper::report::RunReport;
use kobo_scraper::{csv_io, pipeline, ChromeSessionFactory, Config, RecordResolver};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let report = RunReport::start();
    let config = Config::from_env();
    info!("🔧 Config: {} workers, input {}", config.workers, config.input_path.display());

    let identifiers = match csv_io::read_identifiers(&config.input_path, &config.identifier_column) {
        Ok(ids) => ids,
        Err(e) => {
            error!("🔥 Could not read identifiers: {}", e);
            report.finish();
            return ExitCode::FAILURE;
        }
    };

    let factory = Arc::new(ChromeSessionFactory::new(&config));
    let resolver = RecordResolver::from_config(&config);

    let (records, pipeline_ok) =
        match pipeline::run(&identifiers, factory, resolver, config.workers).await {
            Ok(records) => (records, true),
            Err(e) => {
                error!("🔥 Pipeline failed: {}", e);
                (Vec::new(), false)
            }
        };

    // The output file is always produced, even if it only holds the header.
    let written = csv_io::write_records(&config.output_path, &records);
    report.finish();

    match written {
        Ok(()) if pipeline_ok => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(e) => {
            error!("🔥 Could not write {}: {}", config.output_path.display(), e);
            ExitCode::FAILURE
        }
    }
}
