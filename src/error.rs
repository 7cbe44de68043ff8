use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("input file has no columns")]
    MissingColumn,

    #[error("browser session failed: {0}")]
    Browser(#[source] anyhow::Error),

    #[error("all {0} workers failed")]
    AllWorkersFailed(usize),
}
