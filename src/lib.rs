pub mod aggregate;
pub mod browser;
pub mod config;
pub mod csv_io;
pub mod error;
pub mod extractor;
pub mod partition;
pub mod pipeline;
pub mod pool;
pub mod record;
pub mod report;
pub mod resolver;
pub mod worker;

pub use browser::{ChromeSessionFactory, Session, SessionFactory};
pub use config::Config;
pub use error::{Result, ScrapeError};
pub use record::{BookRecord, SecondaryMetadata};
pub use resolver::RecordResolver;
