use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Result, ScrapeError};
use crate::record::BookRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads the identifier column from a CSV file with a header row.
pub fn read_identifiers(path: &Path, column: &str) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let identifiers = read_identifiers_from(file, column)?;
    info!("📥 Loaded {} identifiers from {}", identifiers.len(), path.display());
    Ok(identifiers)
}

/// Uses `column` if the header has it, otherwise the first column.
pub fn read_identifiers_from<R: Read>(reader: R, column: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ScrapeError::MissingColumn);
    }
    let index = match headers.iter().position(|h| h.trim() == column) {
        Some(index) => index,
        None => {
            warn!("⚠️ Column '{}' not found, reading first column '{}'", column, &headers[0]);
            0
        }
    };

    let mut identifiers = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        match row.get(index).map(str::trim) {
            Some(value) if !value.is_empty() => identifiers.push(value.to_string()),
            _ => warn!("⚠️ Skipping blank identifier on data row {}", line + 1),
        }
    }
    Ok(identifiers)
}

/// Flat output row; absent values become empty cells.
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    region: Option<&'a str>,
    retailer: Option<&'a str>,
    isbn13: &'a str,
    title_name: Option<&'a str>,
    authors: Option<&'a str>,
    sales_rank: Option<&'a str>,
    price: Option<&'a str>,
    currency: Option<&'a str>,
    rating: Option<&'a str>,
    categories: Option<&'a str>,
    pages: Option<&'a str>,
    hours_to_read: Option<&'a str>,
    total_words: Option<&'a str>,
    publisher: Option<&'a str>,
    release_date: Option<&'a str>,
    imprint: Option<&'a str>,
    isbn: Option<&'a str>,
    language: Option<&'a str>,
    download_options: Option<&'a str>,
    supported_devices: Option<&'a str>,
    timestamp: String,
    url: &'a str,
}

const HEADER: [&str; 22] = [
    "region",
    "retailer",
    "isbn13",
    "title_name",
    "authors",
    "sales_rank",
    "price",
    "currency",
    "rating",
    "categories",
    "pages",
    "hours_to_read",
    "total_words",
    "publisher",
    "release_date",
    "imprint",
    "isbn",
    "language",
    "download_options",
    "supported_devices",
    "timestamp",
    "url",
];

impl<'a> From<&'a BookRecord> for OutputRow<'a> {
    fn from(record: &'a BookRecord) -> Self {
        let meta = record.secondary.as_ref();

        Self {
            region: record.region.as_deref(),
            retailer: record.retailer.as_deref(),
            isbn13: &record.identifier,
            title_name: record.title.as_deref(),
            authors: record.author.as_deref(),
            sales_rank: record.sales_rank.as_deref(),
            price: record.price.as_deref(),
            currency: record.currency.as_deref(),
            rating: record.rating.as_deref(),
            categories: record.categories.as_deref(),
            pages: record.page_count.as_deref(),
            hours_to_read: record.hours_to_read.as_deref(),
            total_words: record.total_words.as_deref(),
            publisher: meta.and_then(|m| m.publisher.as_deref()),
            release_date: meta.and_then(|m| m.release_date.as_deref()),
            imprint: meta.and_then(|m| m.imprint.as_deref()),
            isbn: meta.and_then(|m| m.isbn.as_deref()),
            language: meta.and_then(|m| m.language.as_deref()),
            download_options: meta.and_then(|m| m.download_options.as_deref()),
            supported_devices: meta.and_then(|m| m.supported_devices.as_deref()),
            timestamp: record.captured_at.format(TIMESTAMP_FORMAT).to_string(),
            url: &record.source_url,
        }
    }
}

/// Writes all records in one go. The header is written even when there are
/// no records.
pub fn write_records(path: &Path, records: &[BookRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_records_to(file, records)?;
    info!("💾 Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn write_records_to<W: Write>(writer: W, records: &[BookRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(OutputRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}
