use chrono::{DateTime, Local};

/// Retailer prefix; the derived region is appended to it.
pub const VENDOR: &str = "Kobo";

/// Publication details read from the secondary metadata widget. The whole
/// bundle is `None` on a [`BookRecord`] when the widget itself is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondaryMetadata {
    pub publisher: Option<String>,
    pub release_date: Option<String>,
    pub imprint: Option<String>,
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub download_options: Option<String>,
    pub supported_devices: Option<String>,
}

/// One resolved catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub region: Option<String>,
    pub retailer: Option<String>,
    pub identifier: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub sales_rank: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub rating: Option<String>,
    pub categories: Option<String>,
    pub page_count: Option<String>,
    pub hours_to_read: Option<String>,
    pub total_words: Option<String>,
    pub secondary: Option<SecondaryMetadata>,
    pub captured_at: DateTime<Local>,
    pub source_url: String,
}

impl BookRecord {
    /// A row that carries only its identifier, used where no record survived.
    pub fn placeholder(identifier: impl Into<String>) -> Self {
        Self {
            region: None,
            retailer: None,
            identifier: identifier.into(),
            title: None,
            author: None,
            sales_rank: None,
            price: None,
            currency: None,
            rating: None,
            categories: None,
            page_count: None,
            hours_to_read: None,
            total_words: None,
            secondary: None,
            captured_at: Local::now(),
            source_url: String::new(),
        }
    }

    /// A record is usable only when it has a non-blank title.
    pub fn is_valid(&self) -> bool {
        self.title
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }
}

/// `Kobo US` for region `US`; nothing when the region could not be derived.
pub fn retailer_for(region: Option<&str>) -> Option<String> {
    region.map(|r| format!("{} {}", VENDOR, r))
}
