use std::thread;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, warn};
use url::Url;

use crate::browser::Session;
use crate::config::Config;
use crate::extractor;
use crate::record::{retailer_for, BookRecord};

/// Turns one identifier into one [`BookRecord`] using an already-open session.
#[derive(Debug, Clone)]
pub struct RecordResolver {
    search_url: String,
    settle_delay: Duration,
}

impl RecordResolver {
    pub fn new(search_url: impl Into<String>, settle_delay: Duration) -> Self {
        Self {
            search_url: search_url.into(),
            settle_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.search_url.clone(), config.settle_delay)
    }

    pub fn search_url_for(&self, identifier: &str) -> String {
        format!("{}{}", self.search_url, urlencoding::encode(identifier))
    }

    /// Never fails: a navigation or read problem just leaves fields absent.
    ///
    /// The session is shared across identifiers, so after a failed navigation
    /// it may still show the previous book. Nothing is read from it then.
    pub fn resolve<S: Session + ?Sized>(&self, session: &mut S, identifier: &str) -> BookRecord {
        let search_url = self.search_url_for(identifier);
        debug!("Navigating to: {}", search_url);

        if let Err(e) = session.navigate(&search_url) {
            warn!("⚠️ [Resolve] Navigation failed for {}: {}", identifier, e);
            return BookRecord::placeholder(identifier);
        }

        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        let fields = match session.page_source() {
            Ok(html) => extractor::extract_from_html(&html),
            Err(e) => {
                warn!("⚠️ [Resolve] Could not read page for {}: {}", identifier, e);
                Default::default()
            }
        };

        let source_url = session.current_url();
        let region = region_from_url(&source_url);

        BookRecord {
            retailer: retailer_for(region.as_deref()),
            region,
            identifier: identifier.to_string(),
            title: fields.title,
            author: fields.author,
            sales_rank: fields.sales_rank,
            price: fields.price,
            currency: fields.currency,
            rating: fields.rating,
            categories: fields.categories,
            page_count: fields.page_count,
            hours_to_read: fields.hours_to_read,
            total_words: fields.total_words,
            secondary: fields.secondary,
            captured_at: Local::now(),
            source_url,
        }
    }
}

/// First non-empty path segment of `url`, upper-cased.
pub fn region_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .find(|segment| !segment.is_empty())
        .map(str::to_uppercase)
}
