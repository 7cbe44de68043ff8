//! Best-effort field extraction from a rendered book detail page.
//!
//! Every field is read by its own function returning `Option`; a miss in one
//! never touches another. Nothing in here returns an error: the storefront
//! markup is not ours and changes without notice.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::record::SecondaryMetadata;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static TITLE: Lazy<Selector> = Lazy::new(|| selector("h1.title.product-field"));
static AUTHOR: Lazy<Selector> = Lazy::new(|| selector(".contributor-name"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:price"]"#));
static CURRENCY: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:currency_code"]"#));
static SALES_RANK: Lazy<Selector> = Lazy::new(|| selector(".rank"));
static RATING: Lazy<Selector> = Lazy::new(|| selector("ul.stars.read-only"));
static CATEGORIES: Lazy<Selector> = Lazy::new(|| selector(".category-rankings a"));
static STATS_WIDGET: Lazy<Selector> = Lazy::new(|| selector("#about-this-book-widget"));
static STAT_VALUES: Lazy<Selector> = Lazy::new(|| selector(".stat-desc strong"));
static METADATA_WIDGET: Lazy<Selector> = Lazy::new(|| {
    selector(r#"div[data-kobo-widget="BookItemDetailSecondaryMetadataWidget"]"#)
});
static METADATA_ITEMS: Lazy<Selector> =
    Lazy::new(|| selector("div.bookitem-secondary-metadata ul > li"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
static DEVICES: Lazy<Selector> = Lazy::new(|| selector("#readThisOn"));
static DEVICE_ITEMS: Lazy<Selector> = Lazy::new(|| selector("ul.supported-devices > li"));

static NON_PRICE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d.]").expect("static regex must compile"));

/// Positions inside the secondary metadata list.
const PUBLISHER: usize = 0;
const RELEASE_DATE: usize = 1;
const IMPRINT: usize = 2;
const ISBN: usize = 3;
const LANGUAGE: usize = 4;
const DOWNLOAD_OPTIONS: usize = 5;

/// Everything the detail page can tell us, each field independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
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
}

pub fn extract_fields(document: &Html) -> PageFields {
    PageFields {
        title: field("title", title(document)),
        author: field("author", first_text(document, &AUTHOR)),
        sales_rank: field("sales_rank", sales_rank(document)),
        price: field("price", price(document)),
        currency: field("currency", meta_content(document, &CURRENCY)),
        rating: field("rating", rating(document)),
        categories: field("categories", categories(document)),
        page_count: field("page_count", reading_stat(document, 0)),
        hours_to_read: field("hours_to_read", reading_stat(document, 1)),
        total_words: field("total_words", reading_stat(document, 2)),
        secondary: field("secondary_metadata", secondary_metadata(document)),
    }
}

/// Parses raw HTML and extracts from it.
pub fn extract_from_html(html: &str) -> PageFields {
    extract_fields(&Html::parse_document(html))
}

fn field<T>(name: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        debug!("[Extract] {} not found", name);
    }
    value
}

fn text_of(element: ElementRef<'_>) -> Option<String> {
    non_empty(element.text().collect::<String>())
}

fn non_empty<S: AsRef<str>>(raw: S) -> Option<String> {
    let trimmed = raw.as_ref().trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().and_then(text_of)
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(non_empty)
}

/// The first title node is decorative; the real one is the second.
fn title(document: &Html) -> Option<String> {
    document.select(&TITLE).nth(1).and_then(text_of)
}

fn sales_rank(document: &Html) -> Option<String> {
    first_text(document, &SALES_RANK).and_then(|rank| non_empty(rank.replace('#', "")))
}

fn price(document: &Html) -> Option<String> {
    meta_content(document, &PRICE)
        .and_then(|raw| non_empty(NON_PRICE_CHARS.replace_all(&raw, "")))
}

pub(crate) fn rating_from_label(label: &str) -> Option<String> {
    label.split_whitespace().nth(1).map(str::to_string)
}

fn rating(document: &Html) -> Option<String> {
    document
        .select(&RATING)
        .next()
        .and_then(|el| el.value().attr("aria-label"))
        .and_then(rating_from_label)
}

fn categories(document: &Html) -> Option<String> {
    let unique: BTreeSet<String> = document.select(&CATEGORIES).filter_map(text_of).collect();
    join(unique)
}

fn join<I: IntoIterator<Item = String>>(values: I) -> Option<String> {
    non_empty(values.into_iter().collect::<Vec<_>>().join(", "))
}

fn reading_stat(document: &Html, position: usize) -> Option<String> {
    let widget = document.select(&STATS_WIDGET).next()?;
    widget.select(&STAT_VALUES).nth(position).and_then(text_of)
}

/// `None` only when the widget itself is missing. Inside it, each position is
/// read on its own, so a short or malformed list blanks only the affected fields.
fn secondary_metadata(document: &Html) -> Option<SecondaryMetadata> {
    let widget = document.select(&METADATA_WIDGET).next()?;
    let items: Vec<ElementRef<'_>> = widget.select(&METADATA_ITEMS).collect();

    let item = |position: usize| items.get(position).copied();
    let span_text = |position: usize| {
        item(position)
            .and_then(|li| li.select(&SPAN).next())
            .and_then(text_of)
    };

    Some(SecondaryMetadata {
        publisher: item(PUBLISHER).and_then(text_of),
        release_date: span_text(RELEASE_DATE),
        imprint: span_text(IMPRINT),
        isbn: span_text(ISBN),
        language: span_text(LANGUAGE),
        download_options: item(DOWNLOAD_OPTIONS)
            .map(|li| li.text().collect::<String>())
            .and_then(|text| text.split(':').nth(1).and_then(non_empty)),
        supported_devices: supported_devices(widget),
    })
}

fn supported_devices(widget: ElementRef<'_>) -> Option<String> {
    let devices = widget.select(&DEVICES).next()?;
    join(devices.select(&DEVICE_ITEMS).filter_map(text_of))
}
