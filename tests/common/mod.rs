#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kobo_scraper::{RecordResolver, Session, SessionFactory};

pub const SEARCH_URL: &str = "https://www.kobo.com/us/en/search?query=";

pub fn resolver() -> RecordResolver {
    RecordResolver::new(SEARCH_URL, Duration::ZERO)
}

pub fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// What the fake storefront serves for one identifier.
#[derive(Clone)]
pub struct FakePage {
    pub final_url: String,
    pub html: String,
}

impl FakePage {
    pub fn new(final_url: &str, html: impl Into<String>) -> Self {
        Self {
            final_url: final_url.to_string(),
            html: html.into(),
        }
    }
}

#[derive(Default)]
pub struct Counters {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub navigations: AtomicUsize,
}

/// Serves canned pages keyed by the identifier in the search URL. Unknown
/// identifiers land on an empty page at the search URL.
pub struct FakeSession {
    pages: Arc<HashMap<String, FakePage>>,
    current: Option<FakePage>,
    current_url: String,
    counters: Arc<Counters>,
    navigate_fails_after: Option<usize>,
    unreadable: bool,
}

impl Session for FakeSession {
    fn navigate(&mut self, url: &str) -> anyhow::Result<()> {
        let done = self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.navigate_fails_after {
            // Like a hung tab: the previous page stays loaded.
            if done >= limit {
                anyhow::bail!("navigation timed out: {}", url);
            }
        }
        let id = url.trim_start_matches(SEARCH_URL);
        self.current = self.pages.get(id).cloned();
        self.current_url = match &self.current {
            Some(page) => page.final_url.clone(),
            None => url.to_string(),
        };
        Ok(())
    }

    fn current_url(&self) -> String {
        self.current_url.clone()
    }

    fn page_source(&self) -> anyhow::Result<String> {
        if self.unreadable {
            anyhow::bail!("target closed");
        }
        match &self.current {
            Some(page) => Ok(page.html.clone()),
            None => Ok("<html><body></body></html>".to_string()),
        }
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeFactory {
    pages: Arc<HashMap<String, FakePage>>,
    pub counters: Arc<Counters>,
    /// Fail every open() after this many successful ones.
    fail_after: Option<usize>,
    navigate_fails_after: Option<usize>,
    unreadable: bool,
}

impl FakeFactory {
    pub fn new(pages: HashMap<String, FakePage>) -> Self {
        Self {
            pages: Arc::new(pages),
            counters: Arc::new(Counters::default()),
            fail_after: None,
            navigate_fails_after: None,
            unreadable: false,
        }
    }

    /// Every page titled with its identifier's entry from `titles`; a `None`
    /// title yields a page without a usable title.
    pub fn with_titles(titles: &[(&str, Option<&str>)]) -> Self {
        let pages = titles
            .iter()
            .map(|(id, title)| {
                let html = match title {
                    Some(t) => fixtures::titled_page(t),
                    None => "<html><body><p>not found</p></body></html>".to_string(),
                };
                let url = format!("https://www.kobo.com/us/en/ebook/{}", id);
                (id.to_string(), FakePage::new(&url, html))
            })
            .collect();
        Self::new(pages)
    }

    pub fn failing_after(mut self, successes: usize) -> Self {
        self.fail_after = Some(successes);
        self
    }

    /// Sessions whose navigate() errors once this many navigations have
    /// succeeded, counted across all sessions.
    pub fn navigation_failing_after(mut self, successes: usize) -> Self {
        self.navigate_fails_after = Some(successes);
        self
    }

    /// Sessions whose page_source() always errors.
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }
}

impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    fn open(&self) -> anyhow::Result<FakeSession> {
        let opened = self.counters.opened.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if opened >= limit {
                anyhow::bail!("browser failed to launch");
            }
        }
        Ok(FakeSession {
            pages: Arc::clone(&self.pages),
            current: None,
            current_url: "about:blank".to_string(),
            counters: Arc::clone(&self.counters),
            navigate_fails_after: self.navigate_fails_after,
            unreadable: self.unreadable,
        })
    }
}
