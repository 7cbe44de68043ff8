use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::config::Config;

static USER_AGENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/123.0.0.0 Safari/537.36",
    ]
});

const BLANK_PAGE: &str = "about:blank";

const FALLBACK_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// An isolated browser context that can be pointed at a page and read back.
///
/// Implementations release their resources on drop.
pub trait Session {
    /// Navigates and returns once the DOM is interactive. Sub-resources may
    /// still be loading.
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// The URL the session ended up on, after redirects.
    fn current_url(&self) -> String;

    /// The rendered DOM as HTML.
    fn page_source(&self) -> Result<String>;
}

/// Creates sessions. Shared read-only across worker threads.
pub trait SessionFactory: Send + Sync {
    type Session: Session;

    fn open(&self) -> Result<Self::Session>;
}

/// Launches one headless Chrome process per session.
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    headless: bool,
    nav_timeout: Duration,
}

impl ChromeSessionFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            headless: config.headless,
            nav_timeout: config.nav_timeout,
        }
    }
}

impl SessionFactory for ChromeSessionFactory {
    type Session = ChromeSession;

    fn open(&self) -> Result<ChromeSession> {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FALLBACK_USER_AGENT);
        debug!("Using User-Agent: {}", user_agent);

        let mut args = vec![
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-infobars"),
        ];
        let ua_arg = format!("--user-agent={}", user_agent);
        args.push(OsStr::new(&ua_arg));

        let browser = Browser::new(LaunchOptions {
            headless: self.headless,
            window_size: Some((1920, 1080)),
            args,
            ..Default::default()
        })?;

        let tab = browser.new_tab()?;
        tab.set_default_timeout(self.nav_timeout);

        Ok(ChromeSession {
            tab,
            nav_timeout: self.nav_timeout,
            _browser: browser,
        })
    }
}

pub struct ChromeSession {
    tab: Arc<Tab>,
    nav_timeout: Duration,
    // Dropping the browser kills the Chrome process.
    _browser: Browser,
}

impl Session for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        // The tab is reused, so park it on a blank page first: until the new
        // page commits, the only thing readable is an empty document.
        self.tab.navigate_to(BLANK_PAGE)?;
        self.tab.wait_until_navigated()?;

        self.tab.navigate_to(url)?;
        if let Err(e) = self.tab.wait_until_navigated() {
            warn!("⚠️ Navigation to {} still loading: {}", url, e);
        }

        let landed = self.tab.get_url();
        if !left_blank_page(&landed) {
            bail!("navigation to {} did not commit (tab is on {:?})", url, landed);
        }

        // Eager readiness: the new document's body is enough, sub-resources
        // may keep loading.
        if let Err(e) = self
            .tab
            .wait_for_element_with_custom_timeout("body", self.nav_timeout)
        {
            warn!("⚠️ Body wait timed out for {}: {}. Extracting anyway...", url, e);
        }
        Ok(())
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }

    fn page_source(&self) -> Result<String> {
        self.tab.get_content()
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        debug!("Closing Chrome session");
    }
}

fn left_blank_page(url: &str) -> bool {
    !url.is_empty() && url != BLANK_PAGE
}
