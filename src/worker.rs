use tracing::{debug, info};

use crate::browser::SessionFactory;
use crate::error::{Result, ScrapeError};
use crate::record::BookRecord;
use crate::resolver::RecordResolver;

/// Resolves one partition sequentially over a single browser session.
pub struct Worker<'a, F: SessionFactory> {
    id: usize,
    factory: &'a F,
    resolver: &'a RecordResolver,
}

impl<'a, F: SessionFactory> Worker<'a, F> {
    pub fn new(id: usize, factory: &'a F, resolver: &'a RecordResolver) -> Self {
        Self { id, factory, resolver }
    }

    /// Returns only valid records, in the order they were resolved.
    ///
    /// The session lives in this frame, so it is released exactly once on
    /// every way out, panics included.
    pub fn run(&self, identifiers: &[String]) -> Result<Vec<BookRecord>> {
        info!("👷 [Worker {}] Starting with {} identifiers", self.id, identifiers.len());

        let mut session = self.factory.open().map_err(ScrapeError::Browser)?;

        let mut records = Vec::with_capacity(identifiers.len());
        for (n, identifier) in identifiers.iter().enumerate() {
            let record = self.resolver.resolve(&mut session, identifier);
            if record.is_valid() {
                debug!("[Worker {}] {}/{} {} ok", self.id, n + 1, identifiers.len(), identifier);
                records.push(record);
            } else {
                info!("🚫 [Worker {}] No usable title for {}, skipping", self.id, identifier);
            }
        }

        drop(session);
        info!(
            "✅ [Worker {}] Done: {}/{} records kept",
            self.id,
            records.len(),
            identifiers.len()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Session;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const SEARCH: &str = "https://www.kobo.com/us/en/search?query=";

    fn page(title: &str) -> String {
        format!(
            r#"<h1 class="title product-field">{title}</h1>
               <h1 class="title product-field">{title}</h1>"#
        )
    }

    struct CannedSession {
        pages: Arc<HashMap<String, String>>,
        current: String,
        closed: Arc<AtomicUsize>,
    }

    impl Session for CannedSession {
        fn navigate(&mut self, url: &str) -> anyhow::Result<()> {
            self.current = url.to_string();
            Ok(())
        }

        fn current_url(&self) -> String {
            self.current.clone()
        }

        fn page_source(&self) -> anyhow::Result<String> {
            let id = self.current.trim_start_matches(SEARCH);
            Ok(self.pages.get(id).cloned().unwrap_or_default())
        }
    }

    impl Drop for CannedSession {
        fn drop(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct CannedFactory {
        pages: Arc<HashMap<String, String>>,
        opened: AtomicUsize,
        closed: Arc<AtomicUsize>,
        fail: bool,
    }

    impl CannedFactory {
        fn new(pages: &[(&str, &str)], fail: bool) -> Self {
            Self {
                pages: Arc::new(
                    pages
                        .iter()
                        .map(|(id, title)| (id.to_string(), page(title)))
                        .collect(),
                ),
                opened: AtomicUsize::new(0),
                closed: Arc::new(AtomicUsize::new(0)),
                fail,
            }
        }
    }

    impl SessionFactory for CannedFactory {
        type Session = CannedSession;

        fn open(&self) -> anyhow::Result<CannedSession> {
            if self.fail {
                anyhow::bail!("chrome did not start");
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(CannedSession {
                pages: Arc::clone(&self.pages),
                current: "about:blank".to_string(),
                closed: Arc::clone(&self.closed),
            })
        }
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_session_for_the_whole_partition() {
        let factory = CannedFactory::new(&[("1", "One"), ("2", "Two"), ("3", "Three")], false);
        let resolver = RecordResolver::new(SEARCH, Duration::ZERO);

        let records = Worker::new(0, &factory, &resolver)
            .run(&ids(&["1", "2", "3"]))
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(factory.opened.load(Ordering::SeqCst), 1);
        assert_eq!(factory.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_records_are_not_kept() {
        let factory = CannedFactory::new(&[("1", "One"), ("3", "Three")], false);
        let resolver = RecordResolver::new(SEARCH, Duration::ZERO);

        let records = Worker::new(0, &factory, &resolver)
            .run(&ids(&["1", "2", "3"]))
            .unwrap();

        let kept: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(kept, vec!["1", "3"]);
        assert_eq!(records[0].region.as_deref(), Some("US"));
        assert_eq!(records[0].retailer.as_deref(), Some("Kobo US"));
    }

    #[test]
    fn session_failure_is_a_worker_error() {
        let factory = CannedFactory::new(&[], true);
        let resolver = RecordResolver::new(SEARCH, Duration::ZERO);

        let err = Worker::new(4, &factory, &resolver)
            .run(&ids(&["1"]))
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Browser(_)));
        assert_eq!(factory.closed.load(Ordering::SeqCst), 0);
    }
}
