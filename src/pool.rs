use std::sync::Arc;

use tokio::task;
use tracing::{debug, error, info};

use crate::browser::SessionFactory;
use crate::error::{Result, ScrapeError};
use crate::record::BookRecord;
use crate::resolver::RecordResolver;
use crate::worker::Worker;

/// Runs one [`Worker`] per non-empty partition, each on its own blocking
/// thread, and waits for all of them.
///
/// A failed or panicked worker contributes nothing and is logged. Only when
/// every dispatched worker fails does the pool itself fail.
pub async fn run<F>(
    factory: Arc<F>,
    resolver: Arc<RecordResolver>,
    partitions: Vec<Vec<String>>,
) -> Result<Vec<Vec<BookRecord>>>
where
    F: SessionFactory + 'static,
{
    let mut handles = Vec::with_capacity(partitions.len());
    for (id, identifiers) in partitions.into_iter().enumerate() {
        if identifiers.is_empty() {
            debug!("[Pool] Partition {} is empty, no worker started", id);
            continue;
        }
        let factory = Arc::clone(&factory);
        let resolver = Arc::clone(&resolver);
        let handle = task::spawn_blocking(move || {
            Worker::new(id, factory.as_ref(), resolver.as_ref()).run(&identifiers)
        });
        handles.push((id, handle));
    }

    let dispatched = handles.len();
    info!("🚀 [Pool] Dispatched {} workers", dispatched);

    let mut results = Vec::with_capacity(dispatched);
    let mut failed = 0;
    for (id, handle) in handles {
        match handle.await {
            Ok(Ok(records)) => results.push(records),
            Ok(Err(e)) => {
                error!("🔥 [Pool] Worker {} failed: {}", id, e);
                failed += 1;
            }
            Err(e) => {
                error!("🔥 [Pool] Worker {} crashed: {}", id, e);
                failed += 1;
            }
        }
    }

    if dispatched > 0 && failed == dispatched {
        return Err(ScrapeError::AllWorkersFailed(dispatched));
    }
    Ok(results)
}
