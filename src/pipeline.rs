use std::sync::Arc;

use tracing::info;

use crate::aggregate::aggregate;
use crate::browser::SessionFactory;
use crate::error::Result;
use crate::partition::partition;
use crate::pool;
use crate::record::BookRecord;
use crate::resolver::RecordResolver;

/// Partition, resolve in parallel, then restore input order and filter.
pub async fn run<F>(
    identifiers: &[String],
    factory: Arc<F>,
    resolver: RecordResolver,
    workers: usize,
) -> Result<Vec<BookRecord>>
where
    F: SessionFactory + 'static,
{
    let partitions = partition(identifiers, workers);
    info!(
        "📚 [Pipeline] {} identifiers across {} partitions",
        identifiers.len(),
        partitions.len()
    );

    let worker_results = pool::run(factory, Arc::new(resolver), partitions).await?;
    let rows = aggregate(identifiers, worker_results);

    info!("📊 [Pipeline] {} of {} identifiers produced a record", rows.len(), identifiers.len());
    Ok(rows)
}
