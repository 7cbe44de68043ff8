//! Puts worker output back into input order and drops unusable rows.

use std::collections::HashMap;

use crate::record::BookRecord;

/// One row per input identifier, in input order.
///
/// Identifiers with no resolved record get a placeholder row. When the same
/// identifier was resolved more than once, the last record seen wins and every
/// occurrence of that identifier gets a copy of it.
pub fn reindex<I>(identifiers: &[String], worker_results: I) -> Vec<BookRecord>
where
    I: IntoIterator<Item = Vec<BookRecord>>,
{
    let mut by_identifier: HashMap<String, BookRecord> = HashMap::new();
    for record in worker_results.into_iter().flatten() {
        by_identifier.insert(record.identifier.clone(), record);
    }

    identifiers
        .iter()
        .map(|id| {
            by_identifier
                .get(id)
                .cloned()
                .unwrap_or_else(|| BookRecord::placeholder(id.as_str()))
        })
        .collect()
}

/// [`reindex`], then keep only rows with a non-blank title.
pub fn aggregate<I>(identifiers: &[String], worker_results: I) -> Vec<BookRecord>
where
    I: IntoIterator<Item = Vec<BookRecord>>,
{
    let mut rows = reindex(identifiers, worker_results);
    rows.retain(BookRecord::is_valid);
    rows
}
