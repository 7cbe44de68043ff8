use std::thread;

/// Hardware threads kept free for the browsers' own helper processes.
const RESERVED_CORES: usize = 2;

/// Available parallelism minus headroom, never below one.
pub fn default_worker_count() -> usize {
    let total = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    worker_count_for(total)
}

pub fn worker_count_for(total_cores: usize) -> usize {
    total_cores.saturating_sub(RESERVED_CORES).max(1)
}

/// Stride split: list `i` gets positions `i, i + k, i + 2k, ...`.
///
/// Always returns exactly `max(worker_count, 1)` lists, some possibly empty.
pub fn partition<T: Clone>(items: &[T], worker_count: usize) -> Vec<Vec<T>> {
    let k = worker_count.max(1);
    (0..k)
        .map(|i| items.iter().skip(i).step_by(k).cloned().collect())
        .collect()
}
