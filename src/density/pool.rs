//! Bounded fan-out of independent cell tasks.
//!
//! With the `parallel` feature the tasks run on a dedicated rayon pool of the
//! requested size; otherwise they run in order on the calling thread. Results
//! are returned in task order either way.
use crate::error::Result;

/// `min(available execution units, max_workers)`, at least one.
pub fn worker_count(max_workers: usize) -> usize {
    let units = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    units.min(max_workers).max(1)
}

#[cfg(feature = "parallel")]
pub fn scatter<T, R, F>(tasks: &[T], workers: usize, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    use crate::error::Error;
    use rayon::prelude::*;

    if workers <= 1 {
        return Ok(tasks.iter().map(f).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("density-cell-{i}"))
        .build()
        .map_err(|e| Error::WorkerPool(e.to_string()))?;
    Ok(pool.install(|| tasks.par_iter().map(f).collect()))
}

#[cfg(not(feature = "parallel"))]
pub fn scatter<T, R, F>(tasks: &[T], _workers: usize, f: F) -> Result<Vec<R>>
where
    F: Fn(&T) -> R,
{
    Ok(tasks.iter().map(f).collect())
}
