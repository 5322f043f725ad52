//! The worker pool the dual walk fans leaf jobs out to, built on top of
//! a `rayon` thread pool sized by the process-wide worker count.

use std::sync::{Mutex, OnceLock};

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::ConfigError;

fn pool_slot() -> &'static Mutex<Option<ThreadPool>> {
    static SLOT: OnceLock<Mutex<Option<ThreadPool>>> = OnceLock::new();
    SLOT.get_or_init(|| Mutex::new(None))
}

/// Sets the process-wide number of worker threads the dual walk uses.
///
/// `n < 0` uses the host's available parallelism; `n == 0` is rejected.
/// Can be called more than once; later calls replace the pool used by
/// subsequent [`crate::evaluate`]/[`crate::evaluate_at`] calls, but do
/// not affect walks already in flight.
pub fn set_threads(n: i32) -> Result<(), ConfigError> {
    if n == 0 {
        return Err(ConfigError::ZeroThreads);
    }
    let count = if n < 0 {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    } else {
        n as usize
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(count)
        .build()
        .map_err(|e| ConfigError::ThreadPoolUnavailable(e.to_string()))?;

    *pool_slot().lock().unwrap_or_else(|e| e.into_inner()) = Some(pool);
    log::debug!("configured worker pool with {count} threads");
    Ok(())
}

/// Runs `f` over every item in `items`, in parallel, on the configured
/// worker pool (or rayon's global pool if [`set_threads`] was never
/// called). `f` must be safe to call concurrently from any thread.
pub(crate) fn for_each<T, F>(items: &[T], f: F)
where
    T: Sync,
    F: Fn(&T) + Sync + Send,
{
    let guard = pool_slot().lock().unwrap_or_else(|e| e.into_inner());
    match &*guard {
        Some(pool) => pool.install(|| items.par_iter().for_each(|item| f(item))),
        None => {
            drop(guard);
            items.par_iter().for_each(|item| f(item));
        }
    }
}
