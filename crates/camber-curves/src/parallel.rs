//! Conditional fork-join over independent curves.
//!
//! Uses rayon when the `parallel` feature is enabled and the config asks
//! for it. Each task gets its own index and writes only its own result
//! slot.

use crate::config::EngineConfig;

/// Maps `f(index, item)` over `items`, in parallel when
/// `config.should_parallelize(items.len())` holds.
///
/// Results come back in input order either way.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &EngineConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(usize, &T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items
                .par_iter()
                .enumerate()
                .map(|(i, item)| f(i, item))
                .collect();
        }
    }

    items.iter().enumerate().map(|(i, item)| f(i, item)).collect()
}
