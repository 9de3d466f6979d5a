//! Parallel map primitives.
//!
//! Every parallel stage of extraction is an order-preserving map over an
//! index range or a slice. With the `parallel` feature these run on rayon;
//! without it they fall back to plain iterators with identical results.

#[cfg(feature = "parallel")]
use crate::error::IsoError;
use crate::error::Result;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map `f` over `0..len`, keeping the `Some` results in index order.
pub(crate) fn filter_map_range<R, F>(len: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize) -> Option<R> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().filter_map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..len).filter_map(f).collect()
    }
}

/// Map `f` over a slice, preserving order.
pub(crate) fn map_slice<I, R, F>(items: &[I], f: F) -> Vec<R>
where
    I: Sync,
    R: Send,
    F: Fn(&I) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        items.par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).collect()
    }
}

/// Run `op` on a dedicated pool of `num_threads` workers, or on the global
/// pool when `num_threads` is 0.
pub(crate) fn install<R, F>(num_threads: usize, op: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> Result<R> + Send,
{
    #[cfg(feature = "parallel")]
    {
        if num_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .map_err(|e| IsoError::ThreadPool(e.to_string()))?;
            return pool.install(op);
        }
        op()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let _ = num_threads;
        op()
    }
}
