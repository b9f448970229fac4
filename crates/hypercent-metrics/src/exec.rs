//! Parallel execution over BFS sources.
//!
//! Per-source work runs on a rayon pool with one reusable workspace per
//! worker (`map_init`). Two reduction shapes are provided:
//!
//! - [`chunked_sum`]: every source adds into a shared-width vector
//!   (betweenness). Sources are split into `chunk_size` chunks in index
//!   order, each chunk is summed sequentially into its own partial, and
//!   partials are folded into the total in chunk order. Chunks are
//!   scheduled in waves of `current_num_threads()` so at most one wave of
//!   partials is alive at a time. The floating-point addition order only
//!   depends on `chunk_size`, never on the worker count.
//! - [`map_sources`]: every source produces its own value (distance
//!   measures), collected in source order.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::debug;

use hypercent_core::NodeIndex;
use hypercent_core::config::EngineConfig;

/// Default number of sources per reduction chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Worker count and reduction granularity for one analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Worker threads; 0 uses the global rayon pool.
    pub threads: usize,
    /// Sources accumulated sequentially per chunk. Values below 1 act as 1.
    pub chunk_size: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl From<&EngineConfig> for ExecutionConfig {
    fn from(engine: &EngineConfig) -> Self {
        Self {
            threads: engine.threads,
            chunk_size: engine.chunk_size,
        }
    }
}

impl ExecutionConfig {
    /// Single worker, default chunking.
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            threads: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub(crate) const fn effective_chunk_size(&self) -> usize {
        if self.chunk_size == 0 { 1 } else { self.chunk_size }
    }

    /// Build a dedicated pool with `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns the rayon error if the OS refuses to spawn the workers.
    pub fn build_pool(&self) -> Result<ThreadPool, ThreadPoolBuildError> {
        ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("hypercent-worker-{i}"))
            .build()
    }

    /// Workers for a whole pass: a dedicated pool, or the global pool when
    /// `threads` is 0.
    ///
    /// # Errors
    ///
    /// Returns the rayon error if a dedicated pool cannot be built.
    pub fn workers(&self) -> Result<Workers, ThreadPoolBuildError> {
        if self.threads == 0 {
            return Ok(Workers { pool: None });
        }
        Ok(Workers {
            pool: Some(self.build_pool()?),
        })
    }

    /// Run `op` once on [`Self::workers`].
    ///
    /// # Errors
    ///
    /// Returns the rayon error if a dedicated pool cannot be built.
    pub fn install<R, OP>(&self, op: OP) -> Result<R, ThreadPoolBuildError>
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        Ok(self.workers()?.install(op))
    }
}

/// The pool a pass runs its parallel stages on.
#[derive(Debug)]
pub struct Workers {
    pool: Option<ThreadPool>,
}

impl Workers {
    /// Run `op` with this pool as the current rayon pool.
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Worker threads `op` will see.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
    }
}

/// Sum per-source contributions into a vector of `width` entries.
///
/// `init` builds one workspace per worker; `accumulate(ws, source, out)`
/// adds the contribution of `source` into `out`.
pub(crate) fn chunked_sum<W, I, F>(
    label: &str,
    sources: &[NodeIndex],
    width: usize,
    exec: &ExecutionConfig,
    init: I,
    accumulate: F,
) -> Vec<f64>
where
    I: Fn() -> W + Sync + Send,
    F: Fn(&mut W, NodeIndex, &mut [f64]) + Sync + Send,
{
    let chunks: Vec<&[NodeIndex]> = sources.chunks(exec.effective_chunk_size()).collect();
    let wave = rayon::current_num_threads().max(1);
    let mut total = vec![0.0; width];
    let mut done = 0_usize;

    for group in chunks.chunks(wave) {
        let partials: Vec<Vec<f64>> = group
            .par_iter()
            .map_init(&init, |ws, chunk| {
                let mut partial = vec![0.0; width];
                for &s in *chunk {
                    accumulate(ws, s, &mut partial);
                }
                partial
            })
            .collect();

        for partial in partials {
            for (t, p) in total.iter_mut().zip(partial) {
                *t += p;
            }
        }

        done += group.iter().map(|c| c.len()).sum::<usize>();
        debug!(
            measure = label,
            done,
            total = sources.len(),
            "processed source chunk wave"
        );
    }

    total
}

/// Compute one value per source, returned in source order.
pub(crate) fn map_sources<W, T, I, F>(
    label: &str,
    sources: &[NodeIndex],
    exec: &ExecutionConfig,
    init: I,
    f: F,
) -> Vec<T>
where
    T: Send,
    I: Fn() -> W + Sync + Send,
    F: Fn(&mut W, NodeIndex) -> T + Sync + Send,
{
    let out: Vec<T> = sources
        .par_iter()
        .with_min_len(exec.effective_chunk_size())
        .map_init(&init, |ws, &s| f(ws, s))
        .collect();
    debug!(measure = label, sources = sources.len(), "processed all sources");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_maps_threads_and_chunks() {
        let engine = EngineConfig {
            threads: 3,
            chunk_size: 16,
            ..EngineConfig::default()
        };
        let exec = ExecutionConfig::from(&engine);
        assert_eq!(exec.threads, 3);
        assert_eq!(exec.chunk_size, 16);
    }

    #[test]
    fn zero_chunk_size_behaves_as_one() {
        let exec = ExecutionConfig::default().with_chunk_size(0);
        assert_eq!(exec.effective_chunk_size(), 1);
    }

    #[test]
    fn install_uses_requested_worker_count() {
        let exec = ExecutionConfig::default().with_threads(2);
        let n = exec.install(rayon::current_num_threads).expect("pool");
        assert_eq!(n, 2);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn chunked_sum_adds_every_source_once() {
        let sources: Vec<NodeIndex> = (0..10).collect();
        let exec = ExecutionConfig::default().with_chunk_size(3);
        let total = chunked_sum(
            "test",
            &sources,
            2,
            &exec,
            || (),
            |(), s, out| {
                out[0] += 1.0;
                out[1] += s as f64;
            },
        );
        assert!((total[0] - 10.0).abs() < f64::EPSILON);
        assert!((total[1] - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn chunked_sum_is_identical_across_pool_sizes() {
        // Values chosen so that different addition orders round differently.
        let sources: Vec<NodeIndex> = (0..200).collect();
        let run = |threads| {
            let exec = ExecutionConfig::default()
                .with_threads(threads)
                .with_chunk_size(7);
            exec.install(|| {
                chunked_sum("test", &sources, 1, &exec, || (), |(), s, out| {
                    out[0] += 1.0 / (s as f64 + 3.0);
                })
            })
            .expect("pool")
        };
        let one = run(1);
        assert_eq!(one, run(4));
        assert_eq!(one, run(7));
    }

    #[test]
    fn map_sources_keeps_source_order() {
        let sources: Vec<NodeIndex> = (0..50).rev().collect();
        let exec = ExecutionConfig::default().with_chunk_size(4);
        let out = map_sources("test", &sources, &exec, || 0_usize, |calls, s| {
            *calls += 1;
            s * 2
        });
        let expected: Vec<_> = sources.iter().map(|s| s * 2).collect();
        assert_eq!(out, expected);
    }
}
