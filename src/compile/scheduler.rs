//! Bounded worker pool.
//!
//! `W = min(max_concurrency, N)` workers share an atomic cursor over the
//! resolved target list. A worker claims index `i` with `fetch_add`, compiles
//! target `i` and writes slot `i` of a pre-sized container, so the returned
//! results follow the input order whatever order the builds finish in.
//!
//! A failing or panicking target only fills its own slot with a failed
//! result; every target is attempted.

use super::compiler::{BuildTool, CompilationResult, compile_target};
use super::error::CompileError;
use super::options::CompileOptions;
use super::progress::ProgressSink;
use crate::targets::MAX_CONCURRENCY;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Number of workers for `total` targets.
pub fn worker_count(max_concurrency: usize, total: usize) -> usize {
    max_concurrency.clamp(1, MAX_CONCURRENCY).min(total)
}

/// Compile every target of `opts`, returning one result per target in the
/// order of `opts.targets`.
///
/// Blocks until all workers have exited. Only failing to start the pool is
/// an error.
pub fn compile_targets(
    opts: &CompileOptions,
    tool: &dyn BuildTool,
    progress: &dyn ProgressSink,
) -> Result<Vec<CompilationResult>, CompileError> {
    let targets = &opts.targets;
    let total = targets.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let workers = worker_count(opts.max_concurrency, total);
    let slots: Vec<OnceLock<CompilationResult>> = (0..total).map(|_| OnceLock::new()).collect();
    let cursor = AtomicUsize::new(0);
    let completed = AtomicUsize::new(0);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("crossbake-worker-{}", i))
        .build()
        .map_err(|e| CompileError::WorkerPool(e.to_string()))?;

    debug!("scheduling {} target(s) on {} worker(s)", total, workers);

    pool.scope(|s| {
        for worker in 0..workers {
            let slots = &slots;
            let cursor = &cursor;
            let completed = &completed;

            s.spawn(move |_| {
                loop {
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(&target) = targets.get(index) else {
                        break;
                    };
                    debug!("worker {} claimed #{} ({})", worker, index, target);
                    progress.target_started(target);

                    let result =
                        panic::catch_unwind(AssertUnwindSafe(|| compile_target(target, opts, tool)))
                            .unwrap_or_else(|payload| {
                                CompilationResult::failed(
                                    target,
                                    panic_message(payload.as_ref()),
                                    Duration::ZERO,
                                    opts.out_file(target),
                                )
                            });

                    // index came from fetch_add, so this worker is the only writer
                    let stored = slots[index].get_or_init(|| result);
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress.target_finished(done, total, stored);
                }
                debug!("worker {} exiting", worker);
            });
        }
    });

    Ok(slots
        .into_iter()
        .zip(targets)
        .map(|(slot, &target)| {
            slot.into_inner().unwrap_or_else(|| {
                CompilationResult::failed(
                    target,
                    "Target was never compiled",
                    Duration::ZERO,
                    opts.out_file(target),
                )
            })
        })
        .collect())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown error".to_string()
    }
}
