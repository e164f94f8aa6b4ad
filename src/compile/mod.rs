//! Multi-target compilation.
//!
//! [`compile`] resolves options, prepares the output directory, runs one
//! build tool process per target on a bounded worker pool and returns the
//! aggregated [`CompilerSummary`].
//!
//! ## Error tiers
//!
//! - [`ConfigError`] - bad entry, concurrency or no targets; nothing is run
//! - failed [`CompilationResult`] - one target failed, the run continues
//! - [`CompileError::OutputDir`] / [`CompileError::WorkerPool`] - the run aborts

mod compiler;
mod error;
mod feedback;
mod options;
mod progress;
mod report;
mod scheduler;
mod select;

pub use compiler::{
    BuildTool, CompilationResult, ProcessTool, ToolOutput, ToolSpec, build_args, compile_target,
    duration_ms,
};
pub use error::{CompileError, ConfigError};
pub use feedback::FeedbackAnalyzer;
pub use options::{
    CompileOptions, DEFAULT_CONCURRENCY, DEFAULT_OUT_DIR, RawCompileOptions, out_file_path,
    resolve_options,
};
pub use progress::{ProgressBarSink, ProgressSink, SilentProgress};
pub use report::{CompilerStats, CompilerSummary, print_report};
pub use scheduler::{compile_targets, worker_count};
pub use select::{ExplicitTargets, InteractivePicker, NoPrompt, SelectionError, TargetSelector};

use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Remove `dir` if it exists. Failures are only reported.
pub fn clean_dir(dir: &Path) {
    if !dir.exists() {
        return;
    }
    info!("cleaning {}", dir.display());
    if let Err(e) = fs::remove_dir_all(dir) {
        warn!("failed to clean {}: {}", dir.display(), e);
    }
}

pub fn ensure_dir(dir: &Path) -> Result<(), CompileError> {
    fs::create_dir_all(dir).map_err(|source| CompileError::OutputDir {
        path: dir.display().to_string(),
        source,
    })
}

/// Compile with already resolved options.
pub fn run(
    opts: &CompileOptions,
    tool: &dyn BuildTool,
    progress: &dyn ProgressSink,
) -> Result<CompilerSummary, CompileError> {
    if opts.clean {
        clean_dir(&opts.out_dir);
    }
    ensure_dir(&opts.out_dir)?;

    info!(
        "compiling {} for {} target(s): minify={} bytecode={} sourcemap={}",
        opts.entries
            .iter()
            .map(|e| e.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
        opts.targets.len(),
        opts.minify,
        opts.bytecode,
        opts.sourcemap
    );

    let start = Instant::now();
    let results = compile_targets(opts, tool, progress)?;
    let summary = CompilerSummary::from_results(results, start.elapsed());

    info!(
        "finished: {} succeeded, {} failed",
        summary.success_count, summary.failure_count
    );
    Ok(summary)
}

/// Resolve `raw` and compile every target.
///
/// Configuration problems are returned before any process is started.
pub fn compile(
    raw: RawCompileOptions,
    selector: &dyn TargetSelector,
    tool: &dyn BuildTool,
    progress: &dyn ProgressSink,
) -> Result<CompilerSummary, CompileError> {
    let opts = resolve_options(raw, selector)?;
    run(&opts, tool, progress)
}
