use super::compiler::CompilationResult;
use crate::targets::TargetId;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Receives scheduler notifications. Called from worker threads; the order
/// of calls across targets is not deterministic.
pub trait ProgressSink: Sync {
    fn target_started(&self, _target: TargetId) {}

    fn target_finished(&self, completed: usize, total: usize, result: &CompilationResult);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn target_finished(&self, _completed: usize, _total: usize, _result: &CompilationResult) {}
}

/// Terminal progress bar with one line per finished target.
pub struct ProgressBarSink {
    pb: ProgressBar,
}

impl ProgressBarSink {
    pub fn new(total: usize) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        pb.set_message("Compiling...");
        Self { pb }
    }

    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressSink for ProgressBarSink {
    fn target_started(&self, target: TargetId) {
        self.pb.set_message(format!("Compiling {}", target));
    }

    fn target_finished(&self, completed: usize, total: usize, result: &CompilationResult) {
        let mark = if result.success {
            "✓".green()
        } else {
            "x".red()
        };
        self.pb.println(format!(
            "   {} Completed: {}/{} targets ({})",
            mark, completed, total, result.target
        ));
        self.pb.inc(1);
    }
}
