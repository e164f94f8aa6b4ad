use super::compiler::{CompilationResult, duration_ms, serialize_millis};
use super::feedback::FeedbackAnalyzer;
use crate::ui::Table;
use colored::*;
use serde::Serialize;
use std::time::Duration;

/// Aggregate of one `compile` run.
#[derive(Debug, Clone, Serialize)]
pub struct CompilerSummary {
    /// True only when no target failed.
    pub success: bool,
    /// In the order the targets were resolved.
    pub results: Vec<CompilationResult>,
    /// Wall clock of the whole run, not the sum of the per-target times.
    #[serde(rename = "total_duration_ms", serialize_with = "serialize_millis")]
    pub total_duration: Duration,
    pub success_count: usize,
    pub failure_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerStats {
    pub total_targets: usize,
    pub completed_targets: usize,
    pub successful_targets: usize,
    pub failed_targets: usize,
    #[serde(rename = "average_duration_ms", serialize_with = "serialize_millis")]
    pub average_duration: Duration,
    #[serde(rename = "total_duration_ms", serialize_with = "serialize_millis")]
    pub total_duration: Duration,
}

impl CompilerSummary {
    pub fn from_results(results: Vec<CompilationResult>, total_duration: Duration) -> Self {
        let success_count = results.iter().filter(|r| r.success).count();
        let failure_count = results.len() - success_count;

        Self {
            success: failure_count == 0,
            results,
            total_duration,
            success_count,
            failure_count,
        }
    }

    pub fn successes(&self) -> impl Iterator<Item = &CompilationResult> {
        self.results.iter().filter(|r| r.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompilationResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn stats(&self) -> CompilerStats {
        let total = self.results.len();
        let summed: Duration = self.results.iter().map(|r| r.duration).sum();
        let average_duration = if total == 0 {
            Duration::ZERO
        } else {
            summed / total as u32
        };

        CompilerStats {
            total_targets: total,
            completed_targets: total,
            successful_targets: self.success_count,
            failed_targets: self.failure_count,
            average_duration,
            total_duration: self.total_duration,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            #[serde(flatten)]
            summary: &'a CompilerSummary,
            stats: CompilerStats,
        }

        serde_json::to_string_pretty(&JsonReport {
            summary: self,
            stats: self.stats(),
        })
    }
}

/// Print failures (with diagnostics), then successes, then the run time.
pub fn print_report(summary: &CompilerSummary) {
    if summary.failure_count > 0 {
        println!(
            "{} Compilation completed with {} failure(s):",
            "!".yellow(),
            summary.failure_count
        );
        for failure in summary.failures() {
            let error = failure.error.as_deref().unwrap_or("Unknown error");
            println!("   {} {}: {}", "x".red(), failure.target.to_string().bold(), error);
            if let Some(hint) = FeedbackAnalyzer::analyze(error) {
                for line in hint.lines() {
                    println!("     {} {}", "💡".yellow(), line);
                }
            }
        }
        println!();
    }

    if summary.success_count > 0 {
        println!(
            "{} Successfully compiled {} target(s):",
            "✓".green(),
            summary.success_count
        );
        let mut table = Table::new(&["Target", "Time", "Output"]);
        for success in summary.successes() {
            table.add_row(vec![
                success.target.to_string().green().to_string(),
                format!("{}ms", duration_ms(success.duration)),
                success.out_file.display().to_string(),
            ]);
        }
        table.print();
    }

    println!(
        "{} Total compilation time: {}ms",
        "⏱".cyan(),
        duration_ms(summary.total_duration)
    );
}
