use super::options::CompileOptions;
use crate::targets::TargetId;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// How to invoke the external build tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub program: String,
    /// Leading arguments, before the target flags.
    pub args: Vec<String>,
    /// Prepended to the target id on the command line (`bun-linux-x64`).
    pub target_prefix: String,
}

impl Default for ToolSpec {
    fn default() -> Self {
        Self {
            program: "bun".to_string(),
            args: vec!["build".to_string(), "--compile".to_string()],
            target_prefix: "bun-".to_string(),
        }
    }
}

/// What a finished build tool process reported.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stderr: String,
}

/// Seam between the scheduler and the operating system.
pub trait BuildTool: Sync {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput>;
}

/// Runs the build tool as a child process and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTool;

impl BuildTool for ProcessTool {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Outcome of compiling one target.
#[derive(Debug, Clone, Serialize)]
pub struct CompilationResult {
    pub target: TargetId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub out_file: PathBuf,
}

impl CompilationResult {
    pub fn succeeded(target: TargetId, duration: Duration, out_file: PathBuf) -> Self {
        Self {
            target,
            success: true,
            error: None,
            duration,
            out_file,
        }
    }

    pub fn failed(
        target: TargetId,
        error: impl Into<String>,
        duration: Duration,
        out_file: PathBuf,
    ) -> Self {
        Self {
            target,
            success: false,
            error: Some(error.into()),
            duration,
            out_file,
        }
    }
}

/// Whole milliseconds, rounded up.
pub fn duration_ms(duration: Duration) -> u64 {
    duration.as_micros().div_ceil(1000) as u64
}

pub(crate) fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration_ms(*duration))
}

/// Argument vector for one target: tool args, target, output path, enabled
/// flags, then the entries.
pub fn build_args(target: TargetId, opts: &CompileOptions, out_file: &Path) -> Vec<String> {
    let mut args = opts.tool.args.clone();
    args.push("--target".to_string());
    args.push(target.build_tool_target(&opts.tool.target_prefix));
    args.push("--outfile".to_string());
    args.push(out_file.to_string_lossy().to_string());

    if opts.minify {
        args.push("--minify".to_string());
    }
    if opts.sourcemap {
        args.push("--sourcemap".to_string());
    }
    if opts.bytecode {
        args.push("--bytecode".to_string());
    }

    args.extend(opts.entries.iter().map(|e| e.to_string_lossy().to_string()));
    args
}

/// Compile one target. Every failure, including a tool that cannot be
/// started, is folded into the returned result.
pub fn compile_target(
    target: TargetId,
    opts: &CompileOptions,
    tool: &dyn BuildTool,
) -> CompilationResult {
    let start = Instant::now();
    let out_file = opts.out_file(target);
    let args = build_args(target, opts, &out_file);

    debug!("{}: {} {}", target, opts.tool.program, args.join(" "));

    let outcome = tool.run(&opts.tool.program, &args);
    let duration = start.elapsed();

    match outcome {
        Ok(output) if output.exit_code == Some(0) => {
            CompilationResult::succeeded(target, duration, out_file)
        }
        Ok(output) => {
            let stderr = output.stderr.trim();
            let message = if stderr.is_empty() {
                "Unknown error"
            } else {
                stderr
            };
            let error = match output.exit_code {
                Some(code) => format!("Exit code {}: {}", code, message),
                None => format!("Terminated by signal: {}", message),
            };
            CompilationResult::failed(target, error, duration, out_file)
        }
        Err(e) => CompilationResult::failed(
            target,
            format!("Failed to execute {}: {}", opts.tool.program, e),
            duration,
            out_file,
        ),
    }
}
