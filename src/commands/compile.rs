//! Compile command handler
//!
//! Handles `crossbake compile`: layers CLI flags over `crossbake.toml`,
//! resolves the target list and drives the worker pool.

use anyhow::{Context, Result};
use colored::*;
use std::io::IsTerminal;

use crate::compile::{
    self, CompileOptions, InteractivePicker, NoPrompt, ProcessTool, ProgressBarSink,
    RawCompileOptions, TargetSelector,
};
use crate::config;
use crate::targets;
use crate::ui;

/// Flags of `crossbake compile` after clap parsing.
#[derive(Clone, Debug, Default)]
pub struct CompileArgs {
    pub entries: Vec<String>,
    pub targets: Vec<String>,
    pub current: bool,
    pub prefix: Option<String>,
    pub outdir: Option<String>,
    pub minify: bool,
    pub sourcemap: bool,
    pub bytecode: bool,
    pub clean: bool,
    pub concurrency: Option<usize>,
    pub no_prompt: bool,
    pub json: bool,
}

impl CompileArgs {
    /// Raw options before config layering. Boolean flags only count when set.
    pub fn to_raw(&self) -> Result<RawCompileOptions> {
        let targets = if self.current {
            let host = targets::current_platform_target()
                .context("Cannot build for the current platform")?;
            vec![host.to_string()]
        } else {
            self.targets.clone()
        };

        Ok(RawCompileOptions {
            entries: self.entries.clone(),
            targets,
            out_dir: self.outdir.clone(),
            out_file_prefix: self.prefix.clone(),
            minify: self.minify.then_some(true),
            sourcemap: self.sourcemap.then_some(true),
            bytecode: self.bytecode.then_some(true),
            clean: self.clean.then_some(true),
            max_concurrency: self.concurrency,
            tool: None,
        })
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag { "enabled" } else { "disabled" }
}

/// Status line shown before `--clean` removes the output directory.
fn clean_notice(opts: &CompileOptions) -> Option<String> {
    opts.clean
        .then(|| format!("Cleaning {} directory...", opts.out_dir.display()))
}

fn print_plan(opts: &CompileOptions) {
    if let Some(notice) = clean_notice(opts) {
        println!("{} {}", "🧹".yellow(), notice);
    }
    println!("{} Compiling the project...", "🔨".cyan());
    println!("{} Targeting platforms:", "ℹ".blue());
    let names: Vec<String> = opts.targets.iter().map(|t| t.to_string()).collect();
    ui::print_boxed(&names);
    println!("{} Compilation options:", "ℹ".blue());
    ui::print_boxed(&[
        format!("Minification:         {}", enabled(opts.minify)),
        format!("Bytecode generation:  {}", enabled(opts.bytecode)),
        format!("Sourcemap:            {}", enabled(opts.sourcemap)),
    ]);
}

/// Handle `crossbake compile`. Returns whether every target succeeded.
pub fn handle_compile(args: &CompileArgs) -> Result<bool> {
    let config = config::load_config()?;

    let mut raw = args.to_raw()?.with_config(&config.compile);
    raw.tool = Some(config.tool.resolve());

    let selector: Box<dyn TargetSelector> = if args.no_prompt || !std::io::stdin().is_terminal() {
        Box::new(NoPrompt)
    } else {
        Box::new(InteractivePicker::new())
    };

    let opts = compile::resolve_options(raw, selector.as_ref())?;

    let progress = if args.json {
        ProgressBarSink::hidden()
    } else {
        print_plan(&opts);
        ProgressBarSink::new(opts.targets.len())
    };

    let summary = compile::run(&opts, &ProcessTool, &progress)?;
    progress.finish();

    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        compile::print_report(&summary);
    }

    Ok(summary.success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_flags_stay_unset() {
        let args = CompileArgs {
            entries: vec!["src/main.ts".to_string()],
            targets: vec!["linux-x64".to_string()],
            minify: true,
            ..Default::default()
        };
        let raw = args.to_raw().unwrap();
        assert_eq!(raw.minify, Some(true));
        assert_eq!(raw.sourcemap, None);
        assert_eq!(raw.clean, None);
        assert_eq!(raw.targets, vec!["linux-x64"]);
    }

    #[test]
    fn test_clean_notice_only_when_cleaning() {
        let mut opts = CompileOptions {
            entries: vec!["src/main.ts".into()],
            out_dir: "dist".into(),
            out_file_prefix: String::new(),
            minify: false,
            sourcemap: false,
            bytecode: false,
            clean: false,
            max_concurrency: 4,
            targets: vec![],
            tool: Default::default(),
        };
        assert_eq!(clean_notice(&opts), None);

        opts.clean = true;
        assert_eq!(
            clean_notice(&opts).as_deref(),
            Some("Cleaning dist directory...")
        );
    }

    #[test]
    fn test_current_replaces_targets() {
        let args = CompileArgs {
            entries: vec!["src/main.ts".to_string()],
            current: true,
            ..Default::default()
        };
        match targets::current_platform_target() {
            Ok(host) => assert_eq!(args.to_raw().unwrap().targets, vec![host.to_string()]),
            Err(_) => {
                let err = args.to_raw().unwrap_err();
                assert_eq!(err.to_string(), "Cannot build for the current platform");
            }
        }
    }
}
