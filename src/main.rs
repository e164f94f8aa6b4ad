//! # crossbake CLI Entry Point
//!
//! This is the main executable for the `crossbake` command-line tool.
//! It parses CLI arguments using clap and routes commands to the appropriate handlers.
//!
//! ## Command Structure
//!
//! - `compile` - build entries for one or more targets
//! - `targets` - list the supported targets
//! - `doctor` - check the host and the build tool
//! - `completion` - generate shell completion scripts

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use tracing::Level;

use crossbake::commands;
use crossbake::commands::compile::CompileArgs;
use crossbake::commands::target::TargetFilter;
use crossbake::targets::{Arch, Platform};

#[derive(Parser)]
#[command(name = "crossbake")]
#[command(about = "Compile entries into standalone executables for many targets", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile provided entries into single-file executables
    Compile {
        /// Entry files passed to the build tool
        #[arg(required = true, num_args = 1..)]
        entries: Vec<String>,
        /// Target platforms (e.g. linux-x64 darwin-arm64 linux-x64-musl)
        #[arg(short, long = "target", num_args = 1.., conflicts_with = "current")]
        targets: Vec<String>,
        /// Build for the current platform only
        #[arg(long)]
        current: bool,
        /// Add prefix to compiled executable(s)
        #[arg(long)]
        prefix: Option<String>,
        /// Path to output directory [default: dist]
        #[arg(long)]
        outdir: Option<String>,
        /// Enable all minification flags of the build tool
        #[arg(long)]
        minify: bool,
        /// Compile with sourcemaps
        #[arg(long)]
        sourcemap: bool,
        /// Use a bytecode cache for compiled executable
        #[arg(long)]
        bytecode: bool,
        /// Clean output directory before compiling
        #[arg(long)]
        clean: bool,
        /// Max concurrent compilation processes [default: 4]
        #[arg(long, value_parser = clap::value_parser!(usize))]
        concurrency: Option<usize>,
        /// Never prompt for targets
        #[arg(long)]
        no_prompt: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported compilation targets
    Targets {
        /// Only targets of this platform (linux, darwin)
        #[arg(long)]
        platform: Option<Platform>,
        /// Only targets of this architecture (x64, arm64)
        #[arg(long)]
        arch: Option<Arch>,
        /// Only musl libc targets
        #[arg(long, conflicts_with = "standard")]
        musl: bool,
        /// Only non-musl targets
        #[arg(long)]
        standard: bool,
    },
    /// Diagnose the host and the build tool
    Doctor,
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compile {
            entries,
            targets,
            current,
            prefix,
            outdir,
            minify,
            sourcemap,
            bytecode,
            clean,
            concurrency,
            no_prompt,
            json,
        } => {
            let args = CompileArgs {
                entries,
                targets,
                current,
                prefix,
                outdir,
                minify,
                sourcemap,
                bytecode,
                clean,
                concurrency,
                no_prompt,
                json,
            };

            match commands::compile::handle_compile(&args) {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    eprintln!("{} Compilation failed: {:#}", "x".red(), e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Targets {
            platform,
            arch,
            musl,
            standard,
        } => {
            commands::target::handle_targets_command(&TargetFilter {
                platform,
                arch,
                musl_only: musl,
                standard_only: standard,
            });
            Ok(())
        }

        Commands::Doctor => commands::doctor::run_doctor(),

        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
