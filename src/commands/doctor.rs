//! Doctor command handler
//!
//! Handles `crossbake doctor`: reports the host target, the configured build
//! tool and the project configuration.

use anyhow::Result;
use colored::*;
use std::path::Path;
use std::process::Command;

use crate::config::{self, BUILD_TOOL_ENV, CONFIG_FILE};
use crate::targets;

/// Version line printed by `<program> --version`, if it runs.
pub fn tool_version(program: &str) -> Option<String> {
    let output = Command::new(program).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let line = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or("unknown")
        .trim()
        .to_string();
    Some(line)
}

/// Run the `crossbake doctor` command to diagnose system issues
pub fn run_doctor() -> Result<()> {
    println!("{} Running Doctor...", "🚑".red());
    println!("-------------------------------");

    print!("Checking OS... ");
    println!(
        "{} ({})",
        std::env::consts::OS.green(),
        std::env::consts::ARCH.cyan()
    );

    print!("Checking host target... ");
    match targets::current_platform_target() {
        Ok(target) => println!("{}", target.to_string().green()),
        Err(e) => println!("{}", e.to_string().red()),
    }

    print!("Checking {}... ", CONFIG_FILE);
    let config = if Path::new(CONFIG_FILE).exists() {
        match config::load_config() {
            Ok(cfg) => {
                println!("{}", "Found".green());
                cfg
            }
            Err(e) => {
                println!("{}", e.to_string().red());
                Default::default()
            }
        }
    } else {
        println!("{}", "Not Found (Optional)".yellow());
        Default::default()
    };

    let tool = config.tool.resolve();
    print!("Checking build tool '{}'... ", tool.program);
    match tool_version(&tool.program) {
        Some(version) => println!("{} ({})", "Found".green(), version),
        None => println!(
            "{}",
            format!("Not Found (install bun or set {})", BUILD_TOOL_ENV).red()
        ),
    }

    Ok(())
}
