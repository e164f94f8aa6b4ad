//! Target command handler
//!
//! Handles `crossbake targets`, listing the catalog of compilation targets.

use crate::targets::{self, Arch, Platform, TargetId};
use crate::ui::Table;
use colored::*;

/// Narrowing applied to the catalog listing.
#[derive(Clone, Debug, Default)]
pub struct TargetFilter {
    pub platform: Option<Platform>,
    pub arch: Option<Arch>,
    pub musl_only: bool,
    pub standard_only: bool,
}

impl TargetFilter {
    pub fn apply(&self) -> Vec<TargetId> {
        let mut list = if self.musl_only {
            targets::musl_targets()
        } else if self.standard_only {
            targets::standard_targets()
        } else {
            targets::available_targets().to_vec()
        };

        if let Some(platform) = self.platform {
            let keep = targets::targets_by_platform(platform);
            list.retain(|t| keep.contains(t));
        }
        if let Some(arch) = self.arch {
            let keep = targets::targets_by_arch(arch);
            list.retain(|t| keep.contains(t));
        }
        list
    }
}

/// Handle the `crossbake targets` command
pub fn handle_targets_command(filter: &TargetFilter) {
    let current = targets::current_platform_target().ok();
    let list = filter.apply();

    println!("{} {}", "🎯".cyan(), "Available Compilation Targets".bold());
    println!("{}", "─".repeat(50).dimmed());

    if list.is_empty() {
        println!("{} No targets match the given filters", "!".yellow());
        return;
    }

    let mut table = Table::new(&["Target", "Platform", "Arch", "Libc"]);
    for target in &list {
        let name = if Some(*target) == current {
            format!("{} {}", target.to_string().green().bold(), "(current)".dimmed())
        } else {
            target.to_string()
        };
        table.add_row(vec![
            name,
            target.platform().label().to_string(),
            target.arch().as_str().to_string(),
            if target.is_musl() { "musl" } else { "default" }.to_string(),
        ]);
    }
    table.print();

    println!();
    println!(
        "Usage: {}",
        "crossbake compile <entry> --target <target>...".cyan()
    );
    println!(
        "Hint: use {} to build only for this machine",
        "--current".cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[TargetId]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_no_filter_lists_catalog() {
        assert_eq!(TargetFilter::default().apply().len(), 6);
    }

    #[test]
    fn test_combined_filters() {
        let filter = TargetFilter {
            platform: Some(Platform::Linux),
            arch: Some(Arch::Arm64),
            ..Default::default()
        };
        assert_eq!(
            names(&filter.apply()),
            vec!["linux-arm64", "linux-arm64-musl"]
        );

        let filter = TargetFilter {
            platform: Some(Platform::Darwin),
            musl_only: true,
            ..Default::default()
        };
        assert!(filter.apply().is_empty());

        let filter = TargetFilter {
            arch: Some(Arch::X64),
            standard_only: true,
            ..Default::default()
        };
        assert_eq!(names(&filter.apply()), vec!["linux-x64", "darwin-x64"]);
    }
}
