use colored::*;

pub struct FeedbackAnalyzer;

impl FeedbackAnalyzer {
    /// Suggest a fix for a failed target's diagnostic text, when it matches a
    /// known failure.
    pub fn analyze(output: &str) -> Option<String> {
        // 1. Build tool not installed / not on PATH
        if output.starts_with("Failed to execute")
            && (output.contains("No such file or directory") || output.contains("not found"))
        {
            return Some(format!(
                "The build tool could not be started.\nInstall {} or point {} at it.",
                "bun".bold().yellow(),
                "CROSSBAKE_BUILD_TOOL".bold().green()
            ));
        }

        // 2. Unresolvable import in the entry
        if output.contains("Could not resolve") {
            return Some(format!(
                "It looks like a {} error.\nCheck the import paths of your entry or install the missing package.",
                "Module Resolution".bold().red()
            ));
        }

        // 3. Cross-compilation runtime download failed
        if output.contains("Failed to download") || output.contains("failed to fetch") {
            return Some(format!(
                "The runtime for this target could not be {}.\nCheck your network connection and retry.",
                "downloaded".bold().red()
            ));
        }

        None
    }
}
