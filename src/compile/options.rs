use super::compiler::ToolSpec;
use super::error::ConfigError;
use super::select::TargetSelector;
use crate::config::CompileConfig;
use crate::targets::{MAX_CONCURRENCY, TargetId};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_OUT_DIR: &str = "dist";
pub const DEFAULT_CONCURRENCY: usize = if MAX_CONCURRENCY < 4 {
    MAX_CONCURRENCY
} else {
    4
};

/// Options as supplied by the caller. `None` means "not given" so that the
/// config file and built-in defaults can fill the gap.
#[derive(Debug, Clone, Default)]
pub struct RawCompileOptions {
    pub entries: Vec<String>,
    pub targets: Vec<String>,
    pub out_dir: Option<String>,
    pub out_file_prefix: Option<String>,
    pub minify: Option<bool>,
    pub sourcemap: Option<bool>,
    pub bytecode: Option<bool>,
    pub clean: Option<bool>,
    pub max_concurrency: Option<usize>,
    pub tool: Option<ToolSpec>,
}

impl RawCompileOptions {
    /// Fill every unset field from `crossbake.toml`.
    ///
    /// The file's `targets` are used only when the command line named no
    /// targets at all. Command line targets that all turn out to be unknown
    /// still replace the file's list, so resolution falls through to the
    /// selector instead.
    pub fn with_config(mut self, config: &CompileConfig) -> Self {
        if self.targets.is_empty()
            && let Some(targets) = &config.targets
        {
            self.targets = targets.clone();
        }
        self.out_dir = self.out_dir.or_else(|| config.outdir.clone());
        self.out_file_prefix = self.out_file_prefix.or_else(|| config.prefix.clone());
        self.minify = self.minify.or(config.minify);
        self.sourcemap = self.sourcemap.or(config.sourcemap);
        self.bytecode = self.bytecode.or(config.bytecode);
        self.clean = self.clean.or(config.clean);
        self.max_concurrency = self.max_concurrency.or(config.concurrency);
        self
    }
}

/// Validated, fully defaulted options for one run.
#[derive(Debug, Clone, Serialize)]
pub struct CompileOptions {
    pub entries: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub out_file_prefix: String,
    pub minify: bool,
    pub sourcemap: bool,
    pub bytecode: bool,
    pub clean: bool,
    pub max_concurrency: usize,
    pub targets: Vec<TargetId>,
    #[serde(skip)]
    pub tool: ToolSpec,
}

impl CompileOptions {
    /// `<out_dir>/[<prefix>-]<target>`
    pub fn out_file(&self, target: TargetId) -> PathBuf {
        out_file_path(&self.out_dir, &self.out_file_prefix, target)
    }
}

pub fn out_file_path(out_dir: &Path, prefix: &str, target: TargetId) -> PathBuf {
    let file_name = if prefix.is_empty() {
        target.to_string()
    } else {
        format!("{}-{}", prefix, target)
    };
    out_dir.join(file_name)
}

/// Validate `raw` and merge it with defaults.
///
/// `selector` is consulted only when none of the requested targets is valid.
/// Nothing here starts a build tool process.
pub fn resolve_options(
    raw: RawCompileOptions,
    selector: &dyn TargetSelector,
) -> Result<CompileOptions, ConfigError> {
    if raw.entries.is_empty() || raw.entries.iter().any(|e| e.trim().is_empty()) {
        return Err(ConfigError::InvalidEntry {
            reason: "Entry file path is required and cannot be empty".to_string(),
        });
    }

    if let Some(value) = raw.max_concurrency
        && !(1..=MAX_CONCURRENCY).contains(&value)
    {
        return Err(ConfigError::InvalidConcurrency { value });
    }

    let entries: Vec<PathBuf> = raw.entries.iter().map(PathBuf::from).collect();
    if let Some(missing) = entries.iter().find(|p| !p.exists()) {
        return Err(ConfigError::InvalidEntry {
            reason: format!("Entry file not found: {}", missing.display()),
        });
    }

    let mut targets: Vec<TargetId> = Vec::new();
    for raw_target in &raw.targets {
        match raw_target.parse::<TargetId>() {
            Ok(t) if !targets.contains(&t) => targets.push(t),
            Ok(_) => debug!(requested = %raw_target, "dropping duplicate target"),
            Err(_) => debug!(requested = %raw_target, "dropping unknown target"),
        }
    }

    if targets.is_empty() {
        targets = selector.select().map_err(|e| {
            debug!("target selection failed: {}", e);
            ConfigError::NoTargetsSelected
        })?;
        let mut seen = Vec::with_capacity(targets.len());
        targets.retain(|t| {
            let fresh = !seen.contains(t);
            seen.push(*t);
            fresh
        });
        if targets.is_empty() {
            return Err(ConfigError::NoTargetsSelected);
        }
    }

    Ok(CompileOptions {
        entries,
        out_dir: PathBuf::from(raw.out_dir.unwrap_or_else(|| DEFAULT_OUT_DIR.to_string())),
        out_file_prefix: raw.out_file_prefix.unwrap_or_default(),
        minify: raw.minify.unwrap_or(false),
        sourcemap: raw.sourcemap.unwrap_or(false),
        bytecode: raw.bytecode.unwrap_or(false),
        clean: raw.clean.unwrap_or(false),
        max_concurrency: raw.max_concurrency.unwrap_or(DEFAULT_CONCURRENCY),
        targets,
        tool: raw.tool.unwrap_or_default(),
    })
}
