use crate::compile::{ConfigError, ToolSpec};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Project configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "crossbake.toml";

/// Environment variable overriding `[tool] program`.
pub const BUILD_TOOL_ENV: &str = "CROSSBAKE_BUILD_TOOL";

#[derive(Deserialize, Debug, Default)]
pub struct CrossbakeConfig {
    #[serde(default)]
    pub compile: CompileConfig,
    #[serde(default)]
    pub tool: ToolConfig,
}

/// Defaults for `crossbake compile`; CLI flags take precedence.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct CompileConfig {
    pub outdir: Option<String>,
    pub prefix: Option<String>,
    pub targets: Option<Vec<String>>,
    pub concurrency: Option<usize>,
    pub minify: Option<bool>,
    pub sourcemap: Option<bool>,
    pub bytecode: Option<bool>,
    pub clean: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ToolConfig {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
    pub target_prefix: Option<String>,
}

impl ToolConfig {
    /// Fills unset fields from the bun defaults; the environment wins over
    /// the file for the program.
    pub fn resolve(&self) -> ToolSpec {
        let env_program = std::env::var(BUILD_TOOL_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty());
        self.resolve_with(env_program)
    }

    fn resolve_with(&self, env_program: Option<String>) -> ToolSpec {
        let defaults = ToolSpec::default();
        ToolSpec {
            program: env_program
                .or_else(|| self.program.clone())
                .unwrap_or(defaults.program),
            args: self.args.clone().unwrap_or(defaults.args),
            target_prefix: self
                .target_prefix
                .clone()
                .unwrap_or(defaults.target_prefix),
        }
    }
}

/// Load `crossbake.toml` from the current directory. A missing file is not an
/// error; everything falls back to defaults.
pub fn load_config() -> Result<CrossbakeConfig, ConfigError> {
    load_config_from(Path::new(CONFIG_FILE))
}

pub fn load_config_from(path: &Path) -> Result<CrossbakeConfig, ConfigError> {
    if !path.exists() {
        return Ok(CrossbakeConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Config {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Config {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[compile]
outdir = "build"
prefix = "app"
targets = ["linux-x64", "darwin-arm64"]
concurrency = 2
minify = true

[tool]
program = "/opt/bun/bin/bun"
target_prefix = ""
"#;
        let config: CrossbakeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.compile.outdir.as_deref(), Some("build"));
        assert_eq!(config.compile.prefix.as_deref(), Some("app"));
        assert_eq!(config.compile.concurrency, Some(2));
        assert_eq!(config.compile.minify, Some(true));
        assert_eq!(config.compile.sourcemap, None);
        assert_eq!(
            config.compile.targets,
            Some(vec!["linux-x64".to_string(), "darwin-arm64".to_string()])
        );

        let tool = config.tool.resolve_with(None);
        assert_eq!(tool.program, "/opt/bun/bin/bun");
        assert_eq!(tool.args, vec!["build", "--compile"]);
        assert_eq!(tool.target_prefix, "");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: CrossbakeConfig = toml::from_str("").unwrap();
        assert!(config.compile.outdir.is_none());
        let tool = config.tool.resolve_with(None);
        assert_eq!(tool.program, "bun");
        assert_eq!(tool.target_prefix, "bun-");
    }

    #[test]
    fn test_env_program_overrides_file() {
        let tool = ToolConfig {
            program: Some("bun".to_string()),
            ..Default::default()
        };
        let spec = tool.resolve_with(Some("/tmp/fake-bun".to_string()));
        assert_eq!(spec.program, "/tmp/fake-bun");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert!(config.compile.targets.is_none());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[compile\nouts = ").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Config { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
