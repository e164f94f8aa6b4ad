//! Target catalog.
//!
//! A target is a `<platform>-<arch>[-musl]` token naming one platform the
//! external build tool can produce an executable for. The catalog is the
//! closed set of every supported combination, computed once per process.
//!
//! ## Catalog
//!
//! - `linux-x64`, `linux-arm64`
//! - `darwin-x64`, `darwin-arm64`
//! - `linux-x64-musl`, `linux-arm64-musl`

use serde::{Serialize, Serializer};
use std::fmt;
use std::process::Command;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Upper bound for parallel compilations.
pub const MAX_CONCURRENCY: usize = 16;

/// Platforms in catalog order.
pub const SUPPORTED_PLATFORMS: [Platform; 2] = [Platform::Linux, Platform::Darwin];

/// Architectures in catalog order.
pub const SUPPORTED_ARCHS: [Arch; 2] = [Arch::X64, Arch::Arm64];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Darwin,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
        }
    }

    /// Capitalized name for menus and listings.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Darwin => "Darwin",
        }
    }
}

impl FromStr for Platform {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linux" => Ok(Platform::Linux),
            "darwin" => Ok(Platform::Darwin),
            _ => Err(TargetError::Parse(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl FromStr for Arch {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x64" => Ok(Arch::X64),
            "arm64" => Ok(Arch::Arm64),
            _ => Err(TargetError::Parse(s.to_string())),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("Invalid target: '{0}' (expected <platform>-<arch>[-musl])")]
    Parse(String),
    #[error("Unsupported platform/arch: {os}-{arch}")]
    UnsupportedHost { os: String, arch: String },
}

/// One platform/architecture(/libc) combination.
///
/// Values can only be obtained from the catalog or by parsing, so a
/// `TargetId` is always valid (no `darwin-*-musl`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId {
    platform: Platform,
    arch: Arch,
    musl: bool,
}

impl TargetId {
    const fn standard(platform: Platform, arch: Arch) -> Self {
        Self {
            platform,
            arch,
            musl: false,
        }
    }

    const fn linux_musl(arch: Arch) -> Self {
        Self {
            platform: Platform::Linux,
            arch,
            musl: true,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn is_musl(&self) -> bool {
        self.musl
    }

    /// Identifier handed to the build tool, e.g. `bun-linux-x64`.
    pub fn build_tool_target(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self)
    }

    /// Human label such as `Linux X64 (musl)`.
    pub fn display_name(&self) -> String {
        let suffix = if self.musl { " (musl)" } else { "" };
        format!(
            "{} {}{}",
            self.platform.label(),
            self.arch.as_str().to_uppercase(),
            suffix
        )
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.arch)?;
        if self.musl {
            f.write_str("-musl")?;
        }
        Ok(())
    }
}

impl FromStr for TargetId {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AVAILABLE_TARGETS
            .iter()
            .find(|t| t.to_string() == s)
            .copied()
            .ok_or_else(|| TargetError::Parse(s.to_string()))
    }
}

impl Serialize for TargetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

static AVAILABLE_TARGETS: LazyLock<Vec<TargetId>> = LazyLock::new(|| {
    let mut base = Vec::new();
    let mut musl = Vec::new();

    for platform in SUPPORTED_PLATFORMS {
        for arch in SUPPORTED_ARCHS {
            base.push(TargetId::standard(platform, arch));
            if platform == Platform::Linux {
                musl.push(TargetId::linux_musl(arch));
            }
        }
    }

    base.extend(musl);
    base
});

/// Every supported target, standard targets first.
pub fn available_targets() -> &'static [TargetId] {
    &AVAILABLE_TARGETS
}

pub fn is_valid_target(target: &str) -> bool {
    target.parse::<TargetId>().is_ok()
}

pub fn targets_by_platform(platform: Platform) -> Vec<TargetId> {
    filter_targets(|t| t.platform == platform)
}

pub fn targets_by_arch(arch: Arch) -> Vec<TargetId> {
    filter_targets(|t| t.arch == arch)
}

pub fn musl_targets() -> Vec<TargetId> {
    filter_targets(|t| t.musl)
}

pub fn standard_targets() -> Vec<TargetId> {
    filter_targets(|t| !t.musl)
}

fn filter_targets(pred: impl Fn(&TargetId) -> bool) -> Vec<TargetId> {
    AVAILABLE_TARGETS.iter().copied().filter(|t| pred(t)).collect()
}

/// Whether the running Linux host links against musl libc.
pub fn is_musl_host() -> bool {
    if !cfg!(target_os = "linux") {
        return false;
    }

    // ldd prints its version banner to stderr on musl and stdout on glibc
    match Command::new("ldd").arg("--version").output() {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stderr).to_string();
            text.push_str(&String::from_utf8_lossy(&output.stdout));
            text.to_lowercase().contains("musl")
        }
        Err(_) => false,
    }
}

/// Maps `std::env::consts` names onto the catalog.
pub fn host_target(os: &str, arch: &str, musl: bool) -> Result<TargetId, TargetError> {
    let unsupported = || TargetError::UnsupportedHost {
        os: os.to_string(),
        arch: arch.to_string(),
    };

    let platform = match os {
        "linux" => Platform::Linux,
        "macos" | "darwin" => Platform::Darwin,
        _ => return Err(unsupported()),
    };
    let arch = match arch {
        "x86_64" | "x64" => Arch::X64,
        "aarch64" | "arm64" => Arch::Arm64,
        _ => return Err(unsupported()),
    };

    if platform == Platform::Linux && musl {
        Ok(TargetId::linux_musl(arch))
    } else {
        Ok(TargetId::standard(platform, arch))
    }
}

/// Target of the machine crossbake is running on.
pub fn current_platform_target() -> Result<TargetId, TargetError> {
    host_target(
        std::env::consts::OS,
        std::env::consts::ARCH,
        is_musl_host(),
    )
}
