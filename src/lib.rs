//! # crossbake - Parallel Multi-Target Executable Builds
//!
//! crossbake compiles one or more program entries into standalone
//! executables for several platforms at once. Each target is built by an
//! external build tool (`bun build --compile` by default) running as its own
//! process, on a bounded pool of worker threads.
//!
//! ## Quick Start
//!
//! ```bash
//! # Build for two platforms, two at a time
//! crossbake compile src/main.ts --target linux-x64 darwin-arm64 --concurrency 2
//!
//! # Build for this machine only
//! crossbake compile src/main.ts --current
//! ```
//!
//! ## Module Organization
//!
//! - [`targets`] - Target catalog and host detection
//! - [`compile`] - Option resolution, worker pool, reporting
//! - [`config`] - Configuration parsing (`crossbake.toml`)
//! - [`commands`] - CLI command handlers

/// CLI command handlers extracted from main.
pub mod commands;

/// Multi-target compilation engine.
pub mod compile;

/// Configuration file parsing (`crossbake.toml`).
pub mod config;

/// Supported targets and host detection.
pub mod targets;

/// Terminal UI utilities (tables, boxes).
pub mod ui;
