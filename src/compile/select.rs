//! Target selection when no usable target was requested.
//!
//! The resolver only sees the [`TargetSelector`] trait, so the scheduler and
//! its tests never depend on a terminal.

use crate::targets::{self, SUPPORTED_PLATFORMS, TargetId};
use inquire::{InquireError, MultiSelect};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("target selection was cancelled")]
    Cancelled,
    #[error("target selection unavailable: {0}")]
    Unavailable(String),
}

pub trait TargetSelector {
    /// Returns a non-empty list of targets or an error.
    fn select(&self) -> Result<Vec<TargetId>, SelectionError>;
}

/// A list chosen up front by the caller.
#[derive(Debug, Clone)]
pub struct ExplicitTargets(pub Vec<TargetId>);

impl TargetSelector for ExplicitTargets {
    fn select(&self) -> Result<Vec<TargetId>, SelectionError> {
        if self.0.is_empty() {
            return Err(SelectionError::Cancelled);
        }
        Ok(self.0.clone())
    }
}

/// Refuses to choose; used with `--no-prompt` and when stdin is not a tty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl TargetSelector for NoPrompt {
    fn select(&self) -> Result<Vec<TargetId>, SelectionError> {
        Err(SelectionError::Unavailable(
            "no targets given and prompting is disabled".to_string(),
        ))
    }
}

/// Multi-select menu over the whole catalog, grouped by platform.
#[derive(Debug, Clone, Default)]
pub struct InteractivePicker {
    current: Option<TargetId>,
}

impl InteractivePicker {
    pub fn new() -> Self {
        Self {
            current: targets::current_platform_target().ok(),
        }
    }

    fn choices(&self) -> Vec<PickerChoice> {
        SUPPORTED_PLATFORMS
            .iter()
            .flat_map(|p| targets::targets_by_platform(*p))
            .map(|target| PickerChoice {
                target,
                current: self.current == Some(target),
            })
            .collect()
    }
}

struct PickerChoice {
    target: TargetId,
    current: bool,
}

impl fmt::Display for PickerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.current {
            f.write_str("[current] ")?;
        }
        f.write_str(&self.target.display_name())
    }
}

impl TargetSelector for InteractivePicker {
    fn select(&self) -> Result<Vec<TargetId>, SelectionError> {
        let choices = self.choices();
        let page_size = choices.len().min(10);

        let picked = MultiSelect::new("Select targets to compile for", choices)
            .with_page_size(page_size)
            .prompt()
            .map_err(|e| match e {
                InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                    SelectionError::Cancelled
                }
                other => SelectionError::Unavailable(other.to_string()),
            })?;

        if picked.is_empty() {
            return Err(SelectionError::Cancelled);
        }
        Ok(picked.into_iter().map(|c| c.target).collect())
    }
}
