//! Command implementations for skillsync CLI
//!
//! Each command is a thin wrapper: open the [`Workspace`], call one library
//! operation, print the result.

pub mod completions;
pub mod defaults;
pub mod folders;
pub mod skills;
pub mod sources;
pub mod sync;

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::activation::ApplyReport;
use crate::config::StoragePaths;
use crate::error::{Result, SkillsyncError};
use crate::workspace::Workspace;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// `--workspace`, when given
    pub workspace: Option<PathBuf>,
    /// Whether prompts may be shown
    pub interactive: bool,
}

impl Context {
    pub fn workspace_root(&self) -> Result<PathBuf> {
        match &self.workspace {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().map_err(|e| SkillsyncError::IoError {
                message: format!("Failed to get current directory: {e}"),
            }),
        }
    }

    pub fn open(&self) -> Result<Workspace> {
        let root = self.workspace_root()?;
        Workspace::open(&root, StoragePaths::from_env()?, self.interactive)
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Summarize a materialization for the terminal
pub(crate) fn print_apply(report: &ApplyReport) {
    let result = &report.result;
    if result.copied == 0 && result.removed == 0 && result.skipped_manual == 0 {
        println!("{}", Style::new().dim().apply_to("Skills folder is empty."));
    } else {
        let mut parts = vec![format!("{} copied", result.copied)];
        if result.removed > 0 {
            parts.push(format!("{} removed", result.removed));
        }
        if result.skipped_manual > 0 {
            parts.push(format!("{} protected", result.skipped_manual));
        }
        println!("{} {}", Style::new().bold().apply_to("Skills folder:"), parts.join(", "));
    }

    for id in &report.missing {
        println!(
            "  {} {} is enabled but no source provides it",
            Style::new().yellow().apply_to("!"),
            id
        );
    }
}
