//! Write-through JSON state files
//!
//! A [`StateFile`] is loaded once when a component is constructed and
//! written back on every mutation. Missing files load as `T::default()`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, SkillsyncError};

/// Serialize `value` as two-space indented JSON with a trailing newline
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write `value` to `path` as pretty JSON, creating parent directories
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| crate::error::fs::write_failed(path, e))?;
    }
    std::fs::write(path, to_pretty_json(value)?).map_err(|e| crate::error::fs::write_failed(path, e))
}

/// A persisted value with load-at-start, write-through semantics
#[derive(Debug)]
pub struct StateFile<T> {
    path: PathBuf,
    value: T,
}

impl<T> StateFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Load state from `path`, defaulting when the file does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let value = if path.is_file() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| crate::error::fs::read_failed(&path, e))?;
            serde_json::from_str(&content).map_err(|e| SkillsyncError::StateInvalid {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            T::default()
        };
        Ok(Self { path, value })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and persist it immediately
    pub fn replace(&mut self, value: T) -> Result<()> {
        write_json(&self.path, &value)?;
        self.value = value;
        Ok(())
    }

    /// Apply `mutate` to a copy of the value and persist the result
    pub fn update<F>(&mut self, mutate: F) -> Result<()>
    where
        T: Clone,
        F: FnOnce(&mut T),
    {
        let mut next = self.value.clone();
        mutate(&mut next);
        self.replace(next)
    }
}
