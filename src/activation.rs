//! Enabling, disabling and freezing skills
//!
//! Combines the selection overlay with the materializer. Overlay changes are
//! written first and the destination is materialized afterwards; when
//! materialization fails the enabled set is restored to its previous value.
//!
//! Ordering rules:
//! - enable checks the frozen set before anything is persisted
//! - freeze removes the id from the enabled set (and persists) before adding
//!   it to the frozen set
//! - unfreeze never enables

use serde::Serialize;
use tracing::{info, warn};

use crate::discovery::SkillBundle;
use crate::error::{Result, SkillsyncError};
use crate::materialize::{MaterializeResult, Materializer};
use crate::selection::{IdSet, SelectionOverlay};

/// Result of an operation that re-materialized the destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    #[serde(flatten)]
    pub result: MaterializeResult,
    /// Enabled ids that no discovered bundle matches
    pub missing: Vec<String>,
}

/// Result of applying global defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsReport {
    #[serde(flatten)]
    pub apply: ApplyReport,
    /// Defaults not enabled because they are frozen
    pub filtered_frozen: usize,
}

/// Bundles selected by `enabled` and not `frozen`, and the enabled ids nothing matched
pub fn desired_bundles(
    enabled: &IdSet,
    frozen: &IdSet,
    bundles: &[SkillBundle],
) -> (Vec<SkillBundle>, Vec<String>) {
    let desired: Vec<SkillBundle> = bundles
        .iter()
        .filter(|bundle| enabled.contains(&bundle.id) && !frozen.contains(&bundle.id))
        .cloned()
        .collect();
    let missing = enabled
        .iter()
        .filter(|id| !bundles.iter().any(|bundle| &bundle.id == *id))
        .cloned()
        .collect();
    (desired, missing)
}

/// Overlay + materializer over one discovery snapshot
pub struct Activation<'a> {
    overlay: &'a mut SelectionOverlay,
    materializer: &'a Materializer,
    bundles: &'a [SkillBundle],
}

impl<'a> Activation<'a> {
    pub fn new(overlay: &'a mut SelectionOverlay, materializer: &'a Materializer, bundles: &'a [SkillBundle]) -> Self {
        Self {
            overlay,
            materializer,
            bundles,
        }
    }

    fn materialize_current(&self) -> Result<ApplyReport> {
        let (desired, missing) = desired_bundles(self.overlay.enabled(), self.overlay.frozen(), self.bundles);
        for id in &missing {
            warn!(id, "Enabled skill is not provided by any source");
        }
        let result = self.materializer.materialize(&desired)?;
        Ok(ApplyReport { result, missing })
    }

    /// Persist `next` as the enabled set, materialize, and restore `previous` on failure
    fn switch_enabled(&mut self, previous: IdSet, next: IdSet) -> Result<ApplyReport> {
        self.overlay.replace_enabled(next)?;
        match self.materialize_current() {
            Ok(report) => Ok(report),
            Err(err) => {
                warn!("Materialization failed, restoring enabled skills: {err}");
                self.overlay.replace_enabled(previous)?;
                Err(err)
            }
        }
    }

    fn require_known(&self, id: &str) -> Result<()> {
        if self.bundles.iter().any(|bundle| bundle.id == id) {
            Ok(())
        } else {
            Err(SkillsyncError::SkillNotFound { id: id.to_string() })
        }
    }

    /// Re-materialize the current enabled set
    pub fn apply(&mut self) -> Result<ApplyReport> {
        self.materialize_current()
    }

    /// Enable `ids`; refused for any frozen id, with nothing persisted
    pub fn enable(&mut self, ids: &[String]) -> Result<ApplyReport> {
        for id in ids {
            if self.overlay.is_frozen(id) {
                return Err(SkillsyncError::SkillFrozen { id: id.clone() });
            }
            self.require_known(id)?;
        }

        let previous = self.overlay.enabled().clone();
        let mut next = previous.clone();
        next.extend(ids.iter().cloned());
        let report = self.switch_enabled(previous, next)?;
        info!(count = ids.len(), "Enabled skills");
        Ok(report)
    }

    /// Disable `ids`
    pub fn disable(&mut self, ids: &[String]) -> Result<ApplyReport> {
        let previous = self.overlay.enabled().clone();
        let next: IdSet = previous.iter().filter(|id| !ids.contains(id)).cloned().collect();
        let report = self.switch_enabled(previous, next)?;
        info!(count = ids.len(), "Disabled skills");
        Ok(report)
    }

    /// Freeze `id`, disabling it first when enabled
    ///
    /// Returns the materialization report when the id had to be disabled.
    pub fn freeze(&mut self, id: &str) -> Result<Option<ApplyReport>> {
        let was_enabled = self.overlay.enabled().contains(id);
        if was_enabled {
            let next: IdSet = self.overlay.enabled().iter().filter(|e| *e != id).cloned().collect();
            self.overlay.replace_enabled(next)?;
        }

        let mut frozen = self.overlay.frozen().clone();
        frozen.insert(id.to_string());
        self.overlay.replace_frozen(frozen)?;
        info!(id, "Froze skill");

        if was_enabled {
            // The overlay is already consistent; the folder goes on the next apply if this fails
            return self.materialize_current().map(Some);
        }
        Ok(None)
    }

    /// Unfreeze `id`; returns whether it was frozen
    pub fn unfreeze(&mut self, id: &str) -> Result<bool> {
        if !self.overlay.is_frozen(id) {
            return Ok(false);
        }
        let frozen: IdSet = self.overlay.frozen().iter().filter(|f| *f != id).cloned().collect();
        self.overlay.replace_frozen(frozen)?;
        info!(id, "Unfroze skill");
        Ok(true)
    }

    /// Union the global defaults into the enabled set, skipping frozen ids
    pub fn apply_defaults(&mut self) -> Result<DefaultsReport> {
        let frozen = self.overlay.frozen().clone();
        let (allowed, blocked): (Vec<String>, Vec<String>) =
            self.overlay.defaults().iter().cloned().partition(|id| !frozen.contains(id));

        let previous = self.overlay.enabled().clone();
        let mut next = previous.clone();
        next.extend(allowed);
        let apply = self.switch_enabled(previous, next)?;
        info!(filtered = blocked.len(), "Applied default skills");
        Ok(DefaultsReport {
            apply,
            filtered_frozen: blocked.len(),
        })
    }
}
