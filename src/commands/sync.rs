//! Sync command implementation

use console::Style;

use super::{Context, print_apply};
use crate::cli::SyncArgs;
use crate::error::{Result, SkillsyncError};
use crate::progress::SyncProgress;
use crate::sync::{SyncOutcome, SyncReport};
use crate::workspace::Workspace;

/// Run sync command
pub fn run(ctx: &Context, args: &SyncArgs) -> Result<()> {
    let mut workspace = ctx.open()?;

    if let Some(query) = &args.source {
        let source = workspace.registry.find(query)?.clone();
        let progress = SyncProgress::new(format!("Syncing {}", source.label()));
        let outcome = workspace.sync_source(&source.id);
        progress.finish();
        print_outcome(&source.label(), &outcome?);
    } else {
        sync_every(&mut workspace)?;
    }

    if !args.no_apply {
        let bundles = workspace.discover();
        let report = workspace.activation(&bundles).apply()?;
        print_apply(&report);
    }
    Ok(())
}

/// Sync every registered source, printing one line per source
///
/// Fails with [`SkillsyncError::SyncIncomplete`] after all sources were tried
/// when any of them failed.
pub(crate) fn sync_every(workspace: &mut Workspace) -> Result<()> {
    let total = workspace.registry.list().len();
    if total == 0 {
        println!("No sources registered.");
        return Ok(());
    }

    let progress = SyncProgress::new("Syncing sources");
    let reports = workspace.sync_all(|source, current, total| progress.update(&source.label(), current, total));
    progress.finish();

    let failed = reports.iter().filter(|report| report.result.is_err()).count();
    for report in &reports {
        print_report(report);
    }

    if failed > 0 {
        return Err(SkillsyncError::SyncIncomplete { failed, total });
    }
    Ok(())
}

fn print_outcome(label: &str, outcome: &SyncOutcome) {
    let auth = outcome
        .auth_mode
        .map(|mode| format!(" via {mode}"))
        .unwrap_or_default();
    println!(
        "{} {} {}",
        Style::new().green().apply_to("✓"),
        Style::new().bold().apply_to(label),
        Style::new().dim().apply_to(format!("{}{auth}", outcome.action))
    );
}

fn print_report(report: &SyncReport) {
    match &report.result {
        Ok(outcome) => print_outcome(&report.label, outcome),
        Err(err) => println!(
            "{} {}: {}",
            Style::new().red().apply_to("✗"),
            Style::new().bold().apply_to(&report.label),
            err
        ),
    }
}
