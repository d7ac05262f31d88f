//! Source registration commands: add, remove, sources

use console::Style;

use super::{Context, print_apply, print_json};
use crate::cli::{AddArgs, RemoveArgs, SourcesArgs};
use crate::discovery::discover_source;
use crate::error::Result;
use crate::progress::SyncProgress;
use crate::source::Source;

/// Run add command
pub fn run_add(ctx: &Context, args: AddArgs) -> Result<()> {
    let mut workspace = ctx.open()?;
    let (source, added) = workspace.add_source(&args.input)?;

    if added {
        println!(
            "Added source {} {}",
            Style::new().bold().yellow().apply_to(source.label()),
            Style::new().dim().apply_to(format!("({})", source.id))
        );
    } else {
        println!(
            "Source {} is already registered {}",
            Style::new().bold().yellow().apply_to(source.label()),
            Style::new().dim().apply_to(format!("({})", source.id))
        );
    }

    if args.no_sync {
        return Ok(());
    }

    let progress = SyncProgress::new(format!("Syncing {}", source.label()));
    let outcome = workspace.sync_source(&source.id);
    progress.finish();
    let outcome = outcome?;

    let found = discover_source(&source, &workspace.content_root(&source)).len();
    println!(
        "{} {} ({}), {} found",
        Style::new().green().apply_to("✓"),
        outcome.action,
        outcome
            .auth_mode
            .map_or_else(|| "local".to_string(), |mode| mode.to_string()),
        plural(found, "skill")
    );
    Ok(())
}

/// Run remove command
pub fn run_remove(ctx: &Context, args: &RemoveArgs) -> Result<()> {
    let mut workspace = ctx.open()?;
    let removed = workspace.remove_source(&args.source)?;

    println!(
        "Removed source {}",
        Style::new().bold().yellow().apply_to(removed.source.label())
    );
    if removed.ids_removed > 0 {
        println!("  {} cleared", plural(removed.ids_removed, "skill selection"));
    }
    print_apply(&removed.apply);
    Ok(())
}

/// Run sources command
pub fn run_sources(ctx: &Context, args: &SourcesArgs) -> Result<()> {
    let workspace = ctx.open()?;
    let sources = workspace.registry.list();

    if args.json {
        return print_json(sources);
    }

    if sources.is_empty() {
        println!("No sources registered.");
        return Ok(());
    }

    println!("Sources ({}):", sources.len());
    println!();
    for source in sources {
        display_source(source);
        println!();
    }
    Ok(())
}

fn display_source(source: &Source) {
    let bold = Style::new().bold();
    println!(
        "  {} {}",
        Style::new().bold().yellow().apply_to(source.label()),
        Style::new().dim().apply_to(&source.id)
    );
    println!("    {} {}", bold.apply_to("type:"), source.kind);
    println!("    {} {}", bold.apply_to("uri:"), source.uri);
    if let Some(branch) = &source.branch {
        println!("    {} {}", bold.apply_to("branch:"), branch);
    }
    if let Some(path) = &source.skills_root_path {
        println!("    {} {}", bold.apply_to("path:"), path);
    }
    if let Some(slug) = &source.skill_slug {
        println!("    {} {}", bold.apply_to("skill:"), slug);
    }
    match source.last_sync_at {
        Some(at) => {
            let auth = source
                .auth_mode
                .map(|mode| format!(" via {mode}"))
                .unwrap_or_default();
            println!(
                "    {} {}{}",
                bold.apply_to("synced:"),
                at.format("%Y-%m-%d %H:%M:%S UTC"),
                auth
            );
        }
        None => println!("    {} {}", bold.apply_to("synced:"), Style::new().dim().apply_to("never")),
    }
}

pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
