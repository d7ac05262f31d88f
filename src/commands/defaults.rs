//! Global defaults command implementation

use console::Style;

use super::{Context, print_apply};
use crate::cli::{DefaultsArgs, DefaultsSubcommand, SkillsArgs};
use crate::error::Result;
use crate::selection::IdSet;
use crate::workspace::resolve_skills;

/// Run defaults command
pub fn run(ctx: &Context, args: &DefaultsArgs) -> Result<()> {
    match &args.command {
        DefaultsSubcommand::Add(skills) => update(ctx, skills, true),
        DefaultsSubcommand::Remove(skills) => update(ctx, skills, false),
        DefaultsSubcommand::List => list(ctx),
        DefaultsSubcommand::Apply => apply(ctx),
    }
}

fn update(ctx: &Context, args: &SkillsArgs, add: bool) -> Result<()> {
    let mut workspace = ctx.open()?;
    let bundles = workspace.discover();
    let ids = resolve_skills(&args.skills, &bundles, &workspace.known_ids())?;

    let mut defaults: IdSet = workspace.overlay.defaults().clone();
    for id in &ids {
        if add {
            defaults.insert(id.clone());
        } else {
            defaults.remove(id);
        }
    }
    workspace.overlay.replace_defaults(defaults)?;

    let verb = if add { "Added default" } else { "Removed default" };
    for id in &ids {
        println!("{} {verb} {id}", Style::new().green().apply_to("✓"));
    }
    Ok(())
}

fn list(ctx: &Context) -> Result<()> {
    let workspace = ctx.open()?;
    let defaults = workspace.overlay.defaults();
    if defaults.is_empty() {
        println!("No default skills.");
        return Ok(());
    }

    println!("Default skills ({}):", defaults.len());
    for id in defaults {
        if workspace.overlay.is_frozen(id) {
            println!("  {id} {}", Style::new().cyan().apply_to("frozen"));
        } else {
            println!("  {id}");
        }
    }
    Ok(())
}

fn apply(ctx: &Context) -> Result<()> {
    let mut workspace = ctx.open()?;
    let bundles = workspace.discover();
    let report = workspace.activation(&bundles).apply_defaults()?;

    if report.filtered_frozen > 0 {
        println!(
            "{} {} skipped because frozen",
            Style::new().cyan().apply_to("❄"),
            super::sources::plural(report.filtered_frozen, "default")
        );
    }
    print_apply(&report.apply);
    Ok(())
}
