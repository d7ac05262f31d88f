//! Skill selection commands: list, enable, disable, freeze, unfreeze, apply

use console::Style;
use serde::Serialize;

use super::{Context, print_apply, print_json};
use crate::cli::{ApplyArgs, ListArgs, SkillArgs, SkillsArgs};
use crate::discovery::SkillBundle;
use crate::error::Result;
use crate::workspace::{resolve_skill, resolve_skills};

/// One line of `skillsync list`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkillRow<'a> {
    #[serde(flatten)]
    bundle: &'a SkillBundle,
    enabled: bool,
    frozen: bool,
    default: bool,
}

/// Run list command
pub fn run_list(ctx: &Context, args: &ListArgs) -> Result<()> {
    let workspace = ctx.open()?;
    let bundles = workspace.discover();
    let overlay = &workspace.overlay;

    let rows: Vec<SkillRow<'_>> = bundles
        .iter()
        .map(|bundle| SkillRow {
            bundle,
            enabled: overlay.enabled().contains(&bundle.id),
            frozen: overlay.is_frozen(&bundle.id),
            default: overlay.defaults().contains(&bundle.id),
        })
        .filter(|row| !args.enabled || row.enabled)
        .collect();

    if args.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        if workspace.registry.list().is_empty() {
            println!("No sources registered. Add one with 'skillsync add <url>'.");
        } else {
            println!("No skills found.");
        }
        return Ok(());
    }

    println!("Skills ({}):", rows.len());
    println!();
    for row in &rows {
        let marker = if row.enabled {
            Style::new().green().apply_to("●")
        } else {
            Style::new().dim().apply_to("○")
        };
        let mut tags = Vec::new();
        if row.frozen {
            tags.push(Style::new().cyan().apply_to("frozen").to_string());
        }
        if row.default {
            tags.push(Style::new().blue().apply_to("default").to_string());
        }
        println!(
            "  {marker} {} {} {}",
            Style::new().bold().yellow().apply_to(&row.bundle.slug),
            Style::new().dim().apply_to(&row.bundle.id),
            tags.join(" ")
        );
    }
    Ok(())
}

/// Run enable command
pub fn run_enable(ctx: &Context, args: &SkillsArgs) -> Result<()> {
    let mut workspace = ctx.open()?;
    let bundles = workspace.discover();
    let ids = resolve_skills(&args.skills, &bundles, &workspace.known_ids())?;

    let report = workspace.activation(&bundles).enable(&ids)?;
    for id in &ids {
        println!("{} Enabled {}", Style::new().green().apply_to("✓"), id);
    }
    print_apply(&report);
    Ok(())
}

/// Run disable command
pub fn run_disable(ctx: &Context, args: &SkillsArgs) -> Result<()> {
    let mut workspace = ctx.open()?;
    let bundles = workspace.discover();
    let ids = resolve_skills(&args.skills, &bundles, &workspace.known_ids())?;

    let report = workspace.activation(&bundles).disable(&ids)?;
    for id in &ids {
        println!("{} Disabled {}", Style::new().green().apply_to("✓"), id);
    }
    print_apply(&report);
    Ok(())
}

/// Run freeze command
pub fn run_freeze(ctx: &Context, args: &SkillArgs) -> Result<()> {
    let mut workspace = ctx.open()?;
    let bundles = workspace.discover();
    let id = &resolve_skill(&args.skill, &bundles, &workspace.known_ids())?;

    let report = workspace.activation(&bundles).freeze(id)?;
    println!("{} Froze {}", Style::new().cyan().apply_to("❄"), id);
    if let Some(report) = report {
        print_apply(&report);
    }
    Ok(())
}

/// Run unfreeze command
pub fn run_unfreeze(ctx: &Context, args: &SkillArgs) -> Result<()> {
    let mut workspace = ctx.open()?;
    let bundles = workspace.discover();
    let id = &resolve_skill(&args.skill, &bundles, &workspace.known_ids())?;

    if workspace.activation(&bundles).unfreeze(id)? {
        println!("{} Unfroze {}", Style::new().green().apply_to("✓"), id);
    } else {
        println!("{id} is not frozen.");
    }
    Ok(())
}

/// Run apply command
pub fn run_apply(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let mut workspace = ctx.open()?;
    if args.sync {
        super::sync::sync_every(&mut workspace)?;
    }

    let bundles = workspace.discover();
    let report = workspace.activation(&bundles).apply()?;
    print_apply(&report);
    Ok(())
}
