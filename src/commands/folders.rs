//! Destination folder commands: folders, protect, release, uninstall, update, reconcile

use console::Style;

use super::{Context, print_json};
use crate::cli::{FolderArgs, FoldersArgs, UninstallArgs};
use crate::error::Result;

/// Run folders command
pub fn run_folders(ctx: &Context, args: &FoldersArgs) -> Result<()> {
    let workspace = ctx.open()?;
    let listing = workspace.materializer.list_folders()?;

    if args.json {
        return print_json(&listing);
    }

    println!(
        "{} {}",
        Style::new().bold().apply_to("Destination:"),
        workspace.materializer.destination().display()
    );
    if listing.managed.is_empty() && listing.manual.is_empty() && listing.untracked.is_empty() {
        println!("No skill folders.");
        return Ok(());
    }

    let groups = [
        ("Managed", &listing.managed, Style::new().green()),
        ("Protected", &listing.manual, Style::new().cyan()),
        ("Untracked", &listing.untracked, Style::new().yellow()),
    ];
    for (title, names, style) in groups {
        if names.is_empty() {
            continue;
        }
        println!();
        println!("  {} ({}):", Style::new().bold().apply_to(title), names.len());
        for name in names {
            println!("    {}", style.apply_to(name));
        }
    }
    Ok(())
}

/// Run protect command
pub fn run_protect(ctx: &Context, args: &FolderArgs) -> Result<()> {
    let workspace = ctx.open()?;
    workspace.materializer.mark_as_manual(&args.name)?;
    println!("{} Protected {}", Style::new().cyan().apply_to("✓"), args.name);
    Ok(())
}

/// Run release command
pub fn run_release(ctx: &Context, args: &FolderArgs) -> Result<()> {
    let workspace = ctx.open()?;
    workspace.materializer.mark_as_managed(&args.name)?;
    println!("{} Released {}", Style::new().green().apply_to("✓"), args.name);
    Ok(())
}

/// Run uninstall command
pub fn run_uninstall(ctx: &Context, args: &UninstallArgs) -> Result<()> {
    let mut workspace = ctx.open()?;
    let disabled = workspace.uninstall(&args.name, args.force)?;

    println!("{} Uninstalled {}", Style::new().green().apply_to("✓"), args.name);
    for id in disabled {
        println!("  Disabled {id}");
    }
    Ok(())
}

/// Run update command
pub fn run_update(ctx: &Context, args: &FolderArgs) -> Result<()> {
    let workspace = ctx.open()?;
    let bundles = workspace.discover();
    workspace.materializer.update_one(&args.name, &bundles)?;
    println!("{} Updated {}", Style::new().green().apply_to("✓"), args.name);
    Ok(())
}

/// Run reconcile command
pub fn run_reconcile(ctx: &Context) -> Result<()> {
    let workspace = ctx.open()?;
    let result = workspace.materializer.reconcile_untracked()?;

    if result.adopted.is_empty() && result.pruned.is_empty() {
        println!("Manifest is up to date.");
        return Ok(());
    }
    for name in &result.adopted {
        println!("{} Adopted {name} as protected", Style::new().cyan().apply_to("+"));
    }
    for name in &result.pruned {
        println!("{} Pruned {name}", Style::new().yellow().apply_to("-"));
    }
    Ok(())
}
