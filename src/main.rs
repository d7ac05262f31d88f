//! skillsync CLI

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use skillsync::Result;
use skillsync::cli::{Cli, Commands};
use skillsync::commands::{self, Context};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let ctx = Context {
        workspace: cli.workspace.clone(),
        interactive: !cli.no_input && console::user_attended_stderr(),
    };

    match run(&ctx, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Add(args) => commands::sources::run_add(ctx, args),
        Commands::Remove(args) => commands::sources::run_remove(ctx, &args),
        Commands::Sources(args) => commands::sources::run_sources(ctx, &args),
        Commands::Sync(args) => commands::sync::run(ctx, &args),
        Commands::List(args) => commands::skills::run_list(ctx, &args),
        Commands::Enable(args) => commands::skills::run_enable(ctx, &args),
        Commands::Disable(args) => commands::skills::run_disable(ctx, &args),
        Commands::Freeze(args) => commands::skills::run_freeze(ctx, &args),
        Commands::Unfreeze(args) => commands::skills::run_unfreeze(ctx, &args),
        Commands::Defaults(args) => commands::defaults::run(ctx, &args),
        Commands::Apply(args) => commands::skills::run_apply(ctx, &args),
        Commands::Folders(args) => commands::folders::run_folders(ctx, &args),
        Commands::Protect(args) => commands::folders::run_protect(ctx, &args),
        Commands::Release(args) => commands::folders::run_release(ctx, &args),
        Commands::Uninstall(args) => commands::folders::run_uninstall(ctx, &args),
        Commands::Update(args) => commands::folders::run_update(ctx, &args),
        Commands::Reconcile => commands::folders::run_reconcile(ctx),
        Commands::Completions(args) => commands::completions::run(&args),
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,skillsync=info",
        1 => "info,skillsync=debug",
        _ => "debug,skillsync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}
