use anyhow::Context;
use clap::Parser;
use std::io::Write;

mod atom;
mod cli;
mod commands;
mod config;
mod domain;
mod services;

use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = config::Config::from_env().context("configuration error")?;
    let client = atom::Client::new(config)?;

    match &cli.command {
        Commands::Sync {
            dir,
            dry_run,
            delete_orphan,
            yes,
        } => {
            let articles =
                services::storage::load_articles(dir).context("failed to load articles")?;
            // Nothing to sync means nothing to delete; don't prompt for a no-op.
            if *delete_orphan
                && !*dry_run
                && !*yes
                && !articles.is_empty()
                && !confirm_orphan_delete()?
            {
                println!("Operation cancelled.");
                return Ok(0);
            }
            let report =
                commands::handle_sync(cli.json, articles, *dry_run, *delete_orphan, &client)?;
            if !cli.json {
                println!("{}", report.summary_line());
                for err in &report.errors {
                    eprintln!("Error: {err}");
                }
            }
            Ok(if report.errors.is_empty() { 0 } else { 1 })
        }
        Commands::Audit => {
            commands::handle_audit(cli.json, &client)?;
            Ok(0)
        }
        Commands::Entries => {
            commands::handle_entries(cli.json, &client)?;
            Ok(0)
        }
    }
}

/// Orphan deletion is irreversible on the remote side; a live run must be
/// confirmed interactively unless --yes was given.
fn confirm_orphan_delete() -> anyhow::Result<bool> {
    println!("WARNING: --delete-orphan is enabled. This will permanently delete remote entries that don't exist locally.");
    print!("Are you sure you want to continue? (y/N): ");
    std::io::stdout().flush()?;
    let mut response = String::new();
    std::io::stdin().read_line(&mut response)?;
    Ok(matches!(response.trim(), "y" | "Y" | "yes" | "Yes"))
}
