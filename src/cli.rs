use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hatenasync",
    version,
    about = "Sync local Markdown articles to a Hatena Blog over AtomPub"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile a directory of articles against the remote blog
    Sync {
        #[arg(default_value = ".", help = "Directory containing article files")]
        dir: PathBuf,
        #[arg(
            long,
            default_value_t = false,
            help = "Show what would be done without making any changes"
        )]
        dry_run: bool,
        #[arg(
            long,
            default_value_t = false,
            help = "Delete remote entries that no longer exist locally (DANGEROUS)"
        )]
        delete_orphan: bool,
        #[arg(
            long,
            default_value_t = false,
            help = "Skip the interactive confirmation before a destructive run"
        )]
        yes: bool,
    },
    /// Report remote entries that share an exact title
    Audit,
    /// List remote entries
    Entries,
}
