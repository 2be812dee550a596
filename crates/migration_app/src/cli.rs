use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ghost-migrate", version, about = "Migrate a Ghost blog to WordPress")]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(global = true, short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Show debug output on the console (the log file is always detailed)
    #[arg(global = true, short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Copy every post in the feed to the target site
    Migrate {
        /// Import everything as drafts so nothing goes live
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Verify the feed, the REST API and the credentials
    Check,
    /// Write an example configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}
