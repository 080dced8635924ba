use std::path::PathBuf;

use clap::Subcommand;

use crate::{ConsoleCommands, SettingsCommands};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Initialize local state (.repoconf)
    Init {
        /// Re-initialize if .repoconf already exists
        #[arg(long)]
        force: bool,
        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Configure or show the console endpoint
    Console {
        #[command(subcommand)]
        command: ConsoleCommands,
    },

    /// Fetch, edit and save repository settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}
