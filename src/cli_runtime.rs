use anyhow::Result;
use clap::Parser;

use crate::Commands;

#[derive(Parser)]
#[command(name = "repoconf")]
#[command(about = "Edit CI repository settings", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => repoconf::tui::run()?,
        Some(command) => {
            repoconf::logging::init_stderr();
            crate::cli_exec::handle_command(command)?
        }
    }

    Ok(())
}
