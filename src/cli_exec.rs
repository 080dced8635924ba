use anyhow::{Context, Result};

use repoconf::store::LocalStore;

use crate::{Commands, ConsoleCommands, EditArgs, SettingsCommands};

mod console_ops;
mod settings_ops;

pub(super) fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Init { force, path } => {
            let root = path.unwrap_or(std::env::current_dir().context("get current dir")?);
            LocalStore::init(&root, force)?;
            println!("Initialized repoconf at {}", root.display());
        }
        Commands::Console { command } => {
            let store = discover_store()?;
            match command {
                ConsoleCommands::Show { json } => console_ops::show_console(&store, json)?,
                ConsoleCommands::Set { url, token, repo } => {
                    console_ops::set_console(&store, url, token, repo)?
                }
            }
        }
        Commands::Settings { command } => {
            let store = discover_store()?;
            match command {
                SettingsCommands::Fetch { json } => settings_ops::fetch(&store, json)?,
                SettingsCommands::Show { json } => settings_ops::show(&store, json)?,
                SettingsCommands::Edit(args) => settings_ops::edit(&store, args)?,
                SettingsCommands::Diff { json } => settings_ops::diff(&store, json)?,
                SettingsCommands::Save { json } => settings_ops::save(&store, json)?,
                SettingsCommands::Discard => settings_ops::discard(&store)?,
            }
        }
    }
    Ok(())
}

fn discover_store() -> Result<LocalStore> {
    LocalStore::discover(&std::env::current_dir().context("get current dir")?)
}
