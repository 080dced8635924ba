mod config;
mod settings;

pub use self::config::{ConsoleConfig, ConsoleEndpoint, ConsoleState, FormRecord};
pub use self::settings::{
    ConfigResolutionStrategy, DecryptEnvironmentVariables, RepositorySettings, SettingsField,
};
