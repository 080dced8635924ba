use clap::{Args, Subcommand};

use repoconf::model::{ConfigResolutionStrategy, DecryptEnvironmentVariables};

#[derive(Subcommand)]
pub(crate) enum ConsoleCommands {
    /// Show the configured console endpoint
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Point this directory at a console repository
    Set {
        /// GraphQL endpoint URL
        #[arg(long)]
        url: String,
        #[arg(long)]
        token: String,
        /// Repository id
        #[arg(long)]
        repo: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum SettingsCommands {
    /// Fetch settings from the console, replacing any local draft
    Fetch {
        #[arg(long)]
        json: bool,
    },
    /// Show the draft settings
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Edit the local draft
    Edit(EditArgs),
    /// List fields that differ between saved and draft
    Diff {
        #[arg(long)]
        json: bool,
    },
    /// Save the draft to the console
    Save {
        #[arg(long)]
        json: bool,
    },
    /// Drop local edits
    Discard,
}

/// Edits are applied in a fixed order: scalar fields, claim keys, env removals, env
/// additions, cache toggle.
#[derive(Args, Debug, Default)]
pub(crate) struct EditArgs {
    /// Require approval for builds from untrusted contributors
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub(crate) needs_approval: Option<bool>,

    /// Flip needs-approval
    #[arg(long, conflicts_with = "needs_approval")]
    pub(crate) toggle_needs_approval: bool,

    /// Who may decrypt encrypted variables (users-with-write-permissions, collaborators, everyone)
    #[arg(long, value_name = "SCOPE")]
    pub(crate) decrypt_env: Option<DecryptEnvironmentVariables>,

    /// Where the build config is read from (same-sha, merge-for-prs, default-branch)
    #[arg(long, value_name = "STRATEGY")]
    pub(crate) config_resolution: Option<ConfigResolutionStrategy>,

    /// Comma-separated OIDC sub claim keys (raw text, not trimmed)
    #[arg(long, value_name = "KEYS", allow_hyphen_values = true)]
    pub(crate) oidc_claims: Option<String>,

    /// Remove every occurrence of an environment line
    #[arg(long = "remove-env", value_name = "KEY=VALUE")]
    pub(crate) remove_env: Vec<String>,

    /// Append an environment line
    #[arg(long = "add-env", value_name = "KEY=VALUE")]
    pub(crate) add_env: Vec<String>,

    /// Check or uncheck "clear caches" (bumps the cache version on save)
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub(crate) clear_caches: Option<bool>,
}
