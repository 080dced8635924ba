use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::RepositorySettings;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub version: u32,

    #[serde(default)]
    pub console: Option<ConsoleEndpoint>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEndpoint {
    /// Full URL of the GraphQL endpoint, e.g. `https://console.example.com/graphql`.
    pub graphql_url: String,
    pub repository_id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConsoleState {
    pub version: u32,

    // Keyed by `graphql_url#repository_id`.
    #[serde(default)]
    pub tokens: HashMap<String, String>,

    #[serde(default)]
    pub forms: HashMap<String, FormRecord>,
}

/// A settings form persisted between CLI invocations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub repository_id: String,
    pub saved: RepositorySettings,
    pub draft: RepositorySettings,

    #[serde(default)]
    pub pending_env_line: String,

    pub fetched_at: String,
}
