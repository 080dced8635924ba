//! GraphQL-over-HTTP client for the console API.

use anyhow::{Context, Result};

use crate::model::{ConsoleEndpoint, RepositorySettings};
use crate::port::SettingsPort;

mod documents;
mod http_client;
use self::http_client::with_retries;

mod types;
pub use self::types::*;
mod settings_ops;

pub use self::documents::{SETTINGS_MUTATION_NAME, SETTINGS_QUERY_NAME};

pub struct GraphqlClient {
    endpoint: ConsoleEndpoint,
    token: String,
    client: reqwest::blocking::Client,
}

impl GraphqlClient {
    pub fn new(endpoint: ConsoleEndpoint, token: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("repoconf")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            endpoint,
            token,
            client,
        })
    }

    pub fn endpoint(&self) -> &ConsoleEndpoint {
        &self.endpoint
    }
}
