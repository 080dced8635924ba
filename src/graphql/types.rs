//! Request/response payloads of the console's GraphQL API.

use crate::model::{
    ConfigResolutionStrategy, DecryptEnvironmentVariables, RepositorySettings,
};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<V> {
    pub operation_name: String,
    pub query: String,
    pub variables: V,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlErrorEntry>,
}

impl<T> GraphqlResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn errors(errors: Vec<GraphqlErrorEntry>) -> Self {
        Self { data: None, errors }
    }

    /// Any entry in `errors` fails the operation, even if `data` is present.
    pub fn into_result(self, operation: &str) -> Result<T, GraphqlError> {
        if !self.errors.is_empty() {
            return Err(GraphqlError::Response {
                operation: operation.to_string(),
                errors: self.errors,
            });
        }
        self.data.ok_or_else(|| GraphqlError::MissingData {
            operation: operation.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphqlErrorEntry {
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
}

impl GraphqlErrorEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphqlError {
    #[error("{operation} returned errors: {}", join_messages(.errors))]
    Response {
        operation: String,
        errors: Vec<GraphqlErrorEntry>,
    },

    #[error("{operation} returned no data")]
    MissingData { operation: String },

    #[error("repository {repository_id} not found")]
    RepositoryNotFound { repository_id: String },

    #[error("clientMutationId mismatch (sent {sent}, got {received})")]
    MutationIdMismatch { sent: String, received: String },
}

fn join_messages(errors: &[GraphqlErrorEntry]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsQueryVariables {
    pub repository_id: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SettingsQueryData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RepositoryNode {
    pub id: String,
    pub settings: RepositorySettings,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SettingsMutationVariables {
    pub input: SaveSettingsInput,
}

/// Input of the `saveSettings` mutation: every field is sent, not only changed ones.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsInput {
    pub client_mutation_id: String,
    pub repository_id: String,
    pub needs_approval: bool,
    pub decrypt_environment_variables: DecryptEnvironmentVariables,
    pub config_resolution_strategy: ConfigResolutionStrategy,
    pub additional_environment: Vec<String>,
    pub cache_version: i64,
    pub oidc_sub_include_claim_keys: Vec<String>,
}

impl SaveSettingsInput {
    pub fn new(
        client_mutation_id: String,
        repository_id: &str,
        settings: &RepositorySettings,
    ) -> Self {
        Self {
            client_mutation_id,
            repository_id: repository_id.to_string(),
            needs_approval: settings.needs_approval,
            decrypt_environment_variables: settings.decrypt_environment_variables,
            config_resolution_strategy: settings.config_resolution_strategy,
            additional_environment: settings.additional_environment.clone(),
            cache_version: settings.cache_version,
            oidc_sub_include_claim_keys: settings.oidc_sub_include_claim_keys.clone(),
        }
    }

    pub fn settings(&self) -> RepositorySettings {
        RepositorySettings {
            needs_approval: self.needs_approval,
            decrypt_environment_variables: self.decrypt_environment_variables,
            config_resolution_strategy: self.config_resolution_strategy,
            additional_environment: self.additional_environment.clone(),
            cache_version: self.cache_version,
            oidc_sub_include_claim_keys: self.oidc_sub_include_claim_keys.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsMutationData {
    pub save_settings: SaveSettingsPayload,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsPayload {
    #[serde(default)]
    pub client_mutation_id: Option<String>,
    pub settings: RepositorySettings,
}
