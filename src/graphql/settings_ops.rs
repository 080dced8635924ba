//! Repository settings query and mutation.

use super::documents::{
    SETTINGS_MUTATION_NAME, SETTINGS_QUERY_NAME, settings_mutation, settings_query,
};
use super::*;

impl GraphqlClient {
    pub fn repository_settings(&self, repository_id: &str) -> Result<RepositorySettings> {
        let data: SettingsQueryData = with_retries("fetch repository settings", || {
            self.execute(
                SETTINGS_QUERY_NAME,
                settings_query(),
                SettingsQueryVariables {
                    repository_id: repository_id.to_string(),
                },
            )
        })?;

        let Some(repository) = data.repository else {
            return Err(GraphqlError::RepositoryNotFound {
                repository_id: repository_id.to_string(),
            }
            .into());
        };
        tracing::debug!(repository_id = %repository.id, "fetched repository settings");
        Ok(repository.settings)
    }

    /// Sends the full settings snapshot. Never retried: a lost response may still have been
    /// applied remotely.
    pub fn save_repository_settings(
        &self,
        repository_id: &str,
        settings: &RepositorySettings,
    ) -> Result<RepositorySettings> {
        let client_mutation_id = new_client_mutation_id()?;
        let input = SaveSettingsInput::new(client_mutation_id.clone(), repository_id, settings);

        let data: SettingsMutationData = self.execute(
            SETTINGS_MUTATION_NAME,
            settings_mutation(),
            SettingsMutationVariables { input },
        )?;

        let payload = data.save_settings;
        if let Some(received) = payload.client_mutation_id
            && received != client_mutation_id
        {
            return Err(GraphqlError::MutationIdMismatch {
                sent: client_mutation_id,
                received,
            }
            .into());
        }
        Ok(payload.settings)
    }
}

impl SettingsPort for GraphqlClient {
    fn fetch_settings(&self, repository_id: &str) -> Result<RepositorySettings> {
        self.repository_settings(repository_id)
    }

    fn save_settings(
        &self,
        repository_id: &str,
        settings: &RepositorySettings,
    ) -> Result<RepositorySettings> {
        self.save_repository_settings(repository_id, settings)
    }
}

pub(super) fn new_client_mutation_id() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(32);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/graphql/settings_ops_tests.rs"]
mod tests;
