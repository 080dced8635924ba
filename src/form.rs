//! Saved/draft state of the repository settings form.

use anyhow::Result;

use crate::graphql::GraphqlError;
use crate::model::{FormRecord, RepositorySettings, SettingsField};
use crate::port::SettingsPort;

mod dirty;
mod edits;

pub use self::dirty::{changed_fields, is_dirty};
pub use self::edits::{
    SettingsEdit, claim_keys_text, split_claim_keys, with_claim_keys_text,
    with_clear_caches, with_config_resolution_strategy, with_decrypt_environment_variables,
    with_environment_line, with_needs_approval, without_environment_line,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsForm {
    repository_id: String,
    saved: RepositorySettings,
    draft: RepositorySettings,
    pending_env_line: String,
}

/// Payload captured when a save starts. Owns its data, so later edits to the form do not
/// reach the in-flight request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveRequest {
    pub repository_id: String,
    pub settings: RepositorySettings,
}

impl SettingsForm {
    pub fn new(repository_id: impl Into<String>, settings: RepositorySettings) -> Self {
        Self {
            repository_id: repository_id.into(),
            draft: settings.clone(),
            saved: settings,
            pending_env_line: String::new(),
        }
    }

    pub fn load(port: &dyn SettingsPort, repository_id: &str) -> Result<Self> {
        let settings = port.fetch_settings(repository_id)?;
        Ok(Self::new(repository_id, settings))
    }

    pub fn from_record(record: FormRecord) -> Self {
        Self {
            repository_id: record.repository_id,
            saved: record.saved,
            draft: record.draft,
            pending_env_line: record.pending_env_line,
        }
    }

    pub fn to_record(&self, fetched_at: &str) -> FormRecord {
        FormRecord {
            repository_id: self.repository_id.clone(),
            saved: self.saved.clone(),
            draft: self.draft.clone(),
            pending_env_line: self.pending_env_line.clone(),
            fetched_at: fetched_at.to_string(),
        }
    }

    pub fn repository_id(&self) -> &str {
        &self.repository_id
    }

    pub fn saved(&self) -> &RepositorySettings {
        &self.saved
    }

    pub fn draft(&self) -> &RepositorySettings {
        &self.draft
    }

    pub fn pending_env_line(&self) -> &str {
        &self.pending_env_line
    }

    pub fn set_draft(&mut self, next: RepositorySettings) {
        self.draft = next;
    }

    /// Only called with a value confirmed by the remote side.
    pub fn commit_saved(&mut self, next: RepositorySettings) {
        self.saved = next;
    }

    pub fn reset_draft(&mut self) {
        self.draft = self.saved.clone();
        self.pending_env_line.clear();
    }

    /// The settings were read again; local edits are dropped.
    pub fn refresh(&mut self, settings: RepositorySettings) {
        self.commit_saved(settings.clone());
        self.set_draft(settings);
        self.pending_env_line.clear();
    }

    pub fn apply(&mut self, edit: SettingsEdit) {
        let next = match edit {
            SettingsEdit::SetNeedsApproval(v) => with_needs_approval(&self.draft, v),
            SettingsEdit::ToggleNeedsApproval => {
                with_needs_approval(&self.draft, !self.draft.needs_approval)
            }
            SettingsEdit::SetDecryptEnvironmentVariables(v) => {
                with_decrypt_environment_variables(&self.draft, v)
            }
            SettingsEdit::SetConfigResolutionStrategy(v) => {
                with_config_resolution_strategy(&self.draft, v)
            }
            SettingsEdit::SetOidcClaimKeysText(text) => with_claim_keys_text(&self.draft, &text),
            SettingsEdit::SetPendingEnvironmentLine(line) => {
                self.pending_env_line = line;
                return;
            }
            SettingsEdit::CommitPendingEnvironmentLine => {
                let line = std::mem::take(&mut self.pending_env_line);
                with_environment_line(&self.draft, &line)
            }
            SettingsEdit::AddEnvironmentLine(line) => with_environment_line(&self.draft, &line),
            SettingsEdit::RemoveEnvironmentLine(line) => {
                without_environment_line(&self.draft, &line)
            }
            SettingsEdit::SetClearCaches(clear) => {
                with_clear_caches(&self.saved, &self.draft, clear)
            }
        };
        self.set_draft(next);
    }

    pub fn is_dirty(&self) -> bool {
        is_dirty(&self.saved, &self.draft)
    }

    pub fn can_save(&self) -> bool {
        self.is_dirty()
    }

    pub fn changed_fields(&self) -> Vec<SettingsField> {
        changed_fields(&self.saved, &self.draft)
    }

    /// Checkbox state of "clear caches"; derived, never stored.
    pub fn clear_caches_checked(&self) -> bool {
        self.draft.cache_version != self.saved.cache_version
    }

    pub fn claim_keys_text(&self) -> String {
        claim_keys_text(&self.draft.oidc_sub_include_claim_keys)
    }

    pub fn begin_save(&self) -> SaveRequest {
        SaveRequest {
            repository_id: self.repository_id.clone(),
            settings: self.draft.clone(),
        }
    }

    /// Applies the outcome of a save started with [`SettingsForm::begin_save`].
    ///
    /// On success the server's value becomes both `saved` and `draft`. On failure the form is
    /// left untouched and the error is returned after being logged.
    pub fn complete_save(
        &mut self,
        request: &SaveRequest,
        outcome: Result<RepositorySettings>,
    ) -> Result<RepositorySettings> {
        match outcome {
            Ok(settings) => {
                if self.draft != request.settings {
                    tracing::warn!(
                        repository_id = %self.repository_id,
                        "settings edited while a save was in flight; edits replaced by the saved value"
                    );
                }
                self.commit_saved(settings.clone());
                self.set_draft(settings.clone());
                tracing::info!(
                    repository_id = %self.repository_id,
                    cache_version = settings.cache_version,
                    "repository settings saved"
                );
                Ok(settings)
            }
            Err(err) => {
                if let Some(gql) = err.downcast_ref::<GraphqlError>() {
                    tracing::error!(
                        repository_id = %self.repository_id,
                        error = %gql,
                        "settings mutation returned errors"
                    );
                } else {
                    tracing::error!(
                        repository_id = %self.repository_id,
                        error = %format!("{:#}", err),
                        "settings save failed"
                    );
                }
                Err(err)
            }
        }
    }

    pub fn save(&mut self, port: &dyn SettingsPort) -> Result<RepositorySettings> {
        let request = self.begin_save();
        let outcome = port.save_settings(&request.repository_id, &request.settings);
        self.complete_save(&request, outcome)
    }
}

#[cfg(test)]
#[path = "tests/form/form_tests.rs"]
mod tests;
