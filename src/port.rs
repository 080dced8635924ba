//! Boundary between the settings form and the system that stores repository settings.

use anyhow::Result;

use crate::model::RepositorySettings;

pub trait SettingsPort {
    fn fetch_settings(&self, repository_id: &str) -> Result<RepositorySettings>;

    /// Persists `settings` and returns the value as confirmed (possibly normalized) by the
    /// remote side.
    fn save_settings(
        &self,
        repository_id: &str,
        settings: &RepositorySettings,
    ) -> Result<RepositorySettings>;
}
