use crate::model::{RepositorySettings, SettingsField};

/// True unless every modeled field of `draft` equals the one in `saved`.
///
/// Sequences compare element-wise, so a reordering counts as a change.
pub fn is_dirty(saved: &RepositorySettings, draft: &RepositorySettings) -> bool {
    !(saved.needs_approval == draft.needs_approval
        && saved.config_resolution_strategy == draft.config_resolution_strategy
        && saved.additional_environment == draft.additional_environment
        && saved.oidc_sub_include_claim_keys == draft.oidc_sub_include_claim_keys
        && saved.decrypt_environment_variables == draft.decrypt_environment_variables
        && saved.cache_version == draft.cache_version)
}

pub fn changed_fields(saved: &RepositorySettings, draft: &RepositorySettings) -> Vec<SettingsField> {
    let mut out = Vec::new();
    if saved.needs_approval != draft.needs_approval {
        out.push(SettingsField::NeedsApproval);
    }
    if saved.decrypt_environment_variables != draft.decrypt_environment_variables {
        out.push(SettingsField::DecryptEnvironmentVariables);
    }
    if saved.config_resolution_strategy != draft.config_resolution_strategy {
        out.push(SettingsField::ConfigResolutionStrategy);
    }
    if saved.additional_environment != draft.additional_environment {
        out.push(SettingsField::AdditionalEnvironment);
    }
    if saved.cache_version != draft.cache_version {
        out.push(SettingsField::CacheVersion);
    }
    if saved.oidc_sub_include_claim_keys != draft.oidc_sub_include_claim_keys {
        out.push(SettingsField::OidcSubIncludeClaimKeys);
    }
    out
}

#[cfg(test)]
#[path = "../tests/form/dirty_tests.rs"]
mod tests;
