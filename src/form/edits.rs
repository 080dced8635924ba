//! Field editors. Each one copies the draft and overwrites exactly one field.

use crate::model::{ConfigResolutionStrategy, DecryptEnvironmentVariables, RepositorySettings};

/// The closed set of edits the settings form accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsEdit {
    SetNeedsApproval(bool),
    ToggleNeedsApproval,
    SetDecryptEnvironmentVariables(DecryptEnvironmentVariables),
    SetConfigResolutionStrategy(ConfigResolutionStrategy),
    /// Raw comma-delimited text of the claim keys input.
    SetOidcClaimKeysText(String),
    /// Replaces the pending environment line buffer; the draft is untouched.
    SetPendingEnvironmentLine(String),
    /// Appends the pending buffer to the draft and clears it.
    CommitPendingEnvironmentLine,
    AddEnvironmentLine(String),
    /// Removes every line equal to the given one.
    RemoveEnvironmentLine(String),
    SetClearCaches(bool),
}

pub fn with_needs_approval(draft: &RepositorySettings, value: bool) -> RepositorySettings {
    RepositorySettings {
        needs_approval: value,
        ..draft.clone()
    }
}

pub fn with_decrypt_environment_variables(
    draft: &RepositorySettings,
    value: DecryptEnvironmentVariables,
) -> RepositorySettings {
    RepositorySettings {
        decrypt_environment_variables: value,
        ..draft.clone()
    }
}

pub fn with_config_resolution_strategy(
    draft: &RepositorySettings,
    value: ConfigResolutionStrategy,
) -> RepositorySettings {
    RepositorySettings {
        config_resolution_strategy: value,
        ..draft.clone()
    }
}

/// Splits the claim keys input on `,` without trimming or dropping empty segments.
///
/// `""` yields `[""]` and `"a,"` yields `["a", ""]`.
pub fn split_claim_keys(text: &str) -> Vec<String> {
    text.split(',').map(str::to_string).collect()
}

/// Text shown in the claim keys input for a given sequence.
pub fn claim_keys_text(keys: &[String]) -> String {
    keys.join(",")
}

pub fn with_claim_keys_text(draft: &RepositorySettings, text: &str) -> RepositorySettings {
    RepositorySettings {
        oidc_sub_include_claim_keys: split_claim_keys(text),
        ..draft.clone()
    }
}

pub fn with_environment_line(draft: &RepositorySettings, line: &str) -> RepositorySettings {
    let mut additional_environment = draft.additional_environment.clone();
    additional_environment.push(line.to_string());
    RepositorySettings {
        additional_environment,
        ..draft.clone()
    }
}

pub fn without_environment_line(draft: &RepositorySettings, line: &str) -> RepositorySettings {
    RepositorySettings {
        additional_environment: draft
            .additional_environment
            .iter()
            .filter(|l| l.as_str() != line)
            .cloned()
            .collect(),
        ..draft.clone()
    }
}

/// The cache version is derived from `saved`, never from the previous draft value.
pub fn with_clear_caches(
    saved: &RepositorySettings,
    draft: &RepositorySettings,
    clear: bool,
) -> RepositorySettings {
    let cache_version = if clear {
        saved.cache_version.saturating_add(1)
    } else {
        saved.cache_version
    };
    RepositorySettings {
        cache_version,
        ..draft.clone()
    }
}

#[cfg(test)]
#[path = "../tests/form/edits_tests.rs"]
mod tests;
