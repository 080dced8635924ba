use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Settings of a single repository as exposed by the console's GraphQL schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySettings {
    pub needs_approval: bool,
    pub decrypt_environment_variables: DecryptEnvironmentVariables,
    pub config_resolution_strategy: ConfigResolutionStrategy,

    /// `KEY=VALUE` lines, in display order. Duplicates are allowed.
    #[serde(default)]
    pub additional_environment: Vec<String>,

    /// Opaque invalidation token. Bumping it drops cached build artifacts.
    pub cache_version: i64,

    #[serde(default)]
    pub oidc_sub_include_claim_keys: Vec<String>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            needs_approval: false,
            decrypt_environment_variables: DecryptEnvironmentVariables::UsersWithWritePermissions,
            config_resolution_strategy: ConfigResolutionStrategy::SameSha,
            additional_environment: Vec::new(),
            cache_version: 0,
            oidc_sub_include_claim_keys: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecryptEnvironmentVariables {
    UsersWithWritePermissions,
    Collaborators,
    Everyone,
}

impl DecryptEnvironmentVariables {
    pub const ALL: [Self; 3] = [
        Self::UsersWithWritePermissions,
        Self::Collaborators,
        Self::Everyone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UsersWithWritePermissions => "USERS_WITH_WRITE_PERMISSIONS",
            Self::Collaborators => "COLLABORATORS",
            Self::Everyone => "EVERYONE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UsersWithWritePermissions => "only users with write permissions",
            Self::Collaborators => "collaborators",
            Self::Everyone => "everyone",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigResolutionStrategy {
    SameSha,
    MergeForPrs,
    DefaultBranch,
}

impl ConfigResolutionStrategy {
    pub const ALL: [Self; 3] = [Self::SameSha, Self::MergeForPrs, Self::DefaultBranch];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SameSha => "SAME_SHA",
            Self::MergeForPrs => "MERGE_FOR_PRS",
            Self::DefaultBranch => "DEFAULT_BRANCH",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SameSha => "same commit",
            Self::MergeForPrs => "merge for pull requests",
            Self::DefaultBranch => "latest on default branch",
        }
    }
}

/// Normalizes `merge-for-prs`, `Merge_For_PRs`, etc. to `MERGE_FOR_PRS`.
fn normalize_enum_token(s: &str) -> String {
    s.trim().replace('-', "_").to_ascii_uppercase()
}

impl FromStr for DecryptEnvironmentVariables {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_enum_token(s);
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == token)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown decrypt scope '{}' (expected users-with-write-permissions, collaborators or everyone)",
                    s
                )
            })
    }
}

impl FromStr for ConfigResolutionStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_enum_token(s);
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == token)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown config resolution strategy '{}' (expected same-sha, merge-for-prs or default-branch)",
                    s
                )
            })
    }
}

impl fmt::Display for DecryptEnvironmentVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ConfigResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One modeled field of [`RepositorySettings`]; used to report diffs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingsField {
    NeedsApproval,
    DecryptEnvironmentVariables,
    ConfigResolutionStrategy,
    AdditionalEnvironment,
    CacheVersion,
    OidcSubIncludeClaimKeys,
}

impl SettingsField {
    pub fn name(self) -> &'static str {
        match self {
            Self::NeedsApproval => "needsApproval",
            Self::DecryptEnvironmentVariables => "decryptEnvironmentVariables",
            Self::ConfigResolutionStrategy => "configResolutionStrategy",
            Self::AdditionalEnvironment => "additionalEnvironment",
            Self::CacheVersion => "cacheVersion",
            Self::OidcSubIncludeClaimKeys => "oidcSubIncludeClaimKeys",
        }
    }
}

#[cfg(test)]
#[path = "../tests/model/settings_tests.rs"]
mod tests;
