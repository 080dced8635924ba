//! GraphQL documents sent by the settings form.

pub const SETTINGS_FRAGMENT: &str = r#"fragment RepositorySettings_settings on RepositorySettings {
  needsApproval
  decryptEnvironmentVariables
  configResolutionStrategy
  additionalEnvironment
  cacheVersion
  oidcSubIncludeClaimKeys
}"#;

pub const SETTINGS_QUERY_NAME: &str = "RepositorySettingsQuery";

pub const SETTINGS_MUTATION_NAME: &str = "RepositorySettingsMutation";

const SETTINGS_QUERY_BODY: &str = r#"query RepositorySettingsQuery($repositoryId: ID!) {
  repository(id: $repositoryId) {
    id
    settings {
      ...RepositorySettings_settings
    }
  }
}"#;

const SETTINGS_MUTATION_BODY: &str = r#"mutation RepositorySettingsMutation($input: RepositorySettingsInput!) {
  saveSettings(input: $input) {
    clientMutationId
    settings {
      ...RepositorySettings_settings
    }
  }
}"#;

pub fn settings_query() -> String {
    format!("{}\n\n{}", SETTINGS_QUERY_BODY, SETTINGS_FRAGMENT)
}

pub fn settings_mutation() -> String {
    format!("{}\n\n{}", SETTINGS_MUTATION_BODY, SETTINGS_FRAGMENT)
}
