use super::*;
use repoconf::model::{ConfigResolutionStrategy, DecryptEnvironmentVariables};

#[test]
fn no_flags_means_no_edits() {
    assert!(edits_from_args(EditArgs::default()).is_empty());
}

#[test]
fn edits_follow_fixed_order() {
    let args = EditArgs {
        needs_approval: Some(true),
        toggle_needs_approval: false,
        decrypt_env: Some(DecryptEnvironmentVariables::Collaborators),
        config_resolution: Some(ConfigResolutionStrategy::MergeForPrs),
        oidc_claims: Some("repo,".to_string()),
        remove_env: vec!["OLD=1".to_string()],
        add_env: vec!["NEW=1".to_string(), "NEW=2".to_string()],
        clear_caches: Some(true),
    };
    assert_eq!(
        edits_from_args(args),
        vec![
            SettingsEdit::SetNeedsApproval(true),
            SettingsEdit::SetDecryptEnvironmentVariables(DecryptEnvironmentVariables::Collaborators),
            SettingsEdit::SetConfigResolutionStrategy(ConfigResolutionStrategy::MergeForPrs),
            SettingsEdit::SetOidcClaimKeysText("repo,".to_string()),
            SettingsEdit::RemoveEnvironmentLine("OLD=1".to_string()),
            SettingsEdit::AddEnvironmentLine("NEW=1".to_string()),
            SettingsEdit::AddEnvironmentLine("NEW=2".to_string()),
            SettingsEdit::SetClearCaches(true),
        ]
    );
}

#[test]
fn field_values_render_wire_spellings() {
    let settings = RepositorySettings {
        config_resolution_strategy: ConfigResolutionStrategy::DefaultBranch,
        ..RepositorySettings::default()
    };
    assert_eq!(
        field_value(&settings, SettingsField::ConfigResolutionStrategy).to_string(),
        "\"DEFAULT_BRANCH\""
    );
    assert_eq!(
        field_value(&settings, SettingsField::AdditionalEnvironment).to_string(),
        "[]"
    );
    assert_eq!(
        field_names(&[SettingsField::NeedsApproval, SettingsField::CacheVersion]),
        "needsApproval, cacheVersion"
    );
}
