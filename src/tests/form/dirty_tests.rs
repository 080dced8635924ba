use super::*;
use crate::model::{ConfigResolutionStrategy, DecryptEnvironmentVariables};

fn sample() -> RepositorySettings {
    RepositorySettings {
        needs_approval: true,
        decrypt_environment_variables: DecryptEnvironmentVariables::Collaborators,
        config_resolution_strategy: ConfigResolutionStrategy::MergeForPrs,
        additional_environment: vec!["A=1".to_string(), "B=2".to_string()],
        cache_version: 9,
        oidc_sub_include_claim_keys: vec!["repo".to_string(), "ref".to_string()],
    }
}

#[test]
fn identical_settings_are_clean() {
    let s = sample();
    assert!(!is_dirty(&s, &s));
    assert!(changed_fields(&s, &s).is_empty());

    let d = RepositorySettings::default();
    assert!(!is_dirty(&d, &d.clone()));
}

#[test]
fn every_field_participates() {
    let saved = sample();
    let variants: Vec<(SettingsField, RepositorySettings)> = vec![
        (
            SettingsField::NeedsApproval,
            RepositorySettings {
                needs_approval: false,
                ..saved.clone()
            },
        ),
        (
            SettingsField::DecryptEnvironmentVariables,
            RepositorySettings {
                decrypt_environment_variables: DecryptEnvironmentVariables::Everyone,
                ..saved.clone()
            },
        ),
        (
            SettingsField::ConfigResolutionStrategy,
            RepositorySettings {
                config_resolution_strategy: ConfigResolutionStrategy::SameSha,
                ..saved.clone()
            },
        ),
        (
            SettingsField::AdditionalEnvironment,
            RepositorySettings {
                additional_environment: vec!["A=1".to_string()],
                ..saved.clone()
            },
        ),
        (
            SettingsField::CacheVersion,
            RepositorySettings {
                cache_version: 10,
                ..saved.clone()
            },
        ),
        (
            SettingsField::OidcSubIncludeClaimKeys,
            RepositorySettings {
                oidc_sub_include_claim_keys: vec![],
                ..saved.clone()
            },
        ),
    ];

    for (field, draft) in variants {
        assert!(is_dirty(&saved, &draft), "{} should be dirty", field.name());
        assert_eq!(changed_fields(&saved, &draft), vec![field]);
    }
}

#[test]
fn sequence_order_matters() {
    let saved = sample();
    let mut draft = saved.clone();
    draft.additional_environment.reverse();
    assert!(is_dirty(&saved, &draft));

    let mut draft = saved.clone();
    draft.oidc_sub_include_claim_keys.reverse();
    assert!(is_dirty(&saved, &draft));
}
