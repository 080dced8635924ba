use std::cell::RefCell;

use super::*;
use crate::graphql::GraphqlErrorEntry;
use crate::model::{ConfigResolutionStrategy, DecryptEnvironmentVariables};

enum Reply {
    Echo,
    Normalized(RepositorySettings),
    Network,
    Rejected(&'static str),
}

struct FakePort {
    stored: RefCell<RepositorySettings>,
    reply: Reply,
    sent: RefCell<Vec<(String, RepositorySettings)>>,
}

impl FakePort {
    fn new(stored: RepositorySettings, reply: Reply) -> Self {
        Self {
            stored: RefCell::new(stored),
            reply,
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl SettingsPort for FakePort {
    fn fetch_settings(&self, _repository_id: &str) -> Result<RepositorySettings> {
        Ok(self.stored.borrow().clone())
    }

    fn save_settings(
        &self,
        repository_id: &str,
        settings: &RepositorySettings,
    ) -> Result<RepositorySettings> {
        self.sent
            .borrow_mut()
            .push((repository_id.to_string(), settings.clone()));
        match &self.reply {
            Reply::Echo => {
                *self.stored.borrow_mut() = settings.clone();
                Ok(settings.clone())
            }
            Reply::Normalized(v) => {
                *self.stored.borrow_mut() = v.clone();
                Ok(v.clone())
            }
            Reply::Network => {
                Err(anyhow::anyhow!("connection refused").context("settings mutation request"))
            }
            Reply::Rejected(msg) => Err(anyhow::Error::new(GraphqlError::Response {
                operation: "RepositorySettingsMutation".to_string(),
                errors: vec![GraphqlErrorEntry {
                    message: msg.to_string(),
                    path: Vec::new(),
                }],
            })),
        }
    }
}

fn scenario_saved() -> RepositorySettings {
    RepositorySettings {
        needs_approval: false,
        cache_version: 3,
        additional_environment: Vec::new(),
        oidc_sub_include_claim_keys: Vec::new(),
        ..RepositorySettings::default()
    }
}

#[test]
fn new_form_starts_clean() {
    let form = SettingsForm::new("repo-1", scenario_saved());
    assert_eq!(form.repository_id(), "repo-1");
    assert_eq!(form.saved(), form.draft());
    assert!(!form.is_dirty());
    assert!(!form.can_save());
    assert!(!form.clear_caches_checked());
    assert_eq!(form.pending_env_line(), "");
}

#[test]
fn toggle_then_successful_save_clears_dirty_state() -> Result<()> {
    let port = FakePort::new(scenario_saved(), Reply::Echo);
    let mut form = SettingsForm::load(&port, "repo-1")?;

    form.apply(SettingsEdit::ToggleNeedsApproval);
    assert!(form.draft().needs_approval);
    assert!(form.is_dirty());
    assert_eq!(form.changed_fields(), vec![SettingsField::NeedsApproval]);

    let saved = form.save(&port)?;
    assert!(saved.needs_approval);
    assert_eq!(form.saved(), form.draft());
    assert!(!form.is_dirty());

    let sent = port.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "repo-1");
    assert!(sent[0].1.needs_approval);
    Ok(())
}

#[test]
fn failed_save_keeps_both_snapshots() {
    let port = FakePort::new(scenario_saved(), Reply::Network);
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::SetNeedsApproval(true));
    form.apply(SettingsEdit::AddEnvironmentLine("A=1".to_string()));
    let before = form.clone();

    let err = form.save(&port).unwrap_err();
    assert!(format!("{:#}", err).contains("connection refused"));
    assert_eq!(form, before);
    assert!(form.can_save());
}

#[test]
fn graphql_errors_leave_form_untouched() {
    let port = FakePort::new(scenario_saved(), Reply::Rejected("invalid environment line"));
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::AddEnvironmentLine("NOEQUALS".to_string()));
    let before = form.clone();

    let err = form.save(&port).unwrap_err();
    let gql = err.downcast_ref::<GraphqlError>().expect("graphql error");
    assert!(gql.to_string().contains("invalid environment line"));
    assert_eq!(form, before);
}

#[test]
fn normalized_response_becomes_saved_and_draft() -> Result<()> {
    let normalized = RepositorySettings {
        oidc_sub_include_claim_keys: vec!["a".to_string()],
        ..scenario_saved()
    };
    let port = FakePort::new(scenario_saved(), Reply::Normalized(normalized.clone()));
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::SetOidcClaimKeysText("a,".to_string()));
    assert_eq!(form.draft().oidc_sub_include_claim_keys, vec!["a", ""]);

    form.save(&port)?;
    assert_eq!(form.saved(), &normalized);
    assert_eq!(form.draft(), &normalized);
    assert!(!form.is_dirty());
    Ok(())
}

#[test]
fn edit_then_revert_is_clean_again() {
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::SetConfigResolutionStrategy(
        ConfigResolutionStrategy::DefaultBranch,
    ));
    assert!(form.is_dirty());
    form.apply(SettingsEdit::SetConfigResolutionStrategy(
        ConfigResolutionStrategy::SameSha,
    ));
    assert!(!form.is_dirty());

    form.apply(SettingsEdit::SetDecryptEnvironmentVariables(
        DecryptEnvironmentVariables::Everyone,
    ));
    assert!(form.is_dirty());
    form.reset_draft();
    assert!(!form.is_dirty());
}

#[test]
fn clear_caches_check_and_uncheck_restores_saved_version() {
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::SetClearCaches(true));
    assert!(form.clear_caches_checked());
    assert_eq!(form.draft().cache_version, 4);
    assert!(form.is_dirty());

    form.apply(SettingsEdit::SetClearCaches(true));
    assert_eq!(form.draft().cache_version, 4);

    form.apply(SettingsEdit::SetClearCaches(false));
    assert!(!form.clear_caches_checked());
    assert_eq!(form.draft().cache_version, 3);
    assert!(!form.is_dirty());
}

#[test]
fn pending_line_commits_and_clears() {
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::SetPendingEnvironmentLine("TOKEN=abc".to_string()));
    assert!(!form.is_dirty());
    assert_eq!(form.pending_env_line(), "TOKEN=abc");

    form.apply(SettingsEdit::CommitPendingEnvironmentLine);
    assert_eq!(form.pending_env_line(), "");
    assert_eq!(form.draft().additional_environment, vec!["TOKEN=abc"]);

    form.apply(SettingsEdit::RemoveEnvironmentLine("TOKEN=abc".to_string()));
    assert!(form.draft().additional_environment.is_empty());
    assert!(!form.is_dirty());
}

#[test]
fn duplicate_lines_are_all_removed() {
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::AddEnvironmentLine("A=1".to_string()));
    form.apply(SettingsEdit::AddEnvironmentLine("A=1".to_string()));
    form.apply(SettingsEdit::AddEnvironmentLine("B=2".to_string()));
    form.apply(SettingsEdit::RemoveEnvironmentLine("A=1".to_string()));
    assert_eq!(form.draft().additional_environment, vec!["B=2"]);
}

#[test]
fn edits_after_begin_save_do_not_reach_the_request() -> Result<()> {
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::AddEnvironmentLine("A=1".to_string()));

    let request = form.begin_save();
    form.apply(SettingsEdit::AddEnvironmentLine("B=2".to_string()));
    assert_eq!(request.settings.additional_environment, vec!["A=1"]);

    // The server answer wins over edits made while the request was in flight.
    let echoed = request.settings.clone();
    form.complete_save(&request, Ok(echoed.clone()))?;
    assert_eq!(form.saved(), &echoed);
    assert_eq!(form.draft(), &echoed);
    Ok(())
}

#[test]
fn refresh_discards_local_edits() {
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::SetNeedsApproval(true));
    form.apply(SettingsEdit::SetPendingEnvironmentLine("X=1".to_string()));

    let remote = RepositorySettings {
        cache_version: 8,
        ..scenario_saved()
    };
    form.refresh(remote.clone());
    assert_eq!(form.saved(), &remote);
    assert_eq!(form.draft(), &remote);
    assert_eq!(form.pending_env_line(), "");
}

#[test]
fn record_round_trip_keeps_pending_line() {
    let mut form = SettingsForm::new("repo-1", scenario_saved());
    form.apply(SettingsEdit::SetNeedsApproval(true));
    form.apply(SettingsEdit::SetPendingEnvironmentLine("HALF".to_string()));

    let record = form.to_record("2026-01-01T00:00:00Z");
    assert_eq!(record.fetched_at, "2026-01-01T00:00:00Z");
    assert_eq!(SettingsForm::from_record(record), form);
}
