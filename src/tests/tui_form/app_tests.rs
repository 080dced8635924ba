use std::cell::RefCell;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::model::{RepositorySettings, SettingsField};

struct FakePort {
    remote: RefCell<RepositorySettings>,
    fail_save: bool,
    saves: RefCell<usize>,
}

impl FakePort {
    fn new(remote: RepositorySettings) -> Self {
        Self {
            remote: RefCell::new(remote),
            fail_save: false,
            saves: RefCell::new(0),
        }
    }

    fn failing(remote: RepositorySettings) -> Self {
        Self {
            fail_save: true,
            ..Self::new(remote)
        }
    }
}

impl SettingsPort for FakePort {
    fn fetch_settings(&self, _repository_id: &str) -> Result<RepositorySettings> {
        Ok(self.remote.borrow().clone())
    }

    fn save_settings(
        &self,
        _repository_id: &str,
        settings: &RepositorySettings,
    ) -> Result<RepositorySettings> {
        *self.saves.borrow_mut() += 1;
        if self.fail_save {
            anyhow::bail!("connection refused");
        }
        *self.remote.borrow_mut() = settings.clone();
        Ok(settings.clone())
    }
}

fn saved() -> RepositorySettings {
    RepositorySettings {
        cache_version: 3,
        additional_environment: vec!["A=1".to_string(), "B=2".to_string()],
        ..RepositorySettings::default()
    }
}

fn app() -> FormApp {
    FormApp::new(SettingsForm::new("repo-1", saved()), "t0".to_string())
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn type_text(app: &mut FormApp, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

fn select(app: &mut FormApp, row: FieldRow) {
    app.selected = app
        .rows()
        .iter()
        .position(|r| *r == row)
        .expect("row present");
}

#[test]
fn rows_list_each_environment_line() {
    let app = app();
    assert_eq!(
        app.rows(),
        vec![
            FieldRow::NeedsApproval,
            FieldRow::DecryptEnvironmentVariables,
            FieldRow::ConfigResolutionStrategy,
            FieldRow::OidcClaimKeys,
            FieldRow::EnvironmentLine(0),
            FieldRow::EnvironmentLine(1),
            FieldRow::NewEnvironmentLine,
            FieldRow::ClearCaches,
        ]
    );
}

#[test]
fn toggle_twice_is_clean_again() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    assert!(app.form.draft().needs_approval);
    assert_eq!(app.form.changed_fields(), vec![SettingsField::NeedsApproval]);

    app.handle_key(key(KeyCode::Char(' ')));
    assert!(!app.form.is_dirty());
}

#[test]
fn left_and_right_cycle_enums_with_wrap() {
    let mut app = app();
    select(&mut app, FieldRow::DecryptEnvironmentVariables);
    app.handle_key(key(KeyCode::Left));
    assert_eq!(
        app.form.draft().decrypt_environment_variables,
        DecryptEnvironmentVariables::Everyone
    );
    app.handle_key(key(KeyCode::Right));
    assert!(!app.form.is_dirty());

    select(&mut app, FieldRow::ConfigResolutionStrategy);
    app.handle_key(key(KeyCode::Right));
    assert_eq!(
        app.form.draft().config_resolution_strategy,
        ConfigResolutionStrategy::MergeForPrs
    );
}

#[test]
fn claim_keys_input_updates_draft_per_keystroke() {
    let mut app = app();
    select(&mut app, FieldRow::OidcClaimKeys);
    app.handle_key(key(KeyCode::Enter));
    assert!(app.editing.is_some());
    // Opening the input alone does not touch the draft.
    assert!(!app.form.is_dirty());

    type_text(&mut app, "a,");
    assert_eq!(
        app.form.draft().oidc_sub_include_claim_keys,
        vec!["a".to_string(), String::new()]
    );
    type_text(&mut app, "q");
    assert_eq!(
        app.form.draft().oidc_sub_include_claim_keys,
        vec!["a".to_string(), "q".to_string()]
    );

    app.handle_key(key(KeyCode::Esc));
    assert!(app.editing.is_none());
    assert!(!app.quit);
}

#[test]
fn pending_line_commits_on_enter() {
    let mut app = app();
    select(&mut app, FieldRow::NewEnvironmentLine);
    app.handle_key(key(KeyCode::Enter));
    type_text(&mut app, "C=3");
    assert_eq!(app.form.pending_env_line(), "C=3");
    assert!(!app.form.is_dirty());

    app.handle_key(key(KeyCode::Enter));
    assert!(app.editing.is_none());
    assert_eq!(app.form.pending_env_line(), "");
    assert_eq!(
        app.form.draft().additional_environment,
        vec!["A=1".to_string(), "B=2".to_string(), "C=3".to_string()]
    );
    assert_eq!(app.selected_row(), FieldRow::NewEnvironmentLine);
}

#[test]
fn esc_keeps_pending_line() {
    let mut app = app();
    select(&mut app, FieldRow::NewEnvironmentLine);
    app.handle_key(key(KeyCode::Enter));
    type_text(&mut app, "C=");
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.form.pending_env_line(), "C=");
    assert_eq!(app.form.draft().additional_environment.len(), 2);
}

#[test]
fn empty_pending_line_is_not_added() {
    let mut app = app();
    select(&mut app, FieldRow::NewEnvironmentLine);
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Enter));
    assert!(!app.form.is_dirty());
}

#[test]
fn delete_removes_selected_line_and_clamps_selection() {
    let mut app = app();
    select(&mut app, FieldRow::EnvironmentLine(1));
    app.handle_key(key(KeyCode::Char('d')));
    assert_eq!(
        app.form.draft().additional_environment,
        vec!["A=1".to_string()]
    );
    assert_eq!(app.selected_row(), FieldRow::NewEnvironmentLine);

    // Not an environment row: nothing happens.
    select(&mut app, FieldRow::NeedsApproval);
    app.handle_key(key(KeyCode::Delete));
    assert_eq!(app.form.draft().additional_environment.len(), 1);
}

#[test]
fn clear_caches_checkbox_bumps_from_saved() {
    let mut app = app();
    select(&mut app, FieldRow::ClearCaches);
    app.handle_key(key(KeyCode::Enter));
    assert!(app.form.clear_caches_checked());
    assert_eq!(app.form.draft().cache_version, 4);
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.form.draft().cache_version, 3);
}

#[test]
fn ctrl_s_on_clean_form_does_not_save() {
    let mut app = app();
    assert_eq!(app.handle_key(ctrl('s')), None);
    assert_eq!(
        app.status.as_ref().map(|s| s.text.as_str()),
        Some("Nothing to save")
    );
}

#[test]
fn save_success_syncs_saved_and_draft() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    let command = app.handle_key(ctrl('s'));
    assert_eq!(command, Some(Command::Save));

    let port = FakePort::new(saved());
    assert!(app.perform(Command::Save, &port));
    assert_eq!(*port.saves.borrow(), 1);
    assert!(!app.form.is_dirty());
    assert!(app.form.saved().needs_approval);
    assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Info));
}

#[test]
fn save_failure_keeps_draft_and_reports_error() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));

    let port = FakePort::failing(saved());
    assert!(!app.perform(Command::Save, &port));
    assert!(app.form.is_dirty());
    assert!(!app.form.saved().needs_approval);
    let status = app.status.clone().expect("status");
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("connection refused"));
}

#[test]
fn revert_restores_saved() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    select(&mut app, FieldRow::EnvironmentLine(0));
    app.handle_key(key(KeyCode::Char('d')));
    app.handle_key(key(KeyCode::Char('u')));
    assert!(!app.form.is_dirty());
    assert_eq!(app.form.draft(), &saved());
}

#[test]
fn refetch_replaces_both_snapshots() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.handle_key(ctrl('r')), Some(Command::Refetch));

    let remote = RepositorySettings {
        cache_version: 9,
        ..RepositorySettings::default()
    };
    let port = FakePort::new(remote.clone());
    assert!(app.perform(Command::Refetch, &port));
    assert_eq!(app.form.saved(), &remote);
    assert_eq!(app.form.draft(), &remote);
    assert_ne!(app.fetched_at, "t0");
}

#[test]
fn q_quits_outside_inputs_only() {
    let mut app = app();
    select(&mut app, FieldRow::OidcClaimKeys);
    app.handle_key(key(KeyCode::Enter));
    type_text(&mut app, "q");
    assert!(!app.quit);
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.quit);
}
