use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::{SettingsEdit, SettingsForm};
use crate::model::{ConfigResolutionStrategy, DecryptEnvironmentVariables};
use crate::port::SettingsPort;

use super::fields::{FieldRow, cycle, rows};
use super::input::Input;

/// Work that needs the settings port; run by the event loop after a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Command {
    Save,
    Refetch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Status {
    pub(super) kind: StatusKind,
    pub(super) text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum EditTarget {
    ClaimKeys,
    PendingEnvironmentLine,
}

#[derive(Debug)]
pub(super) struct Editing {
    pub(super) target: EditTarget,
    pub(super) input: Input,
}

#[derive(Debug)]
pub(super) struct FormApp {
    pub(super) form: SettingsForm,
    pub(super) fetched_at: String,
    pub(super) selected: usize,
    pub(super) editing: Option<Editing>,
    pub(super) status: Option<Status>,
    pub(super) quit: bool,
}

impl FormApp {
    pub(super) fn new(form: SettingsForm, fetched_at: String) -> Self {
        Self {
            form,
            fetched_at,
            selected: 0,
            editing: None,
            status: None,
            quit: false,
        }
    }

    pub(super) fn rows(&self) -> Vec<FieldRow> {
        rows(&self.form)
    }

    pub(super) fn selected_row(&self) -> FieldRow {
        let rows = self.rows();
        let idx = self.selected.min(rows.len().saturating_sub(1));
        rows.get(idx).copied().unwrap_or(FieldRow::NeedsApproval)
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    fn clamp_selection(&mut self) {
        let max = self.rows().len().saturating_sub(1);
        self.selected = self.selected.min(max);
    }

    fn select_row(&mut self, row: FieldRow) {
        if let Some(idx) = self.rows().iter().position(|r| *r == row) {
            self.selected = idx;
        }
    }

    pub(super) fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(super) fn move_down(&mut self) {
        let max = self.rows().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if self.editing.is_some() {
            self.handle_input_key(key);
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => {
                    if self.form.can_save() {
                        self.info("Saving...");
                        Some(Command::Save)
                    } else {
                        self.info("Nothing to save");
                        None
                    }
                }
                KeyCode::Char('r') => {
                    self.info("Fetching...");
                    Some(Command::Refetch)
                }
                KeyCode::Char('c') => {
                    self.quit = true;
                    None
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_selected(false),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_selected(true),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_line(),
            KeyCode::Char('u') => self.revert(),
            _ => {}
        }
        None
    }

    fn cycle_selected(&mut self, forward: bool) {
        let draft = self.form.draft();
        match self.selected_row() {
            FieldRow::DecryptEnvironmentVariables => {
                let next = cycle(
                    &DecryptEnvironmentVariables::ALL,
                    draft.decrypt_environment_variables,
                    forward,
                );
                self.form
                    .apply(SettingsEdit::SetDecryptEnvironmentVariables(next));
            }
            FieldRow::ConfigResolutionStrategy => {
                let next = cycle(
                    &ConfigResolutionStrategy::ALL,
                    draft.config_resolution_strategy,
                    forward,
                );
                self.form.apply(SettingsEdit::SetConfigResolutionStrategy(next));
            }
            _ => {}
        }
    }

    fn activate(&mut self) {
        match self.selected_row() {
            FieldRow::NeedsApproval => self.form.apply(SettingsEdit::ToggleNeedsApproval),
            FieldRow::DecryptEnvironmentVariables | FieldRow::ConfigResolutionStrategy => {
                self.cycle_selected(true)
            }
            FieldRow::OidcClaimKeys => {
                self.editing = Some(Editing {
                    target: EditTarget::ClaimKeys,
                    input: Input::with_text(&self.form.claim_keys_text()),
                });
            }
            FieldRow::NewEnvironmentLine => {
                self.editing = Some(Editing {
                    target: EditTarget::PendingEnvironmentLine,
                    input: Input::with_text(self.form.pending_env_line()),
                });
            }
            FieldRow::EnvironmentLine(_) => self.info("d: remove this line"),
            FieldRow::ClearCaches => {
                let checked = self.form.clear_caches_checked();
                self.form.apply(SettingsEdit::SetClearCaches(!checked));
            }
        }
    }

    fn remove_selected_line(&mut self) {
        let FieldRow::EnvironmentLine(i) = self.selected_row() else {
            return;
        };
        let Some(line) = self.form.draft().additional_environment.get(i).cloned() else {
            return;
        };
        self.form.apply(SettingsEdit::RemoveEnvironmentLine(line));
        self.clamp_selection();
    }

    fn revert(&mut self) {
        if !self.form.is_dirty() && self.form.pending_env_line().is_empty() {
            self.info("No changes to revert");
            return;
        }
        self.form.reset_draft();
        self.clamp_selection();
        self.info("Reverted to saved settings");
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(editing) = self.editing.as_mut() else {
            return;
        };
        let target = editing.target;
        let changed = match key.code {
            KeyCode::Esc => {
                self.editing = None;
                return;
            }
            KeyCode::Enter => {
                self.finish_input(target);
                return;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                editing.input.insert_char(c);
                true
            }
            KeyCode::Backspace => editing.input.backspace(),
            KeyCode::Delete => editing.input.delete(),
            KeyCode::Left => {
                editing.input.move_left();
                false
            }
            KeyCode::Right => {
                editing.input.move_right();
                false
            }
            KeyCode::Home => {
                editing.input.home();
                false
            }
            KeyCode::End => {
                editing.input.end();
                false
            }
            _ => false,
        };
        if !changed {
            return;
        }

        let text = editing.input.buf.clone();
        match target {
            EditTarget::ClaimKeys => self.form.apply(SettingsEdit::SetOidcClaimKeysText(text)),
            EditTarget::PendingEnvironmentLine => {
                self.form.apply(SettingsEdit::SetPendingEnvironmentLine(text))
            }
        }
    }

    fn finish_input(&mut self, target: EditTarget) {
        self.editing = None;
        if target != EditTarget::PendingEnvironmentLine {
            return;
        }
        if self.form.pending_env_line().is_empty() {
            return;
        }
        self.form.apply(SettingsEdit::CommitPendingEnvironmentLine);
        self.select_row(FieldRow::NewEnvironmentLine);
    }

    /// Runs a port-backed command. Returns true when the form record should be persisted.
    pub(super) fn perform(&mut self, command: Command, port: &dyn SettingsPort) -> bool {
        match command {
            Command::Save => {
                if !self.form.can_save() {
                    self.info("Nothing to save");
                    return false;
                }
                match self.form.save(port) {
                    Ok(settings) => {
                        self.clamp_selection();
                        self.info(format!(
                            "Saved (cache version {})",
                            settings.cache_version
                        ));
                        true
                    }
                    Err(err) => {
                        self.error(format!("save failed: {:#}", err));
                        false
                    }
                }
            }
            Command::Refetch => match port.fetch_settings(self.form.repository_id()) {
                Ok(settings) => {
                    if self.form.is_dirty() {
                        tracing::warn!(
                            repository_id = %self.form.repository_id(),
                            "discarding unsaved local edits"
                        );
                    }
                    self.form.refresh(settings);
                    self.editing = None;
                    self.clamp_selection();
                    match super::now_ts() {
                        Ok(ts) => self.fetched_at = ts,
                        Err(err) => {
                            tracing::warn!(error = %format!("{:#}", err), "format fetch timestamp")
                        }
                    }
                    self.info("Fetched settings from the console");
                    true
                }
                Err(err) => {
                    tracing::error!(
                        repository_id = %self.form.repository_id(),
                        error = %format!("{:#}", err),
                        "settings fetch failed"
                    );
                    self.error(format!("fetch failed: {:#}", err));
                    false
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_form/app_tests.rs"]
mod tests;
