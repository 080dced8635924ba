use crate::form::SettingsForm;
use crate::model::SettingsField;

/// One selectable row of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum FieldRow {
    NeedsApproval,
    DecryptEnvironmentVariables,
    ConfigResolutionStrategy,
    OidcClaimKeys,
    EnvironmentLine(usize),
    NewEnvironmentLine,
    ClearCaches,
}

impl FieldRow {
    pub(super) fn field(self) -> SettingsField {
        match self {
            FieldRow::NeedsApproval => SettingsField::NeedsApproval,
            FieldRow::DecryptEnvironmentVariables => SettingsField::DecryptEnvironmentVariables,
            FieldRow::ConfigResolutionStrategy => SettingsField::ConfigResolutionStrategy,
            FieldRow::OidcClaimKeys => SettingsField::OidcSubIncludeClaimKeys,
            FieldRow::EnvironmentLine(_) | FieldRow::NewEnvironmentLine => {
                SettingsField::AdditionalEnvironment
            }
            FieldRow::ClearCaches => SettingsField::CacheVersion,
        }
    }
}

pub(super) fn rows(form: &SettingsForm) -> Vec<FieldRow> {
    let mut out = vec![
        FieldRow::NeedsApproval,
        FieldRow::DecryptEnvironmentVariables,
        FieldRow::ConfigResolutionStrategy,
        FieldRow::OidcClaimKeys,
    ];
    out.extend((0..form.draft().additional_environment.len()).map(FieldRow::EnvironmentLine));
    out.push(FieldRow::NewEnvironmentLine);
    out.push(FieldRow::ClearCaches);
    out
}

/// Next value in `all` after `current`, wrapping in either direction.
pub(super) fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    if all.is_empty() {
        return current;
    }
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % all.len()
    } else {
        (pos + all.len() - 1) % all.len()
    };
    all[next]
}
