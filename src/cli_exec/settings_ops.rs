use super::*;

use repoconf::form::{SettingsEdit, SettingsForm};
use repoconf::graphql::GraphqlClient;
use repoconf::model::{ConsoleEndpoint, RepositorySettings, SettingsField};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

struct Session {
    console: ConsoleEndpoint,
    client: GraphqlClient,
}

impl Session {
    fn open(store: &LocalStore) -> Result<Self> {
        let (console, token) = store.require_console_and_token()?;
        let client = GraphqlClient::new(console.clone(), token)?;
        Ok(Self { console, client })
    }

    /// Stored draft if there is one, otherwise a fresh fetch.
    fn load_form(&self, store: &LocalStore) -> Result<(SettingsForm, String)> {
        if let Some(record) = store.get_form(&self.console)?
            && record.repository_id == self.console.repository_id
        {
            let fetched_at = record.fetched_at.clone();
            return Ok((SettingsForm::from_record(record), fetched_at));
        }
        let form = SettingsForm::load(&self.client, &self.console.repository_id)?;
        let fetched_at = now_ts()?;
        store.put_form(&self.console, &form.to_record(&fetched_at))?;
        Ok((form, fetched_at))
    }
}

fn now_ts() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")
}

pub(super) fn fetch(store: &LocalStore, json: bool) -> Result<()> {
    let session = Session::open(store)?;
    if let Some(record) = store.get_form(&session.console)? {
        let previous = SettingsForm::from_record(record);
        if previous.is_dirty() {
            tracing::warn!(
                repository_id = %previous.repository_id(),
                "discarding unsaved local edits"
            );
        }
    }

    let form = SettingsForm::load(&session.client, &session.console.repository_id)?;
    let fetched_at = now_ts()?;
    store.put_form(&session.console, &form.to_record(&fetched_at))?;
    print_form(&form, &fetched_at, json)
}

pub(super) fn show(store: &LocalStore, json: bool) -> Result<()> {
    let session = Session::open(store)?;
    let (form, fetched_at) = session.load_form(store)?;
    print_form(&form, &fetched_at, json)
}

pub(super) fn edit(store: &LocalStore, args: EditArgs) -> Result<()> {
    let edits = edits_from_args(args);
    if edits.is_empty() {
        anyhow::bail!("no edits given (see `repoconf settings edit --help`)");
    }

    let session = Session::open(store)?;
    let (mut form, fetched_at) = session.load_form(store)?;
    for edit in edits {
        tracing::debug!(?edit, "apply edit");
        form.apply(edit);
    }
    store.put_form(&session.console, &form.to_record(&fetched_at))?;

    let changed = form.changed_fields();
    if changed.is_empty() {
        println!("No changes");
    } else {
        println!("Unsaved changes: {}", field_names(&changed));
    }
    Ok(())
}

pub(super) fn diff(store: &LocalStore, json: bool) -> Result<()> {
    let session = Session::open(store)?;
    let (form, _) = session.load_form(store)?;
    let changed = form.changed_fields();

    if json {
        let entries = changed
            .iter()
            .map(|f| {
                serde_json::json!({
                    "field": f.name(),
                    "saved": field_value(form.saved(), *f),
                    "draft": field_value(form.draft(), *f),
                })
            })
            .collect::<Vec<_>>();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).context("serialize diff json")?
        );
        return Ok(());
    }

    if changed.is_empty() {
        println!("No changes");
        return Ok(());
    }
    for f in changed {
        println!(
            "{}: {} -> {}",
            f.name(),
            field_value(form.saved(), f),
            field_value(form.draft(), f)
        );
    }
    Ok(())
}

pub(super) fn save(store: &LocalStore, json: bool) -> Result<()> {
    let session = Session::open(store)?;
    let (mut form, _) = session.load_form(store)?;
    if !form.can_save() {
        println!("Nothing to save");
        return Ok(());
    }

    // On failure the stored draft is left as it was, so the save can be retried.
    let saved = form.save(&session.client).context("save settings")?;
    let fetched_at = now_ts()?;
    store.put_form(&session.console, &form.to_record(&fetched_at))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&saved).context("serialize settings json")?
        );
    } else {
        println!("Saved settings for {}", form.repository_id());
    }
    Ok(())
}

pub(super) fn discard(store: &LocalStore) -> Result<()> {
    let session = Session::open(store)?;
    let (mut form, fetched_at) = session.load_form(store)?;
    form.reset_draft();
    store.put_form(&session.console, &form.to_record(&fetched_at))?;
    println!("Discarded local edits");
    Ok(())
}

pub(super) fn edits_from_args(args: EditArgs) -> Vec<SettingsEdit> {
    let mut out = Vec::new();
    if let Some(v) = args.needs_approval {
        out.push(SettingsEdit::SetNeedsApproval(v));
    }
    if args.toggle_needs_approval {
        out.push(SettingsEdit::ToggleNeedsApproval);
    }
    if let Some(v) = args.decrypt_env {
        out.push(SettingsEdit::SetDecryptEnvironmentVariables(v));
    }
    if let Some(v) = args.config_resolution {
        out.push(SettingsEdit::SetConfigResolutionStrategy(v));
    }
    if let Some(text) = args.oidc_claims {
        out.push(SettingsEdit::SetOidcClaimKeysText(text));
    }
    for line in args.remove_env {
        out.push(SettingsEdit::RemoveEnvironmentLine(line));
    }
    for line in args.add_env {
        out.push(SettingsEdit::AddEnvironmentLine(line));
    }
    if let Some(v) = args.clear_caches {
        out.push(SettingsEdit::SetClearCaches(v));
    }
    out
}

fn field_names(fields: &[SettingsField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_value(settings: &RepositorySettings, field: SettingsField) -> serde_json::Value {
    match field {
        SettingsField::NeedsApproval => serde_json::json!(settings.needs_approval),
        SettingsField::DecryptEnvironmentVariables => {
            serde_json::json!(settings.decrypt_environment_variables)
        }
        SettingsField::ConfigResolutionStrategy => {
            serde_json::json!(settings.config_resolution_strategy)
        }
        SettingsField::AdditionalEnvironment => {
            serde_json::json!(settings.additional_environment)
        }
        SettingsField::CacheVersion => serde_json::json!(settings.cache_version),
        SettingsField::OidcSubIncludeClaimKeys => {
            serde_json::json!(settings.oidc_sub_include_claim_keys)
        }
    }
}

fn print_form(form: &SettingsForm, fetched_at: &str, json: bool) -> Result<()> {
    let changed = form.changed_fields();
    if json {
        let v = serde_json::json!({
            "repositoryId": form.repository_id(),
            "fetchedAt": fetched_at,
            "dirty": form.is_dirty(),
            "changedFields": changed.iter().map(|f| f.name()).collect::<Vec<_>>(),
            "saved": form.saved(),
            "draft": form.draft(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&v).context("serialize settings json")?
        );
        return Ok(());
    }

    let mark = |f: SettingsField| if changed.contains(&f) { "*" } else { " " };
    let draft = form.draft();
    println!("repository: {} (fetched {})", form.repository_id(), fetched_at);
    println!(
        "{} needs approval: {}",
        mark(SettingsField::NeedsApproval),
        draft.needs_approval
    );
    println!(
        "{} decrypt environment variables: {} ({})",
        mark(SettingsField::DecryptEnvironmentVariables),
        draft.decrypt_environment_variables,
        draft.decrypt_environment_variables.label()
    );
    println!(
        "{} config resolution strategy: {} ({})",
        mark(SettingsField::ConfigResolutionStrategy),
        draft.config_resolution_strategy,
        draft.config_resolution_strategy.label()
    );
    println!(
        "{} oidc sub claim keys: {}",
        mark(SettingsField::OidcSubIncludeClaimKeys),
        form.claim_keys_text()
    );
    println!(
        "{} environment:",
        mark(SettingsField::AdditionalEnvironment)
    );
    if draft.additional_environment.is_empty() {
        println!("    (none)");
    }
    for line in &draft.additional_environment {
        println!("    - {}", line);
    }
    if form.clear_caches_checked() {
        println!(
            "{} clear caches: yes (cache version {} -> {})",
            mark(SettingsField::CacheVersion),
            form.saved().cache_version,
            draft.cache_version
        );
    } else {
        println!("  clear caches: no (cache version {})", draft.cache_version);
    }
    if changed.is_empty() {
        println!("status: saved");
    } else {
        println!("status: unsaved changes ({})", field_names(&changed));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/cli_exec/settings_ops_tests.rs"]
mod tests;
