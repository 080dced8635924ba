use repoconf::graphql::GraphqlErrorEntry;

use super::*;

/// Repository ids double as file names under `repos/`.
pub(super) fn validate_repo_id(id: &str) -> Result<()> {
    if id.is_empty() {
        anyhow::bail!("repository id cannot be empty");
    }
    if id.len() > 128 {
        anyhow::bail!("repository id too long");
    }
    if id.starts_with('.') {
        anyhow::bail!("repository id cannot start with '.'");
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        anyhow::bail!("repository id must be [A-Za-z0-9._-]");
    }
    Ok(())
}

fn input_path(field: &str, index: Option<usize>) -> Vec<serde_json::Value> {
    let mut path = vec![
        serde_json::json!("saveSettings"),
        serde_json::json!("input"),
        serde_json::json!(field),
    ];
    if let Some(i) = index {
        path.push(serde_json::json!(i));
    }
    path
}

/// Trims claim keys and environment lines and drops empty entries. Every environment line
/// left must be `KEY=VALUE` with a non-empty key.
pub(super) fn normalize_settings(
    settings: &RepositorySettings,
) -> std::result::Result<RepositorySettings, Vec<GraphqlErrorEntry>> {
    let mut errors = Vec::new();

    let oidc_sub_include_claim_keys = settings
        .oidc_sub_include_claim_keys
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut additional_environment = Vec::new();
    for (i, line) in settings.additional_environment.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once('=') {
            Some((key, _)) if !key.trim().is_empty() => {
                additional_environment.push(line.to_string())
            }
            _ => errors.push(GraphqlErrorEntry {
                message: format!("environment line {:?} must have the form KEY=VALUE", line),
                path: input_path("additionalEnvironment", Some(i)),
            }),
        }
    }

    if settings.cache_version < 0 {
        errors.push(GraphqlErrorEntry {
            message: "cacheVersion cannot be negative".to_string(),
            path: input_path("cacheVersion", None),
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(RepositorySettings {
        additional_environment,
        oidc_sub_include_claim_keys,
        ..settings.clone()
    })
}

pub(super) fn check_cache_version(
    current: i64,
    next: i64,
) -> std::result::Result<(), GraphqlErrorEntry> {
    if next < current {
        return Err(GraphqlErrorEntry {
            message: format!(
                "cacheVersion cannot decrease (current {}, got {})",
                current, next
            ),
            path: input_path("cacheVersion", None),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/bin/repoconf_server/validators_tests.rs"]
mod tests;
