use repoconf::graphql::{
    GraphqlErrorEntry, GraphqlRequest, GraphqlResponse, RepositoryNode, SETTINGS_MUTATION_NAME,
    SETTINGS_QUERY_NAME, SaveSettingsPayload, SettingsMutationData, SettingsMutationVariables,
    SettingsQueryData, SettingsQueryVariables,
};

use super::*;

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Dispatches on `operationName`; the query text itself is not interpreted.
pub(super) async fn graphql(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphqlRequest<serde_json::Value>>,
) -> Response {
    tracing::debug!(operation = %req.operation_name, "graphql request");
    match req.operation_name.as_str() {
        SETTINGS_QUERY_NAME => repository_settings(&state, req.variables).await,
        SETTINGS_MUTATION_NAME => save_settings(&state, req.variables).await,
        other => bad_request(format!("unknown operation {:?}", other)),
    }
}

async fn repository_settings(state: &AppState, variables: serde_json::Value) -> Response {
    let vars: SettingsQueryVariables = match serde_json::from_value(variables) {
        Ok(v) => v,
        Err(err) => return bad_request(format!("invalid variables: {}", err)),
    };

    let repository = {
        let repos = state.repos.read().await;
        repos.get(&vars.repository_id).map(|r| RepositoryNode {
            id: r.id.clone(),
            settings: r.settings.clone(),
        })
    };
    if repository.is_none() {
        tracing::info!(repository_id = %vars.repository_id, "unknown repository");
    }

    Json(GraphqlResponse::data(SettingsQueryData { repository })).into_response()
}

async fn save_settings(state: &AppState, variables: serde_json::Value) -> Response {
    let vars: SettingsMutationVariables = match serde_json::from_value(variables) {
        Ok(v) => v,
        Err(err) => return bad_request(format!("invalid variables: {}", err)),
    };
    let input = vars.input;
    let repository_id = input.repository_id.clone();

    let settings = match normalize_settings(&input.settings()) {
        Ok(s) => s,
        Err(errors) => {
            tracing::info!(%repository_id, errors = errors.len(), "rejected settings input");
            return graphql_errors(errors);
        }
    };

    let mut repos = state.repos.write().await;
    let Some(current) = repos.get(&repository_id) else {
        return graphql_errors(vec![GraphqlErrorEntry {
            message: format!("repository {} not found", repository_id),
            path: vec![serde_json::json!("saveSettings")],
        }]);
    };
    if let Err(entry) = check_cache_version(current.settings.cache_version, settings.cache_version)
    {
        return graphql_errors(vec![entry]);
    }

    let updated_at = match now_ts() {
        Ok(ts) => ts,
        Err(err) => return internal_error(err),
    };
    let record = RepoRecord {
        id: repository_id.clone(),
        settings: settings.clone(),
        updated_at,
    };
    if let Err(err) = persist_repo(&state.data_dir, &record) {
        return internal_error(err);
    }
    repos.insert(repository_id.clone(), record);
    tracing::info!(
        %repository_id,
        cache_version = settings.cache_version,
        "settings saved"
    );

    Json(GraphqlResponse::data(SettingsMutationData {
        save_settings: SaveSettingsPayload {
            client_mutation_id: Some(input.client_mutation_id),
            settings,
        },
    }))
    .into_response()
}
