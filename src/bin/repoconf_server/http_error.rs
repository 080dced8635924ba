use repoconf::graphql::{GraphqlErrorEntry, GraphqlResponse};

use super::*;

pub(super) fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": "unauthorized"})),
    )
        .into_response()
}

pub(super) fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!(error = %format!("{:#}", err), "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

/// Malformed request: 400 with a GraphQL `errors` body.
pub(super) fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(GraphqlResponse::<serde_json::Value>::errors(vec![
            GraphqlErrorEntry::new(message),
        ])),
    )
        .into_response()
}

/// Well-formed request the resolver refused: 200 with `data: null` and `errors`.
pub(super) fn graphql_errors(errors: Vec<GraphqlErrorEntry>) -> Response {
    (
        StatusCode::OK,
        Json(GraphqlResponse::<serde_json::Value>::errors(errors)),
    )
        .into_response()
}
