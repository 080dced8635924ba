use super::*;

pub(super) fn authed_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/graphql", post(graphql))
        .layer(middleware::from_fn_with_state(state, require_bearer))
}

pub(super) fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(authed_router(state.clone()))
        .with_state(state)
}
