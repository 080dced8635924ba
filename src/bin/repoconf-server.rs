use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::RwLock;

use repoconf::model::RepositorySettings;

#[path = "repoconf_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "repoconf_server/auth.rs"]
mod auth;
use self::auth::*;
#[path = "repoconf_server/persistence.rs"]
mod persistence;
use self::persistence::*;
#[path = "repoconf_server/validators.rs"]
mod validators;
use self::validators::*;
#[path = "repoconf_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "repoconf_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "repoconf_server/runtime.rs"]
mod runtime;

#[derive(Clone)]
struct AppState {
    data_dir: PathBuf,

    repos: Arc<RwLock<HashMap<String, RepoRecord>>>,

    // Stored hash of the development bearer token.
    token_hash: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoRecord {
    id: String,
    settings: RepositorySettings,
    updated_at: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
