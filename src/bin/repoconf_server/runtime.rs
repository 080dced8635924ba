use std::net::SocketAddr;

use clap::Parser;

use super::*;

#[derive(Parser)]
#[command(name = "repoconf-server")]
#[command(about = "Repository settings console (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Data directory; settings are kept under `repos/`
    #[arg(long, default_value = "./repoconf-data")]
    data_dir: PathBuf,

    /// Development bearer token
    #[arg(long, default_value = "dev")]
    dev_token: String,

    /// Repository to create with default settings if it does not exist yet (repeatable)
    #[arg(long = "repo", value_name = "ID")]
    repos: Vec<String>,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    repoconf::logging::init_stderr();

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let mut repos = load_repos_from_disk(&args.data_dir).context("load repos from disk")?;
    seed_repos(&args.data_dir, &mut repos, &args.repos)?;
    tracing::info!(repos = repos.len(), "repositories loaded");

    let state = Arc::new(AppState {
        data_dir: args.data_dir.clone(),
        repos: Arc::new(RwLock::new(repos)),
        token_hash: hash_token(&args.dev_token),
    });

    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(%local_addr, "repoconf-server listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn seed_repos(
    data_dir: &std::path::Path,
    repos: &mut HashMap<String, RepoRecord>,
    ids: &[String],
) -> Result<()> {
    for id in ids {
        validate_repo_id(id).with_context(|| format!("--repo {}", id))?;
        if repos.contains_key(id) {
            continue;
        }
        let record = RepoRecord {
            id: id.clone(),
            settings: RepositorySettings::default(),
            updated_at: now_ts()?,
        };
        persist_repo(data_dir, &record)?;
        tracing::info!(repository_id = %id, "seeded repository");
        repos.insert(id.clone(), record);
    }
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
