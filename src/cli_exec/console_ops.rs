use super::*;

use repoconf::model::ConsoleEndpoint;

pub(super) fn show_console(store: &LocalStore, json: bool) -> Result<()> {
    let cfg = store.read_config()?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&cfg.console).context("serialize console json")?
        );
    } else if let Some(console) = cfg.console {
        println!("url: {}", console.graphql_url);
        println!("repo: {}", console.repository_id);
        let has_token = store.get_token(&console)?.is_some();
        println!("token: {}", if has_token { "set" } else { "missing" });
    } else {
        println!("No console configured");
    }
    Ok(())
}

pub(super) fn set_console(
    store: &LocalStore,
    url: String,
    token: String,
    repo: String,
) -> Result<()> {
    let mut cfg = store.read_config()?;
    let console = ConsoleEndpoint {
        graphql_url: url.trim_end_matches('/').to_string(),
        repository_id: repo,
    };
    store
        .set_token(&console, &token)
        .context("store console token in state.json")?;
    cfg.console = Some(console);
    store.write_config(&cfg)?;
    println!("Console configured");
    Ok(())
}
