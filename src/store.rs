use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{ConsoleConfig, ConsoleEndpoint, ConsoleState, FormRecord};

const STORE_DIR: &str = ".repoconf";

#[derive(Clone, Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn store_dir(root: &Path) -> PathBuf {
        root.join(STORE_DIR)
    }

    pub fn open(workspace_root: &Path) -> Result<Self> {
        let root = Self::store_dir(workspace_root);
        if !root.is_dir() {
            return Err(anyhow!(
                "No {} directory found at {} (run `repoconf init`)",
                STORE_DIR,
                root.display()
            ));
        }
        Ok(Self { root })
    }

    /// Walks up from `start` until a directory containing `.repoconf` is found.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut cur = Some(start);
        while let Some(dir) = cur {
            if Self::store_dir(dir).is_dir() {
                return Self::open(dir);
            }
            cur = dir.parent();
        }
        Err(anyhow!(
            "No {} directory found in {} or any parent (run `repoconf init`)",
            STORE_DIR,
            start.display()
        ))
    }

    pub fn init(workspace_root: &Path, force: bool) -> Result<Self> {
        let root = Self::store_dir(workspace_root);
        if root.exists() && !force {
            return Err(anyhow!(
                "{} already exists at {} (use --force to re-init)",
                STORE_DIR,
                root.display()
            ));
        }
        fs::create_dir_all(&root).with_context(|| format!("create {}", root.display()))?;

        let store = Self { root };
        store.write_config(&ConsoleConfig {
            version: 1,
            console: None,
        })?;
        store.write_state(&ConsoleState {
            version: 1,
            ..ConsoleState::default()
        })?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("tui.log")
    }

    pub fn read_config(&self) -> Result<ConsoleConfig> {
        let bytes = fs::read(self.root.join("config.json")).context("read config.json")?;
        let cfg: ConsoleConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &ConsoleConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.root.join("config.json"), &bytes).context("write config.json")?;
        Ok(())
    }

    pub fn read_state(&self) -> Result<ConsoleState> {
        let path = self.root.join("state.json");
        if !path.exists() {
            return Ok(ConsoleState {
                version: 1,
                ..ConsoleState::default()
            });
        }
        let bytes = fs::read(&path).context("read state.json")?;
        let st: ConsoleState = serde_json::from_slice(&bytes).context("parse state.json")?;
        if st.version != 1 {
            anyhow::bail!("unsupported state version {}", st.version);
        }
        Ok(st)
    }

    pub fn write_state(&self, st: &ConsoleState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic(&self.root.join("state.json"), &bytes).context("write state.json")?;
        Ok(())
    }

    pub fn require_console(&self) -> Result<ConsoleEndpoint> {
        let cfg = self.read_config()?;
        cfg.console.context(
            "no console configured (run `repoconf console set --url ... --token ... --repo ...`)",
        )
    }

    pub fn require_console_and_token(&self) -> Result<(ConsoleEndpoint, String)> {
        let console = self.require_console()?;
        let token = self.get_token(&console)?.context(
            "no console token configured (run `repoconf console set --url ... --token ... --repo ...`)",
        )?;
        Ok((console, token))
    }

    pub fn console_key(&self, console: &ConsoleEndpoint) -> String {
        format!("{}#{}", console.graphql_url, console.repository_id)
    }

    pub fn get_token(&self, console: &ConsoleEndpoint) -> Result<Option<String>> {
        let st = self.read_state()?;
        Ok(st.tokens.get(&self.console_key(console)).cloned())
    }

    pub fn set_token(&self, console: &ConsoleEndpoint, token: &str) -> Result<()> {
        let mut st = self.read_state()?;
        st.tokens
            .insert(self.console_key(console), token.to_string());
        self.write_state(&st)
    }

    pub fn get_form(&self, console: &ConsoleEndpoint) -> Result<Option<FormRecord>> {
        let st = self.read_state()?;
        Ok(st.forms.get(&self.console_key(console)).cloned())
    }

    pub fn put_form(&self, console: &ConsoleEndpoint, record: &FormRecord) -> Result<()> {
        let mut st = self.read_state()?;
        st.forms.insert(self.console_key(console), record.clone());
        self.write_state(&st)
    }

    pub fn clear_form(&self, console: &ConsoleEndpoint) -> Result<()> {
        let mut st = self.read_state()?;
        st.forms.remove(&self.console_key(console));
        self.write_state(&st)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
