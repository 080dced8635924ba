use std::path::Path;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::*;

pub(super) fn repos_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("repos")
}

pub(super) fn repo_path(data_dir: &Path, repo_id: &str) -> PathBuf {
    repos_dir(data_dir).join(format!("{}.json", repo_id))
}

pub(super) fn now_ts() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")
}

pub(super) fn persist_repo(data_dir: &Path, repo: &RepoRecord) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(repo).context("serialize repo")?;
    let path = repo_path(data_dir, &repo.id);
    write_atomic_overwrite(&path, &bytes)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub(super) fn load_repos_from_disk(data_dir: &Path) -> Result<HashMap<String, RepoRecord>> {
    let dir = repos_dir(data_dir);
    let mut out = HashMap::new();
    if !dir.is_dir() {
        return Ok(out);
    }

    for entry in std::fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.context("read repos dir entry")?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let repo: RepoRecord = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        out.insert(repo.id.clone(), repo);
    }
    Ok(out)
}

pub(super) fn write_atomic_overwrite(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
