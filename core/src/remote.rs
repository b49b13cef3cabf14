use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::paths::{SKILL_DIR_NAME, StorePaths};
use crate::sync;

/// Upstream repository holding the canonical skill tree.
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/ChengJiale150/modern-python-skill";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Cloned,
    Pulled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub kind: UpdateKind,
    pub url: String,
    pub revision: Option<String>,
}

/// Refresh the store's skill tree from the upstream repository.
///
/// An existing git checkout is pulled fast-forward only. Anything else
/// in `skill/`, the seeded tree included, is replaced by a fresh
/// shallow clone.
pub fn update(store: &StorePaths, mirror: Option<&str>) -> Result<UpdateReport> {
    let url = mirror.unwrap_or(DEFAULT_SOURCE_URL);
    let dest = store.skill_source();

    let kind = if dest.join(".git").is_dir() {
        pull(&dest, url)?
    } else {
        clone(store, &dest, url)?
    };

    let revision = head_revision(&dest);
    tracing::info!(
        url,
        revision = revision.as_deref().unwrap_or("unknown"),
        "skill tree refreshed"
    );
    Ok(UpdateReport {
        kind,
        url: url.to_string(),
        revision,
    })
}

fn clone(store: &StorePaths, dest: &Path, url: &str) -> Result<UpdateKind> {
    fs::create_dir_all(store.root()).map_err(|err| sync_io(store.root(), err))?;

    // Clone lands in a scratch dir; skill/ is only replaced once the
    // transfer has succeeded.
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{SKILL_DIR_NAME}.clone-"))
        .tempdir_in(store.root())
        .map_err(|err| sync_io(dest, err))?;
    let checkout = staging.path().join("checkout");

    let mut cmd = Command::new("git");
    cmd.args(["clone", "--depth", "1", url]).arg(&checkout);
    run_git(cmd).map_err(|details| Error::RemoteUnavailable {
        url: url.to_string(),
        details,
    })?;

    sync::swap_into_place(&checkout, dest, store.root()).map_err(|err| sync_io(dest, err))?;
    Ok(UpdateKind::Cloned)
}

fn pull(dest: &Path, url: &str) -> Result<UpdateKind> {
    let mut status = Command::new("git");
    status.arg("-C").arg(dest).args(["status", "--porcelain"]);
    let dirty = run_git_capture(status).map_err(|details| Error::SyncIo {
        path: dest.to_path_buf(),
        source: io::Error::other(details),
    })?;
    if !dirty.is_empty() {
        return Err(Error::DirtyLocalState {
            path: dest.to_path_buf(),
        });
    }

    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(dest).args(["pull", "--ff-only"]);
    run_git(cmd).map_err(|details| Error::RemoteUnavailable {
        url: url.to_string(),
        details,
    })?;
    Ok(UpdateKind::Pulled)
}

fn run_git(cmd: Command) -> std::result::Result<(), String> {
    run_git_capture(cmd).map(|_| ())
}

fn run_git_capture(mut cmd: Command) -> std::result::Result<String, String> {
    let output = cmd
        .output()
        .map_err(|err| format!("failed to execute git: {err}"))?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Err(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(stderr)
        }
    }
}

fn head_revision(dest: &Path) -> Option<String> {
    let mut cmd = Command::new("git");
    cmd.arg("-C")
        .arg(dest)
        .args(["rev-parse", "--short", "HEAD"]);
    run_git_capture(cmd).ok().filter(|rev| !rev.is_empty())
}

fn sync_io(path: &Path, source: io::Error) -> Error {
    Error::SyncIo {
        path: path.to_path_buf(),
        source,
    }
}
