use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths::{self, PROJECT_SKILL_DIR, StorePaths};
use crate::registry::{ProjectEntry, Registry};

/// What a single sync did to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub files_written: usize,
    pub replaced: bool,
}

/// Outcome of syncing one registered project during a batch run.
#[derive(Debug)]
pub struct ProjectSync {
    pub name: String,
    pub result: Result<SyncReport>,
}

/// Replace the project's skill directory with a fresh copy of the
/// store's skill tree.
///
/// The new tree is built in a scratch directory inside the project and
/// renamed into place; a failed copy leaves the existing tree
/// untouched.
pub fn sync(store: &StorePaths, entry: &ProjectEntry) -> Result<SyncReport> {
    let source = store.skill_source();
    if !source.is_dir() {
        return Err(Error::SourceMissing { path: source });
    }
    if !entry.path.is_dir() {
        return Err(Error::InvalidPath {
            path: entry.path.clone(),
        });
    }

    let target = paths::project_skill_target(&entry.path);
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{PROJECT_SKILL_DIR}.staging-"))
        .tempdir_in(&entry.path)
        .map_err(|err| sync_io(&target, err))?;
    let staged = staging.path().join(PROJECT_SKILL_DIR);

    let files_written = copy_tree(&source, &staged).map_err(|err| sync_io(&target, err))?;
    let replaced =
        swap_into_place(&staged, &target, &entry.path).map_err(|err| sync_io(&target, err))?;

    tracing::info!(
        files = files_written,
        replaced,
        target = %target.display(),
        "skill tree synced"
    );
    Ok(SyncReport {
        files_written,
        replaced,
    })
}

/// Sync every registered project, keeping going past failures.
pub fn sync_all(store: &StorePaths, registry: &Registry) -> Vec<ProjectSync> {
    registry
        .entries()
        .map(|entry| {
            let result = sync(store, &entry);
            if let Err(err) = &result {
                tracing::warn!(project = %entry.name, error = %err, "sync failed");
            }
            ProjectSync {
                name: entry.name,
                result,
            }
        })
        .collect()
}

/// Atomic-ish swap: move the old dir out of the way, then move the
/// staged dir into place. If the second rename fails the old dir is
/// moved back.
pub(crate) fn swap_into_place(
    staged: &Path,
    target: &Path,
    scratch_root: &Path,
) -> io::Result<bool> {
    let replaced = target.exists();
    if !replaced {
        fs::rename(staged, target)?;
        return Ok(false);
    }

    let dir_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("skill");
    let graveyard = tempfile::Builder::new()
        .prefix(&format!(".{dir_name}.old-"))
        .tempdir_in(scratch_root)?;
    let parked = graveyard.path().join("previous");

    fs::rename(target, &parked)?;
    if let Err(err) = fs::rename(staged, target) {
        let _ = fs::rename(&parked, target);
        return Err(err);
    }
    Ok(true)
}

fn copy_tree(source: &Path, dest: &Path) -> io::Result<usize> {
    let mut files = 0;
    for entry in walkdir::WalkDir::new(source).follow_links(true) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let out = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&out)?;
        } else {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &out)?;
            files += 1;
        }
    }
    Ok(files)
}

fn sync_io(target: &Path, source: io::Error) -> Error {
    Error::SyncIo {
        path: target.to_path_buf(),
        source,
    }
}
