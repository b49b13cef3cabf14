use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One registered project, as returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Name-to-path mapping of every project receiving skill syncs.
///
/// Projects live in a `BTreeMap`; serialization and iteration order
/// are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    projects: BTreeMap<String, PathBuf>,
}

impl Registry {
    /// Register a project directory under `name`. The path is stored
    /// in absolute form.
    pub fn add(&mut self, name: &str, path: &Path) -> Result<ProjectEntry> {
        if self.projects.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        if !path.is_dir() {
            return Err(Error::InvalidPath {
                path: path.to_path_buf(),
            });
        }
        let absolute = std::path::absolute(path).map_err(|_| Error::InvalidPath {
            path: path.to_path_buf(),
        })?;
        self.projects.insert(name.to_string(), absolute.clone());
        Ok(ProjectEntry {
            name: name.to_string(),
            path: absolute,
        })
    }

    /// Drop `name` from the registry, returning the entry it held.
    pub fn remove(&mut self, name: &str) -> Result<ProjectEntry> {
        match self.projects.remove_entry(name) {
            Some((name, path)) => Ok(ProjectEntry { name, path }),
            None => Err(Error::UnknownName(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Result<ProjectEntry> {
        match self.projects.get(name) {
            Some(path) => Ok(ProjectEntry {
                name: name.to_string(),
                path: path.clone(),
            }),
            None => Err(Error::UnknownName(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    /// All entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = ProjectEntry> + '_ {
        self.projects.iter().map(|(name, path)| ProjectEntry {
            name: name.clone(),
            path: path.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Load the registry from `path`.
///
/// A missing file is an empty registry, not an error; a present but
/// unparseable file is reported as corrupt rather than silently reset.
pub fn load(path: &Path) -> Result<Registry> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no registry file, starting empty");
            return Ok(Registry::default());
        }
        Err(err) => {
            return Err(Error::Persistence {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };
    toml::from_str(&raw).map_err(|err| Error::CorruptRegistry {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Persist the registry to `path`, replacing any previous contents.
///
/// Writes go to a temp file in the same directory followed by an
/// atomic rename; an interrupted save leaves the previous file intact.
pub fn save(path: &Path, registry: &Registry) -> Result<()> {
    let persistence = |source: std::io::Error| Error::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(persistence)?;

    let raw = toml::to_string_pretty(registry)
        .map_err(|err| persistence(std::io::Error::other(err)))?;

    let mut staged = tempfile::NamedTempFile::new_in(parent).map_err(persistence)?;
    staged.write_all(raw.as_bytes()).map_err(persistence)?;
    staged.as_file().sync_all().map_err(persistence)?;
    staged.persist(path).map_err(|err| persistence(err.error))?;

    tracing::debug!(projects = registry.len(), path = %path.display(), "registry saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_dir(temp: &TempDir, name: &str) -> PathBuf {
        let dir = temp.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = load(&temp.path().join("registry.toml")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_rejects_unparseable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.toml");
        fs::write(&path, "projects = not valid toml {{{{").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::CorruptRegistry { .. }));
    }

    #[test]
    fn test_save_then_load_round_trips_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.toml");
        let project = project_dir(&temp, "app");

        let mut registry = Registry::default();
        registry.add("app", &project).unwrap();
        save(&path, &registry).unwrap();
        let first = fs::read(&path).unwrap();

        let reloaded = load(&path).unwrap();
        assert_eq!(reloaded, registry);

        save(&path, &reloaded).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_rejects_duplicate_name() {
        let temp = TempDir::new().unwrap();
        let first = project_dir(&temp, "first");
        let second = project_dir(&temp, "second");

        let mut registry = Registry::default();
        registry.add("app", &first).unwrap();
        let err = registry.add("app", &second).unwrap_err();

        assert!(matches!(err, Error::DuplicateName(name) if name == "app"));
        assert_eq!(registry.get("app").unwrap().path, first);
    }

    #[test]
    fn test_add_rejects_missing_path() {
        let temp = TempDir::new().unwrap();
        let mut registry = Registry::default();

        let err = registry
            .add("app", &temp.path().join("nowhere"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_rejects_file_path() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("notes.txt");
        fs::write(&file, "hello").unwrap();

        let mut registry = Registry::default();
        let err = registry.add("app", &file).unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn test_remove_returns_the_entry() {
        let temp = TempDir::new().unwrap();
        let project = project_dir(&temp, "app");

        let mut registry = Registry::default();
        registry.add("app", &project).unwrap();
        let removed = registry.remove("app").unwrap();

        assert_eq!(removed.name, "app");
        assert_eq!(removed.path, project);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_unknown_name_fails() {
        let mut registry = Registry::default();
        let err = registry.remove("ghost").unwrap_err();
        assert!(matches!(err, Error::UnknownName(name) if name == "ghost"));
    }

    #[test]
    fn test_failed_remove_leaves_the_file_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.toml");
        let project = project_dir(&temp, "app");

        let mut registry = Registry::default();
        registry.add("app", &project).unwrap();
        save(&path, &registry).unwrap();
        let before = fs::read(&path).unwrap();

        let mut reloaded = load(&path).unwrap();
        assert!(reloaded.remove("ghost").is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_get_unknown_name_fails() {
        let registry = Registry::default();
        let err = registry.get("ghost").unwrap_err();
        assert!(matches!(err, Error::UnknownName(name) if name == "ghost"));
    }

    #[test]
    fn test_entries_are_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        let a = project_dir(&temp, "a");
        let b = project_dir(&temp, "b");

        let mut registry = Registry::default();
        registry.add("zebra", &b).unwrap();
        registry.add("ant", &a).unwrap();

        let names: Vec<String> = registry.entries().map(|e| e.name).collect();
        assert_eq!(names, vec!["ant".to_string(), "zebra".to_string()]);
    }

    #[test]
    fn test_empty_registry_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.toml");

        save(&path, &Registry::default()).unwrap();
        let reloaded = load(&path).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_interrupted_save_leaves_previous_file_intact() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.toml");
        let project = project_dir(&temp, "app");

        let mut registry = Registry::default();
        registry.add("app", &project).unwrap();
        save(&path, &registry).unwrap();

        // A crash between temp-file write and rename leaves a stray temp
        // file next to the registry; the registry itself must still parse.
        fs::write(temp.path().join(".tmpXYZ"), "projects = garbage [").unwrap();

        let reloaded = load(&path).unwrap();
        assert_eq!(reloaded, registry);
    }
}
