use std::path::{Path, PathBuf};

/// Directory under the user's home that holds everything we manage.
pub const STORE_DIR_NAME: &str = ".modern-python-skill";
pub const SKILL_DIR_NAME: &str = "skill";
pub const REGISTRY_FILE_NAME: &str = "registry.toml";
/// Directory name the skill tree lands under inside each project.
pub const PROJECT_SKILL_DIR: &str = "modern-python-skill";

/// Locations of the central store's artifacts, all derived from one
/// injectable root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    root: PathBuf,
}

impl StorePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `~/.modern-python-skill`, or `None` when no home
    /// directory can be resolved.
    pub fn from_home() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(STORE_DIR_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn skill_source(&self) -> PathBuf {
        self.root.join(SKILL_DIR_NAME)
    }

    pub fn registry_file(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE_NAME)
    }
}

/// Where the skill tree lands inside a registered project.
pub fn project_skill_target(project_path: &Path) -> PathBuf {
    project_path.join(PROJECT_SKILL_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_paths_derive_from_root() {
        let store = StorePaths::new("/srv/store");
        assert_eq!(store.root(), Path::new("/srv/store"));
        assert_eq!(store.skill_source(), Path::new("/srv/store/skill"));
        assert_eq!(store.registry_file(), Path::new("/srv/store/registry.toml"));
    }

    #[test]
    fn test_project_target_is_nested_in_project() {
        let target = project_skill_target(Path::new("/home/me/app"));
        assert_eq!(target, Path::new("/home/me/app/modern-python-skill"));
    }
}
