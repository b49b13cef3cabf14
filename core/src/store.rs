use crate::error::{Error, Result};
use crate::paths::StorePaths;
use crate::registry::{self, Registry};
use crate::templates;

/// What `init` found or created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    pub registry_created: bool,
    pub skills_seeded: bool,
    pub files_written: usize,
}

/// Create the store skeleton: an empty registry plus the built-in
/// skill tree. Artifacts that already exist are left untouched;
/// re-running is safe.
pub fn init(store: &StorePaths) -> Result<InitReport> {
    let registry_file = store.registry_file();
    let registry_created = !registry_file.exists();
    if registry_created {
        registry::save(&registry_file, &Registry::default())?;
    }

    let skill_source = store.skill_source();
    let skills_seeded = !skill_source.exists();
    let mut files_written = 0;
    if skills_seeded {
        files_written =
            templates::write_default_tree(&skill_source).map_err(|source| Error::SyncIo {
                path: skill_source.clone(),
                source,
            })?;
    }

    tracing::info!(
        registry_created,
        skills_seeded,
        root = %store.root().display(),
        "store initialized"
    );
    Ok(InitReport {
        registry_created,
        skills_seeded,
        files_written,
    })
}
