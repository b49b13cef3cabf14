use std::fs;

use mps_core::{StorePaths, paths, registry, store, sync};
use tempfile::TempDir;

#[test]
fn test_full_lifecycle_from_init_to_remove() {
    let temp = TempDir::new().unwrap();
    let store_paths = StorePaths::new(temp.path().join("store"));
    let project = temp.path().join("app");
    fs::create_dir_all(&project).unwrap();

    let report = store::init(&store_paths).unwrap();
    assert!(report.registry_created);
    assert!(report.skills_seeded);

    let mut registry = registry::load(&store_paths.registry_file()).unwrap();
    let entry = registry.add("app", &project).unwrap();
    registry::save(&store_paths.registry_file(), &registry).unwrap();

    let synced = sync::sync(&store_paths, &entry).unwrap();
    assert_eq!(synced.files_written, report.files_written);
    assert!(!synced.replaced);

    let target = paths::project_skill_target(&entry.path);
    fs::write(target.join("stale.txt"), "old").unwrap();
    let resynced = sync::sync(&store_paths, &entry).unwrap();
    assert!(resynced.replaced);
    assert!(!target.join("stale.txt").exists());

    let mut registry = registry::load(&store_paths.registry_file()).unwrap();
    registry.remove("app").unwrap();
    registry::save(&store_paths.registry_file(), &registry).unwrap();

    // Removal only unregisters; the synced tree stays with the project.
    assert!(target.join("SKILL.md").is_file());
    assert!(registry::load(&store_paths.registry_file()).unwrap().is_empty());
}

#[test]
fn test_duplicate_add_is_rejected_across_reloads() {
    let temp = TempDir::new().unwrap();
    let store_paths = StorePaths::new(temp.path().join("store"));
    let project = temp.path().join("app");
    fs::create_dir_all(&project).unwrap();

    store::init(&store_paths).unwrap();
    let mut registry = registry::load(&store_paths.registry_file()).unwrap();
    registry.add("app", &project).unwrap();
    registry::save(&store_paths.registry_file(), &registry).unwrap();

    let mut reloaded = registry::load(&store_paths.registry_file()).unwrap();
    let err = reloaded.add("app", &project).unwrap_err();
    assert!(matches!(err, mps_core::Error::DuplicateName(name) if name == "app"));
}
