//! Drives `DiskProjector` against a real temporary directory instead of the
//! in-memory fake, to cover the actual rename/scan code path.

use std::collections::BTreeSet;
use std::fs;

use mod_bisect_engine::projector::{DiskProjector, RealFs};
use mod_bisect_engine::registry::{ModId, ModRecord, OverrideTable, Registry};

fn registry() -> Registry {
    Registry::load(
        vec![
            ModRecord::bare("m1", "m1.zip", "1.0.0"),
            ModRecord::bare("m2", "m2.zip", "1.0.0"),
            ModRecord::bare("m3", "m3.zip", "1.0.0"),
        ],
        &OverrideTable::new(),
    )
    .unwrap()
}

#[test]
fn apply_renames_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("m1.zip"), b"").unwrap();
    fs::write(dir.path().join("m2.zip.disabled"), b"").unwrap();
    fs::write(dir.path().join("m3.zip"), b"").unwrap();

    let registry = registry();
    let mut projector = DiskProjector::new(RealFs::new(dir.path()));

    let target: BTreeSet<ModId> = [ModId::new("m2")].into_iter().collect();
    let summary = projector.apply(&target, &registry).unwrap();
    assert!(summary.is_success());

    assert!(dir.path().join("m1.zip.disabled").exists());
    assert!(dir.path().join("m2.zip").exists());
    assert!(dir.path().join("m3.zip.disabled").exists());
}

#[test]
fn current_enabled_reflects_directory_scan() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("m1.zip"), b"").unwrap();
    fs::write(dir.path().join("m2.zip.disabled"), b"").unwrap();
    fs::write(dir.path().join("m3.zip"), b"").unwrap();

    let registry = registry();
    let projector = DiskProjector::new(RealFs::new(dir.path()));
    let enabled = projector.current_enabled(&registry).unwrap();
    assert_eq!(
        enabled,
        [ModId::new("m1"), ModId::new("m3")].into_iter().collect()
    );
}

#[test]
fn apply_is_idempotent_against_real_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("m1.zip"), b"").unwrap();
    fs::write(dir.path().join("m2.zip"), b"").unwrap();
    fs::write(dir.path().join("m3.zip.disabled"), b"").unwrap();

    let registry = registry();
    let mut projector = DiskProjector::new(RealFs::new(dir.path()));
    let target: BTreeSet<ModId> = [ModId::new("m1"), ModId::new("m2")].into_iter().collect();

    let first = projector.apply(&target, &registry).unwrap();
    assert!(first.disabled.is_empty() && first.enabled.is_empty());
    let second = projector.apply(&target, &registry).unwrap();
    assert!(second.disabled.is_empty() && second.enabled.is_empty());
}
