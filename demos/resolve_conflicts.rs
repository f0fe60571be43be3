//! Exercises the resolver directly: dependency closure, conflict detection,
//! and an override-table correction, each printed as a little scenario.

use std::collections::BTreeSet;

use mod_bisect_engine::registry::{
    DepEntry, ModId, ModRecord, OverrideEntry, OverrideTable, Registry,
};
use mod_bisect_engine::resolver::resolve;
use mod_bisect_engine::status::StatusStore;
use semver::VersionReq;

fn any() -> VersionReq {
    VersionReq::parse("*").unwrap()
}

fn resolve_and_print(label: &str, registry: &Registry, candidate: &[&str]) {
    let candidate: BTreeSet<ModId> = candidate.iter().map(|s| ModId::new(*s)).collect();
    let status = StatusStore::new();
    match resolve(&candidate, registry, &status) {
        Ok(effective) => println!("{label}: candidate {candidate:?} -> effective {effective:?}"),
        Err(e) => println!("{label}: candidate {candidate:?} -> failed: {e}"),
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    // Scenario: m1 depends on m2, which is present but disabled by default.
    let mut quest_log = ModRecord::bare("quest_log", "quest_log.zip", "1.0.0");
    quest_log.depends.push(DepEntry::new("ui_lib", any()));
    let ui_lib = ModRecord::bare("ui_lib", "ui_lib.zip", "1.0.0");
    let registry = Registry::load(vec![quest_log, ui_lib], &OverrideTable::new()).unwrap();
    resolve_and_print("dependency pull-in", &registry, &["quest_log"]);

    // Scenario: two mods that hard-conflict over the same virtual identifier.
    let mut hd_textures = ModRecord::bare("hd_textures", "hd_textures.zip", "2.0.0");
    hd_textures.breaks.push(DepEntry::new(
        "texture_pack",
        VersionReq::parse("<2.0.0").unwrap(),
    ));
    let mut legacy_textures = ModRecord::bare("legacy_textures", "legacy_textures.zip", "1.0.0");
    legacy_textures.provides.insert("texture_pack".into());
    let registry =
        Registry::load(vec![hd_textures, legacy_textures], &OverrideTable::new()).unwrap();
    resolve_and_print("conflict", &registry, &["hd_textures", "legacy_textures"]);

    // Scenario: a community override patches a known-buggy mod's manifest to
    // add a dependency it forgot to declare.
    let buggy = ModRecord::bare("buggy_ai_mod", "buggy_ai_mod.zip", "0.9.0");
    let pathfinding = ModRecord::bare("pathfinding_lib", "pathfinding_lib.zip", "1.0.0");
    let mut overrides = OverrideTable::new();
    overrides.push(OverrideEntry {
        mod_id: ModId::new("buggy_ai_mod"),
        version_predicate: VersionReq::parse("<1.0.0").unwrap(),
        extra_depends: vec![DepEntry::new("pathfinding_lib", any())],
        extra_breaks: vec![],
    });
    let registry = Registry::load(vec![buggy, pathfinding], &overrides).unwrap();
    resolve_and_print(
        "override-corrected dependency",
        &registry,
        &["buggy_ai_mod"],
    );
}
