//! Walks through a full Fast-strategy bisection session against an
//! in-memory mods directory, narrating each step as a UI would see it.

use mod_bisect_engine::bisector::{Bisector, LoadOptions, Outcome};
use mod_bisect_engine::projector::fake::InMemoryFs;
use mod_bisect_engine::registry::{ModRecord, OverrideTable};
use mod_bisect_engine::strategy::Strategy;

/// Four independent mods, no dependencies; the "real" culprit is m3.
fn build_mods_dir() -> (Vec<ModRecord>, InMemoryFs) {
    let ids = [
        "m1_better_graphics",
        "m2_more_quests",
        "m3_physics_overhaul",
        "m4_ui_skin",
    ];
    let records = ids
        .iter()
        .map(|id| ModRecord::bare(*id, format!("{id}.zip"), "1.0.0"))
        .collect();
    let mut fs = InMemoryFs::new();
    for id in ids {
        fs = fs.with_file(format!("{id}.zip"), true);
    }
    (records, fs)
}

/// Stand-in for the user: the issue reproduces iff m3 is in the enabled set.
fn issue_reproduces(enabled: &std::collections::BTreeSet<mod_bisect_engine::ModId>) -> bool {
    enabled
        .iter()
        .any(|id| id.as_str() == "m3_physics_overhaul")
}

fn main() {
    tracing_subscriber::fmt::init();

    let (records, fs) = build_mods_dir();
    let mut bisector = Bisector::new();
    bisector
        .load_mods(
            fs,
            records,
            &OverrideTable::new(),
            LoadOptions {
                strategy: Strategy::Fast,
            },
        )
        .expect("load");

    println!(
        "loaded {} mods, search space: {:?}",
        4,
        bisector.search_space().unwrap()
    );

    let mut outcome = bisector.step().expect("step");
    loop {
        match outcome {
            Outcome::Question(question) => {
                let issue = issue_reproduces(&question.effective);
                println!(
                    "iteration {}: testing {:?} (effective {:?}) -> issue {}",
                    bisector.iteration_count().unwrap(),
                    question.original,
                    question.effective,
                    if issue { "persists" } else { "gone" }
                );
                outcome = bisector.process_feedback(issue).expect("feedback");
            }
            Outcome::Concluded => {
                println!("concluded. culprits: {:?}", bisector.culprits().unwrap());
                break;
            }
            Outcome::Inconclusive => {
                println!("inconclusive, awaiting user intervention");
                break;
            }
        }
    }
}
