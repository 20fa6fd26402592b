//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::draw::roster::{Participant, Roster};
use crate::log::jsonl::DrawRecord;

/// Build a roster from bare identifiers, deriving `<id>@example.com` addresses.
///
/// Panics on malformed input; tests that expect errors call `Roster::new` directly.
#[must_use]
pub fn make_roster(ids: &[&str], exclusions: &[(&str, &[&str])]) -> Roster {
    let participants = ids
        .iter()
        .map(|id| Participant::new(id, &format!("{}@example.com", id.to_lowercase())))
        .collect();
    let exclusions: BTreeMap<String, Vec<String>> = exclusions
        .iter()
        .map(|(giver, excluded)| {
            (
                (*giver).to_string(),
                excluded.iter().map(|s| (*s).to_string()).collect(),
            )
        })
        .collect();
    Roster::new(participants, exclusions).unwrap()
}

/// Write `content` to `dir/name` and return the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Create a dry-run `DrawRecord` for testing with sensible defaults.
#[must_use]
pub fn make_test_record(seed: u64) -> DrawRecord {
    DrawRecord {
        timestamp: Utc::now(),
        seed,
        attempts: 1,
        participants: 4,
        dry_run: true,
        delivered: 4,
        failed: vec![],
    }
}
