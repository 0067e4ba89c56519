#![allow(dead_code)]

use ohara::store::{Store, Touchpoint, TouchpointInput};
use tempfile::TempDir;

/// Open a fresh store in its own temp directory. Keep the `TempDir` alive
/// for as long as the store is used.
pub fn test_store() -> (TempDir, Store) {
    let tmp = TempDir::new().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    (tmp, store)
}

/// A valid input against the seeded vocabulary.
pub fn input(description: &str) -> TouchpointInput {
    TouchpointInput {
        description: description.to_string(),
        category: "Mentorship".to_string(),
        tags: Some(vec!["go".to_string()]),
        people_involved: Some(vec!["alice".to_string()]),
        url: Some("https://example.com/pr/1".to_string()),
    }
}

/// Build a touchpoint with a fixed id and date, for seeding the file directly.
pub fn touchpoint(id: &str, date: &str, category: &str, tags: &[&str]) -> Touchpoint {
    Touchpoint {
        id: id.to_string(),
        date: date.to_string(),
        description: format!("touchpoint {id}"),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        people_involved: Vec::new(),
        url: None,
    }
}

/// Overwrite `touchpoints.json` with `touchpoints`.
pub fn seed_touchpoints(store: &Store, touchpoints: &[Touchpoint]) {
    let json = serde_json::to_string_pretty(touchpoints).unwrap();
    std::fs::write(store.data_dir().join("touchpoints.json"), json).unwrap();
}

/// Raw on-disk touchpoint list, bypassing the store.
pub fn touchpoints_on_disk(store: &Store) -> Vec<Touchpoint> {
    let data = std::fs::read(store.data_dir().join("touchpoints.json")).unwrap();
    serde_json::from_slice(&data).unwrap()
}
