//! Shared fixtures for the integration tests
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod list_harness;
//! use list_harness::*;
//! ```

#![allow(dead_code)]

use rowset::prelude::*;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Bob (no age), Amy (30) and Cid (25)
pub fn people() -> Vec<Record> {
    records_from_json(json!([
        {"id": 1, "name": "Bob", "age": null},
        {"id": 2, "name": "Amy", "age": 30},
        {"id": 3, "name": "Cid", "age": 25},
    ]))
    .expect("fixture records are valid")
}

pub fn people_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::number("id", "ID"),
        FieldDefinition::text("name", "Name"),
        FieldDefinition::number("age", "Age"),
    ]
}

/// Five tasks with ids 1..=5, alternating teams and rising scores
pub fn tasks() -> Vec<Record> {
    (1..=5)
        .map(|i: i64| {
            Record::new()
                .with("id", i)
                .with("team", if i % 2 == 1 { "odd" } else { "even" })
                .with("score", i * 10)
                .with("title", format!("Task {}", i))
        })
        .collect()
}

pub fn task_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::number("id", "ID"),
        FieldDefinition::text("team", "Team"),
        FieldDefinition::number("score", "Score"),
        FieldDefinition::text("title", "Title"),
    ]
}

/// Integer ids of records, in order
pub fn ids(records: &[&Record]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|record| record.get("id").as_integer())
        .collect()
}

pub fn keys(ids: &[i64]) -> Vec<RecordKey> {
    ids.iter().map(|id| RecordKey::from(*id)).collect()
}
