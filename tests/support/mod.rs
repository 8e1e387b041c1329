#![allow(dead_code)]

use std::path::PathBuf;

use glm2sql::expression::{Row, Value};
use glm2sql::ModelHandle;

pub(crate) fn fixture_path(fixture: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(format!("{fixture}.json"))
}

pub(crate) fn read_fixture_json(fixture: &str) -> String {
    std::fs::read_to_string(fixture_path(fixture)).expect("fixture JSON should be readable")
}

pub(crate) fn load_fixture_model(fixture: &str) -> ModelHandle {
    ModelHandle::from_json(&read_fixture_json(fixture)).expect("fixture model should load")
}

pub(crate) fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}
