// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use nestcfg::domain::ConfigTree;
use serde_json::{json, Value};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a test-friendly tracing subscriber once per test binary.
///
/// Output only shows up with `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

pub fn all() -> Value {
    json!({
        "hostname": "all",
        "name": "thisname",
        "db": {
            "host": "127.0.0.1",
            "user": "username",
            "pass": "password",
            "name": "live"
        },
        "one": {"two": {"three": "multi"}}
    })
}

pub fn menu() -> Value {
    json!({
        "button": {
            "b0": {"L1": "button0-1", "L2": "button0-2", "L3": "button0-3"},
            "b1": {"L1": "button1-1", "L2": "button1-2"},
            "b2": {"L1": "button2-1"}
        }
    })
}

pub fn to_combine_a() -> Value {
    json!({
        "foo": 1,
        "bar": 2,
        "text": "foo",
        "numerical": ["first", "second", ["third"]],
        "misaligned": {"2": "foo", "3": "bar"},
        "mixed": {"foo": "bar"},
        "replaceAssoc": {"foo": "bar"},
        "replaceNumerical": ["foo"]
    })
}

pub fn to_combine_b() -> Value {
    json!({
        "foo": 3,
        "text": "bar",
        "numerical": ["fourth", "fifth", ["sixth"]],
        "misaligned": {"3": "baz"},
        "mixed": [false],
        "replaceAssoc": null,
        "replaceNumerical": true
    })
}

pub fn tree(value: Value, allow_modification: bool) -> ConfigTree {
    ConfigTree::from_json(value, allow_modification).expect("fixture is a mapping")
}
