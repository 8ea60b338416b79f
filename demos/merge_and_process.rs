// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge and process example for the nestcfg crate.
//!
//! This example demonstrates:
//! - Loading a base configuration and a local override from files
//! - Merging them (lists append, named sections merge, scalars are replaced)
//! - Resolving constants and tokens through a processor queue
//! - Freezing the result so later writes fail
//!
//! To run this example:
//! ```bash
//! cargo run --example merge_and_process
//! ```

use nestcfg::prelude::*;
use std::sync::Arc;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== nestcfg: Merge and Process ===\n");

    let dir = tempfile::tempdir()?;
    let base = dir.path().join("base.yaml");
    let local = dir.path().join("local.json");
    std::fs::write(
        &base,
        "app:\n  name: demo\n  data_dir: DATA_ROOT/demo\ndb:\n  host: '{{DB_HOST}}'\n  port: 5432\nplugins:\n  - auth\n",
    )?;
    std::fs::write(
        &local,
        r#"{"db": {"port": 6543}, "plugins": ["cache", "metrics"], "debug": true}"#,
    )?;

    // Example 1: load and merge, later files win
    println!("--- Example 1: Merge ---");
    let loader = ConfigLoader::with_defaults();
    let mut config = loader.load_files([&base, &local], true)?;
    println!("{}", loader.to_string(&config, "yaml")?);

    // Example 2: run processors, highest priority first
    println!("--- Example 2: Process ---");
    let mut registry = ConstantRegistry::new();
    registry.define("DATA_ROOT", "/var/lib")?;

    let mut queue = ProcessorQueue::new();
    queue.insert_with_priority(Arc::new(ConstantProcessor::new(registry)), 10);
    queue.insert(Arc::new(
        TokenProcessor::with_tokens([("DB_HOST", "db.internal")])
            .with_prefix("{{")
            .with_suffix("}}"),
    ));
    queue.process(&mut config)?;
    println!("{}", loader.to_string(&config, "json")?);

    // Example 3: freeze
    println!("\n--- Example 3: Read-only ---");
    config.set_read_only();
    match config.set("debug", false) {
        Ok(()) => println!("✗ write unexpectedly succeeded"),
        Err(e) => println!("✓ write refused: {}", e),
    }

    Ok(())
}
