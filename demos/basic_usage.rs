// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the configuration store.
//!
//! This example demonstrates:
//! - Opening (or creating) a configuration file
//! - Typed getters with defaults
//! - Mutating sections and keys
//! - Saving atomically and reloading
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use atomcfg::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== atomcfg: Basic Usage ===\n");

    let dir = std::env::temp_dir().join("atomcfg-basic-usage");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("bt_config.conf");

    // Example 1: open an existing file, or start empty
    println!("--- Example 1: Opening ---");
    let mut config = ConfigFile::builder(&path).open_or_empty()?;
    println!("Opened {} ({} items)", config.path().display(), config.store().len());

    // Example 2: typed reads fall back to the default
    println!("\n--- Example 2: Typed Values ---");
    let store = config.store();
    let name = store.get_string("Adapter", "Name", "unnamed");
    let timeout = store.get_int("Adapter", "DiscoveryTimeout", 120);
    let mtu = store.get_uint16("Adapter", "Mtu", 23);
    let discoverable = store.get_bool("Adapter", "Discoverable", false);
    println!("Name = {}", name);
    println!("DiscoveryTimeout = {}", timeout);
    println!("Mtu = {}", mtu);
    println!("Discoverable = {}", discoverable);

    // Example 3: mutate
    println!("\n--- Example 3: Mutation ---");
    let runs = config.store().get_uint64("Info", "Runs", 0) + 1;
    let store = config.store_mut();
    store.push_comment("# Written by the basic_usage example");
    store.set_string("Adapter", "Name", "kitchen speaker");
    store.set_int("Adapter", "DiscoveryTimeout", timeout);
    store.set_bool("Adapter", "Discoverable", !discoverable);
    store.set_uint64("Info", "Runs", runs);
    store.set_string("aa:bb:cc:dd:ee:ff", "LinkKeyType", "4");
    store.sort_entries_by_key(|a, b| a.cmp(b));

    for item in store.sections() {
        match item {
            Item::Comment(text) => println!("{}", text),
            Item::Section(section) => {
                println!("[{}]", section.name());
                for entry in section.entries() {
                    println!("  {}", entry);
                }
            }
        }
    }

    // Example 4: save and reload
    println!("\n--- Example 4: Save ---");
    config.save()?;
    config.reload()?;
    println!(
        "Saved and reloaded; run count is now {}",
        config.store().get_uint64("Info", "Runs", 0)
    );

    Ok(())
}
