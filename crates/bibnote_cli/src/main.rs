//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bibnote_core` linkage.
//! - Stand in for the host layer by bootstrapping file logging.
//! - Keep output deterministic for quick local sanity checks.

use bibnote_core::{default_log_level, init_logging, merge, PropertyMap, PropertyValue};

fn main() {
    let log_dir = std::env::temp_dir().join("bibnote-logs");
    match init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        Ok(()) => println!("bibnote_core logging dir={}", log_dir.display()),
        Err(err) => eprintln!("bibnote_core logging unavailable: {err}"),
    }

    println!("bibnote_core version={}", bibnote_core::core_version());

    // Tiny merge probe to validate core crate wiring without a host vault.
    let mut existing = PropertyMap::new();
    existing.insert("tags", PropertyValue::list(["b", "a"]));
    let mut incoming = PropertyMap::new();
    incoming.insert("tags", PropertyValue::list(["c"]));
    let merged = merge(&existing, &incoming, false);
    println!("bibnote_core merge_probe keys={}", merged.len());
}
