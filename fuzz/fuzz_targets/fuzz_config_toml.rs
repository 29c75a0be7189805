//! Fuzz target for config parsing and resolution.
//!
//! Goal: parsing and resolving any TOML text should **never panic**, and any
//! config that resolves must yield a selection the registry accepts.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_toml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use stackguard_domain::RuleRegistry;
use stackguard_settings::{Overrides, parse_config_toml, resolve_config};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(cfg) = parse_config_toml(text) else {
        return;
    };
    if let Ok(resolved) = resolve_config(cfg, Overrides::default()) {
        assert!(RuleRegistry::builtin().filter(&resolved.selection).is_ok());
    }
});
