//! Fuzz target for graph document loading and evaluation.
//!
//! Goal: loading any JSON text in lenient mode and evaluating the result with
//! every built-in rule should **never panic**. Rejected items are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_graph_document
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use stackguard_app::{LoadMode, load_graph, parse_graph_json};
use stackguard_domain::{RuleRegistry, evaluate};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(doc) = parse_graph_json(text) else {
        return;
    };
    if doc.resources.len() > 256 || doc.relationships.len() > 1024 {
        return;
    }

    if let Ok(loaded) = load_graph(&doc, LoadMode::Lenient) {
        let report = evaluate(&loaded.graph, &RuleRegistry::builtin().view());
        // Built-in rules never fail on a graph that passed schema validation.
        assert!(!report.is_degraded());
    }
});
