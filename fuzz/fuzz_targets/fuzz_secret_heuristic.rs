//! Fuzz target for the literal-secret heuristic.
//!
//! Goal: classification should **never panic**, and redaction must never
//! reveal the input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_secret_heuristic
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stackguard_domain::rules::secrets::{literal_secret, redact};

#[derive(Arbitrary, Debug)]
struct SecretInput {
    /// Property or environment variable name.
    name: String,
    /// Candidate value.
    value: String,
}

fuzz_target!(|input: SecretInput| {
    if input.name.len() > 256 || input.value.len() > 4096 {
        return;
    }

    let _ = literal_secret(&input.name, &input.value);

    let redacted = redact(&input.value);
    assert!(redacted.chars().all(|c| c == '*'));
});
