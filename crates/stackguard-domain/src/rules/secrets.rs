//! Heuristics for telling secret-store references apart from literal credentials.

use regex::Regex;
use std::sync::LazyLock;

/// Why a value was classified as a literal credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretKind {
    /// The value itself has the shape of a known key format.
    KeyShape(&'static str),
    /// The value is a plain literal stored under a credential-like name.
    CredentialName,
}

impl SecretKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SecretKind::KeyShape(id) => id,
            SecretKind::CredentialName => "credential-name",
        }
    }
}

struct KeyShape {
    id: &'static str,
    pattern: Regex,
    /// Generic blob shapes also match long identifiers, so they only count
    /// when the value looks random.
    needs_randomness: bool,
}

static KEY_SHAPES: LazyLock<Vec<KeyShape>> = LazyLock::new(|| {
    [
        (
            "aws-access-key-id",
            r"^(A3T[A-Z0-9]|AKIA|AGPA|AIDA|AROA|AIPA|ANPA|ANVA|ASIA)[A-Z0-9]{16}$",
        ),
        ("payment-api-key", r"^(sk|pk|rk)_(live|test)_[A-Za-z0-9]{8,}$"),
        ("github-token", r"^gh[pousr]_[A-Za-z0-9]{36}$"),
        ("private-key", r"-----BEGIN [A-Z ]*PRIVATE KEY-----"),
    ]
    .into_iter()
    .map(|(id, p)| (id, p, false))
    .chain([
        ("hex-blob", r"^[0-9a-fA-F]{32,}$", true),
        ("base64-blob", r"^[A-Za-z0-9+/]{40,}={0,2}$", true),
    ])
    .filter_map(|(id, p, needs_randomness)| {
        Regex::new(p).ok().map(|pattern| KeyShape {
            id,
            pattern,
            needs_randomness,
        })
    })
    .collect()
});

static REFERENCES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\{\{resolve:",
        r"^arn:aws[a-z-]*:(secretsmanager|ssm):",
        r"^\$\{[^}]+\}",
        r"^(ssm|secretsmanager|vault):",
    ]
    .into_iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

const CREDENTIAL_NAME_MARKERS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "private_key",
];

/// True when the value points at a secret store instead of holding the secret.
pub fn is_reference(value: &str) -> bool {
    let value = value.trim();
    REFERENCES.iter().any(|re| re.is_match(value))
}

pub fn is_credential_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase().replace('-', "_");
    CREDENTIAL_NAME_MARKERS.iter().any(|m| name.contains(m))
}

pub fn key_shape(value: &str) -> Option<&'static str> {
    let value = value.trim();
    KEY_SHAPES
        .iter()
        .find(|shape| {
            shape.pattern.is_match(value) && (!shape.needs_randomness || looks_random(value))
        })
        .map(|shape| shape.id)
}

/// Digits mixed with letters, and for non-hex values both letter cases with a
/// case change at least every third letter.
///
/// Generated keys switch case about every other letter; identifiers such as
/// `PatientRecordsTableV2` switch only at word boundaries.
fn looks_random(value: &str) -> bool {
    let has_digit = value.bytes().any(|b| b.is_ascii_digit());
    let has_letter = value.bytes().any(|b| b.is_ascii_alphabetic());
    if !has_digit || !has_letter {
        return false;
    }
    if value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return true;
    }

    let letters: Vec<bool> = value
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.is_ascii_uppercase())
        .collect();
    let upper = letters.iter().filter(|u| **u).count();
    if upper == 0 || upper == letters.len() {
        return false;
    }
    let switches = letters.windows(2).filter(|w| w[0] != w[1]).count();
    switches * 3 >= letters.len()
}

/// Classify a named value. Returns `None` for empty values and references.
pub fn literal_secret(name: &str, value: &str) -> Option<SecretKind> {
    if value.trim().is_empty() || is_reference(value) {
        return None;
    }
    if let Some(id) = key_shape(value) {
        return Some(SecretKind::KeyShape(id));
    }
    is_credential_name(name).then_some(SecretKind::CredentialName)
}

/// Mask a secret completely; only a bounded length hint survives.
pub fn redact(value: &str) -> String {
    "*".repeat(value.chars().count().clamp(4, 12))
}
