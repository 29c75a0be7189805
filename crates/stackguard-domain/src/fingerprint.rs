use sha2::{Digest, Sha256};
use stackguard_types::ResourceId;

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - rule_id
/// - resource_id
/// - related resource ids, in emitted order
///
/// Messages and severities are excluded so overrides and rewording keep the
/// fingerprint stable across runs.
pub fn fingerprint_for_finding(
    rule_id: &str,
    resource_id: &ResourceId,
    related: &[ResourceId],
) -> String {
    let mut parts = vec![rule_id, resource_id.as_str()];
    parts.extend(related.iter().map(ResourceId::as_str));
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
