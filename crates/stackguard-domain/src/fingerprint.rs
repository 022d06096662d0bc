use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation.
///
/// Identity fields:
/// - policy name
/// - code
/// - resource URN
/// - subject (tag key, property name)
pub fn fingerprint_for_violation(policy: &str, code: &str, urn: &str, subject: &str) -> String {
    let canonical = [policy, code, urn, subject].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
