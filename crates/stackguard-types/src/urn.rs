use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identity of one resource instance, used in violations and reports.
///
/// Normalization is deliberately minimal: surrounding whitespace is trimmed and an empty
/// input becomes `urn:stackguard::unknown`, so every violation carries a non-empty identity.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ResourceUrn(String);

impl Default for ResourceUrn {
    fn default() -> Self {
        ResourceUrn::new("")
    }
}

impl ResourceUrn {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let v = s.as_ref().trim();
        if v.is_empty() {
            return Self("urn:stackguard::unknown".to_string());
        }
        Self(v.to_string())
    }

    /// Synthesize a URN for descriptors supplied without one.
    pub fn synthesize(resource_type: &str, name: &str) -> Self {
        ResourceUrn::new(format!("urn:stackguard::{resource_type}::{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing `::`-separated segment, which by convention is the logical name.
    pub fn name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ResourceUrn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
