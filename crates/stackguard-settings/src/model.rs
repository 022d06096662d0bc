use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Policy configuration file, v1.
///
/// Per-policy entries are kept untyped here; each one is validated against its policy's
/// schema during resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StackguardConfigV1 {
    /// Default enforcement level for every policy: `disabled`, `advisory` or `mandatory`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<String>,

    /// Organization-specific capability table additions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<TaxonomyConfig>,

    /// Map of policy name -> enforcement level string or settings object.
    #[serde(flatten)]
    pub policies: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyConfig {
    /// Additional resource type tokens that accept tags.
    #[serde(default)]
    pub taggable: Vec<String>,
}
