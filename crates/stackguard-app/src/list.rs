//! The `policies` use case: describe every built-in policy and its effective settings.

use serde::Serialize;
use stackguard_domain::policies;
use stackguard_domain::policy::PolicyPack;
use stackguard_types::EnforcementLevel;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyListing {
    pub name: &'static str,
    pub description: &'static str,
    pub default_level: EnforcementLevel,
    /// Level in the loaded pack.
    pub effective_level: EnforcementLevel,
    pub allow: Vec<String>,
    /// JSON Schema of the policy's configuration keys.
    pub config_schema: serde_json::Value,
}

pub fn list_policies(pack: &PolicyPack) -> Vec<PolicyListing> {
    policies::builtin()
        .iter()
        .map(|def| {
            let entry = pack.entry(def.name);
            PolicyListing {
                name: def.name,
                description: def.description,
                default_level: def.default_level,
                effective_level: entry
                    .map(|e| e.level())
                    .unwrap_or(EnforcementLevel::Disabled),
                allow: entry.map(|e| e.allow().to_vec()).unwrap_or_default(),
                config_schema: (def.schema)().to_json_schema(),
            }
        })
        .collect()
}

pub fn format_policies(listings: &[PolicyListing]) -> String {
    let mut out = String::new();
    for (idx, p) in listings.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{} [{}] (default: {})\n  {}\n",
            p.name, p.effective_level, p.default_level, p.description
        ));
        if let Some(props) = p.config_schema.get("properties").and_then(|v| v.as_object()) {
            for (key, field) in props {
                let kind = field.get("type").and_then(|v| v.as_str()).unwrap_or("any");
                out.push_str(&format!("  - {key}: {kind}\n"));
            }
        }
        if !p.allow.is_empty() {
            out.push_str(&format!("  allow: {}\n", p.allow.join(", ")));
        }
    }
    out
}
