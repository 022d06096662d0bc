use crate::validate::validate_policy_config;
use crate::{ConfigError, StackguardConfigV1};
use globset::Glob;
use serde_json::{Map, Value};
use stackguard_domain::policies;
use stackguard_domain::policy::{PolicyDefinition, PolicyPack};
use stackguard_domain::taxonomy::{Capability, Taxonomy};
use stackguard_types::{ids, EnforcementLevel};

pub const DEFAULT_PACK_NAME: &str = "stackguard-builtin";

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// Force every policy to this level, after file configuration.
    pub enforcement_level: Option<EnforcementLevel>,
    pub pack_name: Option<String>,
}

/// Build the pack from parsed configuration.
///
/// Precedence for each policy's level: override > policy entry > `all` > policy default.
pub fn resolve_pack(
    cfg: &StackguardConfigV1,
    overrides: &Overrides,
) -> Result<PolicyPack, ConfigError> {
    for name in cfg.policies.keys() {
        if policies::definition(name).is_none() {
            let known: Vec<_> = policies::builtin().iter().map(|d| d.name).collect();
            return Err(ConfigError::UnknownPolicy {
                name: name.clone(),
                known: known.join(", "),
            });
        }
    }

    let all = cfg
        .all
        .as_deref()
        .map(|s| parse_enforcement_level(ids::CONFIG_KEY_ALL, ids::CONFIG_KEY_ALL, s))
        .transpose()?;

    let mut taxonomy = Taxonomy::builtin();
    if let Some(extra) = &cfg.taxonomy {
        if let Some(blank) = extra.taggable.iter().find(|t| t.trim().is_empty()) {
            return Err(ConfigError::schema(
                ids::CONFIG_KEY_TAXONOMY,
                "taggable",
                format!("empty resource type token {blank:?}"),
            ));
        }
        taxonomy.extend(Capability::Tags, &extra.taggable);
    }

    let pack_name = overrides
        .pack_name
        .clone()
        .unwrap_or_else(|| DEFAULT_PACK_NAME.to_string());
    let mut builder =
        PolicyPack::builder(pack_name, env!("CARGO_PKG_VERSION")).taxonomy(taxonomy);

    for def in policies::builtin() {
        let entry = split_entry(def, cfg.policies.get(def.name))?;
        let settings = validate_policy_config(def.name, &(def.schema)(), &entry.settings)?;

        let level = overrides
            .enforcement_level
            .or(entry.level)
            .or(all)
            .unwrap_or(def.default_level);

        tracing::debug!(
            policy = def.name,
            level = level.as_str(),
            keys = settings.len(),
            allow = entry.allow.len(),
            "resolved policy"
        );

        builder = builder.policy((def.build)(&settings), level, entry.allow)?;
    }

    Ok(builder.build())
}

/// A policy entry with the reserved keys pulled out.
struct PolicyEntry {
    level: Option<EnforcementLevel>,
    allow: Vec<String>,
    settings: Map<String, Value>,
}

fn split_entry(def: &PolicyDefinition, raw: Option<&Value>) -> Result<PolicyEntry, ConfigError> {
    let mut entry = PolicyEntry {
        level: None,
        allow: Vec::new(),
        settings: Map::new(),
    };

    match raw {
        None | Some(Value::Null) => {}
        Some(Value::String(level)) => {
            entry.level = Some(parse_enforcement_level(
                def.name,
                ids::CONFIG_KEY_ENFORCEMENT_LEVEL,
                level,
            )?);
        }
        Some(Value::Object(map)) => {
            let mut settings = map.clone();
            if let Some(level) = settings.remove(ids::CONFIG_KEY_ENFORCEMENT_LEVEL) {
                let Some(level) = level.as_str() else {
                    return Err(ConfigError::schema(
                        def.name,
                        ids::CONFIG_KEY_ENFORCEMENT_LEVEL,
                        "expected string",
                    ));
                };
                entry.level = Some(parse_enforcement_level(
                    def.name,
                    ids::CONFIG_KEY_ENFORCEMENT_LEVEL,
                    level,
                )?);
            }
            if let Some(allow) = settings.remove(ids::CONFIG_KEY_ALLOW) {
                entry.allow = parse_allowlist(def.name, &allow)?;
            }
            entry.settings = settings;
        }
        Some(_) => {
            return Err(ConfigError::schema(
                def.name,
                def.name,
                "expected an enforcement level string or an object",
            ));
        }
    }

    Ok(entry)
}

fn parse_allowlist(policy: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
    let invalid = || ConfigError::schema(policy, ids::CONFIG_KEY_ALLOW, "expected array<string>");
    let patterns = value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|p| p.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    for pattern in &patterns {
        Glob::new(pattern).map_err(|e| {
            ConfigError::schema(
                policy,
                ids::CONFIG_KEY_ALLOW,
                format!("invalid glob {pattern:?}: {e}"),
            )
        })?;
    }
    Ok(patterns)
}

/// Parse `disabled | advisory | mandatory`. `policy`/`key` locate the value for errors.
pub fn parse_enforcement_level(
    policy: &str,
    key: &str,
    value: &str,
) -> Result<EnforcementLevel, ConfigError> {
    match value {
        "disabled" => Ok(EnforcementLevel::Disabled),
        "advisory" => Ok(EnforcementLevel::Advisory),
        "mandatory" => Ok(EnforcementLevel::Mandatory),
        other => Err(ConfigError::schema(
            policy,
            key,
            format!("unknown enforcement level: {other} (expected disabled|advisory|mandatory)"),
        )),
    }
}
