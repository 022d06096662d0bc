use crate::ConfigError;
use serde_json::{Map, Value};
use stackguard_domain::schema::{ConfigSchema, ConfigValue, FieldKind, ValidatedConfig};

/// Validate one policy's raw settings against its schema.
///
/// Every present key must be declared and match its kind; integers must respect their
/// minimum. `null` counts as absent. The policy substitutes its own defaults for absent keys.
pub fn validate_policy_config(
    policy: &str,
    schema: &ConfigSchema,
    raw: &Map<String, Value>,
) -> Result<ValidatedConfig, ConfigError> {
    let mut out = ValidatedConfig::new();

    for (key, value) in raw {
        let Some(field) = schema.get(key) else {
            let known: Vec<_> = schema.keys().collect();
            return Err(ConfigError::schema(
                policy,
                key,
                format!("unrecognized key (expected one of: {})", known.join(", ")),
            ));
        };

        if value.is_null() {
            continue;
        }

        let mismatch = || {
            ConfigError::schema(
                policy,
                key,
                format!("expected {}, got {}", field.kind.as_str(), json_kind(value)),
            )
        };

        let typed = match field.kind {
            FieldKind::String => ConfigValue::String(value.as_str().ok_or_else(mismatch)?.to_string()),
            FieldKind::Integer => ConfigValue::Integer(value.as_i64().ok_or_else(mismatch)?),
            FieldKind::StringArray => {
                let items = value.as_array().ok_or_else(mismatch)?;
                let strings = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(mismatch)?;
                ConfigValue::StringArray(strings)
            }
        };

        if let (ConfigValue::Integer(n), Some(min)) = (&typed, field.minimum) {
            if *n < min {
                return Err(ConfigError::schema(
                    policy,
                    key,
                    format!("must be >= {min}, got {n}"),
                ));
            }
        }

        out.insert(key.clone(), typed);
    }

    Ok(out)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
