//! Per-policy configuration schemas and the typed values they validate into.
//!
//! Validation itself happens at the load boundary (`stackguard-settings`); policies only ever
//! see a `ValidatedConfig`.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    StringArray,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::StringArray => "array<string>",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSchema {
    pub kind: FieldKind,
    /// Inclusive lower bound; only meaningful for `Integer`.
    pub minimum: Option<i64>,
    pub description: &'static str,
}

impl FieldSchema {
    pub fn string(description: &'static str) -> Self {
        Self {
            kind: FieldKind::String,
            minimum: None,
            description,
        }
    }

    pub fn integer(description: &'static str) -> Self {
        Self {
            kind: FieldKind::Integer,
            minimum: None,
            description,
        }
    }

    pub fn string_array(description: &'static str) -> Self {
        Self {
            kind: FieldKind::StringArray,
            minimum: None,
            description,
        }
    }

    pub fn with_minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }
}

/// Recognized configuration keys of one policy. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigSchema {
    fields: BTreeMap<&'static str, FieldSchema>,
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &'static str, schema: FieldSchema) -> Self {
        self.fields.insert(key, schema);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldSchema)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON Schema (draft 7 subset) rendering, for `stackguard policies --json`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (key, field) in self.iter() {
            let mut prop = match field.kind {
                FieldKind::String => json!({ "type": "string" }),
                FieldKind::Integer => json!({ "type": "integer" }),
                FieldKind::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            };
            if let (Some(min), Some(obj)) = (field.minimum, prop.as_object_mut()) {
                obj.insert("minimum".into(), json!(min));
            }
            if let Some(obj) = prop.as_object_mut() {
                obj.insert("description".into(), json!(field.description));
            }
            properties.insert(key.to_string(), prop);
        }
        json!({
            "type": "object",
            "properties": Value::Object(properties),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    StringArray(Vec<String>),
}

/// Configuration for one policy after schema validation. Absent keys are simply missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatedConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl ValidatedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ConfigValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(ConfigValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn string_array(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(ConfigValue::StringArray(v)) => Some(v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
