use crate::model::ResourceDescriptor;
use crate::policy::{Finding, Policy, PredicateFault, ResourceFilter};
use crate::schema::{ConfigSchema, FieldSchema, ValidatedConfig};
use crate::taxonomy::Capability;
use serde_json::{json, Value};
use stackguard_types::ids;

pub(crate) const DESCRIPTION: &str = "Taggable resources must carry every required tag key.";

pub(crate) const KEY_REQUIRED_TAGS: &str = "requiredTags";

/// Every taggable resource must carry each tag in `requiredTags` with a non-empty value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredTags {
    required: Vec<String>,
}

impl RequiredTags {
    /// Duplicate keys collapse to their first occurrence so each missing tag is reported once.
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = Vec::new();
        for key in required {
            let key = key.into();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self { required: keys }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn schema() -> ConfigSchema {
        ConfigSchema::new().field(
            KEY_REQUIRED_TAGS,
            FieldSchema::string_array("Tag keys every taggable resource must carry (default: none)."),
        )
    }

    pub fn build(cfg: &ValidatedConfig) -> Box<dyn Policy> {
        let required = cfg.string_array(KEY_REQUIRED_TAGS).unwrap_or_default();
        Box::new(Self::new(required.iter().cloned()))
    }
}

impl Policy for RequiredTags {
    fn name(&self) -> &str {
        ids::POLICY_REQUIRED_TAGS
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn filter(&self) -> ResourceFilter {
        ResourceFilter::Capability(Capability::Tags)
    }

    fn evaluate(
        &self,
        resource: &ResourceDescriptor,
        out: &mut Vec<Finding>,
    ) -> Result<(), PredicateFault> {
        if self.required.is_empty() {
            return Ok(());
        }

        let empty = serde_json::Map::new();
        let tags = match resource.property("tags") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(other) => {
                out.push(Finding {
                    code: ids::CODE_INVALID_TAGS,
                    message: format!(
                        "resource '{}' has a non-mapping 'tags' property",
                        resource.display_name()
                    ),
                    subject: "tags".to_string(),
                    help: Some("Declare `tags` as a mapping from tag key to value.".to_string()),
                    data: json!({ "tags": other }),
                });
                return Ok(());
            }
        };

        for key in &self.required {
            if has_value(tags.get(key)) {
                continue;
            }
            out.push(Finding {
                code: ids::CODE_MISSING_TAG,
                message: format!(
                    "resource '{}' is missing required tag '{}'",
                    resource.display_name(),
                    key
                ),
                subject: key.clone(),
                help: Some(format!("Add a non-empty '{key}' tag to the resource.")),
                data: json!({ "tag": key }),
            });
        }

        Ok(())
    }
}

fn has_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
