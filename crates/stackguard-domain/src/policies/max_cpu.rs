use crate::model::ResourceDescriptor;
use crate::policy::{Finding, Policy, PredicateFault, ResourceFilter};
use crate::schema::{ConfigSchema, FieldSchema, ValidatedConfig};
use serde_json::{json, Value};
use stackguard_types::ids;

pub(crate) const DESCRIPTION: &str = "ECS task definitions must stay within CPU and memory limits.";

pub(crate) const KEY_MAX_CPU: &str = "maxCpu";
pub(crate) const KEY_MAX_MEMORY: &str = "maxMemory";

const TASK_DEFINITION: &str = "aws:ecs/taskDefinition:TaskDefinition";

/// Caps `cpu` and `memory` on ECS task definitions. Unset limits are not checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaxCpu {
    max_cpu: Option<i64>,
    max_memory: Option<i64>,
}

impl MaxCpu {
    pub fn new(max_cpu: Option<i64>, max_memory: Option<i64>) -> Self {
        Self {
            max_cpu,
            max_memory,
        }
    }

    pub fn schema() -> ConfigSchema {
        ConfigSchema::new()
            .field(
                KEY_MAX_CPU,
                FieldSchema::integer("Maximum task `cpu` units (default: unchecked).").with_minimum(1),
            )
            .field(
                KEY_MAX_MEMORY,
                FieldSchema::integer("Maximum task `memory` in MiB (default: unchecked).")
                    .with_minimum(1),
            )
    }

    pub fn build(cfg: &ValidatedConfig) -> Box<dyn Policy> {
        Box::new(Self::new(cfg.integer(KEY_MAX_CPU), cfg.integer(KEY_MAX_MEMORY)))
    }

    fn limits(&self) -> [(&'static str, Option<i64>); 2] {
        [("cpu", self.max_cpu), ("memory", self.max_memory)]
    }
}

impl Policy for MaxCpu {
    fn name(&self) -> &str {
        ids::POLICY_MAX_CPU
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn filter(&self) -> ResourceFilter {
        ResourceFilter::of_type(TASK_DEFINITION)
    }

    fn evaluate(
        &self,
        resource: &ResourceDescriptor,
        out: &mut Vec<Finding>,
    ) -> Result<(), PredicateFault> {
        for (property, limit) in self.limits() {
            let Some(limit) = limit else { continue };
            let Some(raw) = resource.property(property).filter(|v| !v.is_null()) else {
                continue;
            };

            match parse_integer(raw) {
                Some(value) if value > limit => out.push(Finding {
                    code: ids::CODE_LIMIT_EXCEEDED,
                    message: format!(
                        "task definition '{}' exceeds the maximum {}: {} > {}",
                        resource.display_name(),
                        property,
                        value,
                        limit
                    ),
                    subject: property.to_string(),
                    help: Some(format!("Lower `{property}` to at most {limit}.")),
                    data: json!({ "property": property, "value": value, "limit": limit }),
                }),
                Some(_) => {}
                None => out.push(Finding {
                    code: ids::CODE_UNPARSABLE_VALUE,
                    message: format!(
                        "task definition '{}' has a non-integer {} value {}; cannot verify the maximum of {}",
                        resource.display_name(),
                        property,
                        raw,
                        limit
                    ),
                    subject: property.to_string(),
                    help: Some(format!("Express `{property}` as an integer string.")),
                    data: json!({ "property": property, "value": raw, "limit": limit }),
                }),
            }
        }

        Ok(())
    }
}

/// Integer strings (the provider's canonical form) and JSON integers are accepted.
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}
