//! Fuzz target for the built-in policies with structured inputs.
//!
//! Goal: evaluation never panics, and `required-tags` never reports more violations than
//! there are required keys.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_evaluation
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};
use stackguard_domain::model::{ResourceDescriptor, ResourceOp, ResourceType};
use stackguard_domain::policies::{MaxCpu, RequiredTags};
use stackguard_domain::policy::PolicyPack;
use stackguard_types::{EnforcementLevel, ResourceUrn};

#[derive(Arbitrary, Debug)]
struct EvalInput {
    resource_type: String,
    required: Vec<String>,
    tags: Vec<(String, Option<String>)>,
    cpu: Option<String>,
    max_cpu: Option<i64>,
}

fuzz_target!(|input: EvalInput| {
    if input.required.len() > 16 || input.tags.len() > 32 {
        return;
    }

    let required_count = input.required.len();
    let Ok(builder) = PolicyPack::builder("fuzz", "0").policy(
        Box::new(RequiredTags::new(input.required)),
        EnforcementLevel::Mandatory,
        Vec::new(),
    ) else {
        return;
    };
    let Ok(builder) = builder.policy(
        Box::new(MaxCpu::new(input.max_cpu, None)),
        EnforcementLevel::Mandatory,
        Vec::new(),
    ) else {
        return;
    };
    let pack = builder.build();

    let tags: Map<String, Value> = input
        .tags
        .into_iter()
        .map(|(k, v)| (k, v.map(Value::String).unwrap_or(Value::Null)))
        .collect();
    let mut properties = Map::new();
    properties.insert("tags".to_string(), Value::Object(tags));
    if let Some(cpu) = input.cpu {
        properties.insert("cpu".to_string(), Value::String(cpu));
    }

    let resource = ResourceDescriptor {
        urn: ResourceUrn::synthesize(&input.resource_type, "fuzz"),
        resource_type: ResourceType::parse(&input.resource_type),
        name: None,
        op: ResourceOp::Create,
        properties,
    };

    if let Ok(violations) = stackguard_domain::evaluate_resource(&pack, &resource) {
        let tag_violations = violations
            .iter()
            .filter(|v| v.policy_name == "required-tags")
            .count();
        assert!(tag_violations <= required_count.max(1));
    }
});
