use crate::model::{ResourceDescriptor, ResourceOp, ResourceType};
use crate::policies::{MaxCpu, RequiredTags};
use crate::policy::{Finding, Policy, PolicyPack, PredicateFault};
use serde_json::Value;
use stackguard_types::{EnforcementLevel, ResourceUrn};

pub fn descriptor(resource_type: &str, name: &str, properties: Value) -> ResourceDescriptor {
    let properties = match properties {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    ResourceDescriptor {
        urn: ResourceUrn::synthesize(resource_type, name),
        resource_type: ResourceType::parse(resource_type),
        name: Some(name.to_string()),
        op: ResourceOp::Create,
        properties,
    }
}

/// The built-in policies at their default levels.
pub fn default_pack(
    required_tags: Vec<&str>,
    max_cpu: Option<i64>,
    max_memory: Option<i64>,
) -> PolicyPack {
    pack_with(vec![
        (
            boxed(RequiredTags::new(required_tags)),
            EnforcementLevel::Advisory,
        ),
        (
            boxed(MaxCpu::new(max_cpu, max_memory)),
            EnforcementLevel::Mandatory,
        ),
    ])
}

pub fn boxed<P: Policy + 'static>(policy: P) -> Box<dyn Policy> {
    Box::new(policy)
}

pub fn pack_with(policies: Vec<(Box<dyn Policy>, EnforcementLevel)>) -> PolicyPack {
    let mut builder = PolicyPack::builder("test", "0.0.0");
    for (policy, level) in policies {
        builder = builder
            .policy(policy, level, Vec::new())
            .expect("test policies have unique names");
    }
    builder.build()
}

/// Emits one finding for every resource it sees.
#[derive(Debug)]
pub struct StaticPolicy {
    name: &'static str,
}

impl StaticPolicy {
    pub fn boxed(name: &'static str) -> Box<dyn Policy> {
        Box::new(Self { name })
    }
}

impl Policy for StaticPolicy {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "always reports"
    }

    fn evaluate(
        &self,
        resource: &ResourceDescriptor,
        out: &mut Vec<Finding>,
    ) -> Result<(), PredicateFault> {
        out.push(Finding {
            code: "static",
            message: format!("{} saw {}", self.name, resource.urn),
            subject: String::new(),
            help: None,
            data: Value::Null,
        });
        Ok(())
    }
}

#[derive(Debug)]
pub struct FaultyPolicy;

impl Policy for FaultyPolicy {
    fn name(&self) -> &str {
        "faulty"
    }

    fn description(&self) -> &str {
        "always faults"
    }

    fn evaluate(
        &self,
        resource: &ResourceDescriptor,
        _out: &mut Vec<Finding>,
    ) -> Result<(), PredicateFault> {
        Err(PredicateFault {
            policy: self.name().to_string(),
            urn: resource.urn.to_string(),
            message: "boom".to_string(),
        })
    }
}
