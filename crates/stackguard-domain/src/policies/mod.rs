//! Built-in policies.

use crate::policy::PolicyDefinition;
use stackguard_types::{ids, EnforcementLevel};

mod max_cpu;
mod required_tags;

#[cfg(test)]
mod tests;

pub use max_cpu::MaxCpu;
pub use required_tags::RequiredTags;

static BUILTIN: [PolicyDefinition; 2] = [
    PolicyDefinition {
        name: ids::POLICY_REQUIRED_TAGS,
        description: required_tags::DESCRIPTION,
        default_level: EnforcementLevel::Advisory,
        schema: RequiredTags::schema,
        build: RequiredTags::build,
    },
    PolicyDefinition {
        name: ids::POLICY_MAX_CPU,
        description: max_cpu::DESCRIPTION,
        default_level: EnforcementLevel::Mandatory,
        schema: MaxCpu::schema,
        build: MaxCpu::build,
    },
];

/// Built-in policy definitions in pack order.
pub fn builtin() -> &'static [PolicyDefinition] {
    &BUILTIN
}

pub fn definition(name: &str) -> Option<&'static PolicyDefinition> {
    BUILTIN.iter().find(|d| d.name == name)
}
