//! Explain registry for policies and codes.
//!
//! Maps policy names and violation codes to human-readable explanations with remediation
//! guidance.

use crate::ids;

/// Explanation entry for a policy or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the policy/code.
    pub title: &'static str,
    /// What the policy does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after resource examples.
    pub examples: ExamplePair,
}

/// Before and after resource descriptor examples (JSON).
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Descriptor that would trigger a violation.
    pub before: &'static str,
    /// Descriptor that passes the policy.
    pub after: &'static str,
}

/// Look up an explanation by policy name or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Policies
        ids::POLICY_REQUIRED_TAGS => Some(explain_required_tags()),
        ids::POLICY_MAX_CPU => Some(explain_max_cpu()),

        // Codes
        ids::CODE_MISSING_TAG => Some(explain_missing_tag()),
        ids::CODE_INVALID_TAGS => Some(explain_invalid_tags()),
        ids::CODE_LIMIT_EXCEEDED => Some(explain_limit_exceeded()),
        ids::CODE_UNPARSABLE_VALUE => Some(explain_unparsable_value()),

        _ => None,
    }
}

/// List all known policy names.
pub fn all_policy_names() -> &'static [&'static str] {
    &[ids::POLICY_REQUIRED_TAGS, ids::POLICY_MAX_CPU]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MISSING_TAG,
        ids::CODE_INVALID_TAGS,
        ids::CODE_LIMIT_EXCEEDED,
        ids::CODE_UNPARSABLE_VALUE,
    ]
}

// --- Policy-level explanations ---

fn explain_required_tags() -> Explanation {
    Explanation {
        title: "Required Tags",
        description: "\
Checks that every taggable resource carries each tag key listed in `requiredTags`.

Only resource types on the taggable allow-list are inspected. Types that are not on the list
are skipped even if they accept a `tags` property; extend the list through
`taxonomy.taggable` in the policy configuration.",
        remediation: "\
Add the missing tag keys with non-empty values to the resource's `tags` mapping, or set
default tags on the provider so every resource inherits them.",
        examples: ExamplePair {
            before: r#"{"type": "aws:ecs/cluster:Cluster", "properties": {"tags": {}}}"#,
            after: r#"{"type": "aws:ecs/cluster:Cluster", "properties": {"tags": {"Department": "eng"}}}"#,
        },
    }
}

fn explain_max_cpu() -> Explanation {
    Explanation {
        title: "Maximum CPU and Memory",
        description: "\
Caps the `cpu` and `memory` reserved by ECS task definitions.

`maxCpu` and `maxMemory` are independent; a task definition can violate either, both, or
neither. A value equal to the limit is compliant.",
        remediation: "\
Lower the task definition's `cpu`/`memory` to the configured limit, or raise the limit in the
policy configuration if the workload genuinely needs it.",
        examples: ExamplePair {
            before: r#"{"type": "aws:ecs/taskDefinition:TaskDefinition", "properties": {"cpu": "4096"}}"#,
            after: r#"{"type": "aws:ecs/taskDefinition:TaskDefinition", "properties": {"cpu": "256"}}"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_missing_tag() -> Explanation {
    Explanation {
        title: "Missing Tag",
        description: "\
A required tag key is absent from the resource's `tags`, or its value is empty.

One violation is reported per missing key so each one can be fixed and tracked separately.",
        remediation: "Add the named tag key with a non-empty value.",
        examples: ExamplePair {
            before: r#"{"tags": {"Owner": "platform"}}"#,
            after: r#"{"tags": {"Owner": "platform", "Department": "eng"}}"#,
        },
    }
}

fn explain_invalid_tags() -> Explanation {
    Explanation {
        title: "Invalid Tags",
        description: "\
The resource's `tags` property is present but is not a key/value mapping, so no required tag
can be proven present.",
        remediation: "Declare `tags` as a mapping from tag key to tag value.",
        examples: ExamplePair {
            before: r#"{"tags": ["Department=eng"]}"#,
            after: r#"{"tags": {"Department": "eng"}}"#,
        },
    }
}

fn explain_limit_exceeded() -> Explanation {
    Explanation {
        title: "Limit Exceeded",
        description: "\
A numeric resource property is strictly greater than the configured maximum.",
        remediation: "Reduce the property to at most the configured limit.",
        examples: ExamplePair {
            before: r#"{"cpu": "128"}   // maxCpu = 64"#,
            after: r#"{"cpu": "64"}    // maxCpu = 64"#,
        },
    }
}

fn explain_unparsable_value() -> Explanation {
    Explanation {
        title: "Unparsable Value",
        description: "\
A property checked against a numeric limit is not an integer, so it cannot be proven
compliant. It is reported instead of being silently accepted.",
        remediation: "Express the property as a plain integer string such as `\"512\"`.",
        examples: ExamplePair {
            before: r#"{"memory": "0.5GB"}"#,
            after: r#"{"memory": "512"}"#,
        },
    }
}
