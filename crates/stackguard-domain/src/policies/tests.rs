use super::{builtin, definition, MaxCpu, RequiredTags};
use crate::policy::{Finding, Policy, ResourceFilter};
use crate::schema::{ConfigValue, ValidatedConfig};
use crate::taxonomy::Capability;
use crate::test_support::descriptor;
use serde_json::{json, Value};
use stackguard_types::{ids, EnforcementLevel};

fn run(policy: &dyn Policy, resource_type: &str, properties: Value) -> Vec<Finding> {
    let resource = descriptor(resource_type, "res", properties);
    let mut out = Vec::new();
    policy.evaluate(&resource, &mut out).unwrap();
    out
}

#[test]
fn builtin_definitions_are_in_pack_order() {
    let names: Vec<_> = builtin().iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec![ids::POLICY_REQUIRED_TAGS, ids::POLICY_MAX_CPU]
    );
    assert_eq!(
        definition(ids::POLICY_REQUIRED_TAGS).unwrap().default_level,
        EnforcementLevel::Advisory
    );
    assert_eq!(
        definition(ids::POLICY_MAX_CPU).unwrap().default_level,
        EnforcementLevel::Mandatory
    );
    assert!(definition("nope").is_none());
}

#[test]
fn definitions_build_from_validated_config() {
    let cfg = ValidatedConfig::new().with(
        "requiredTags",
        ConfigValue::StringArray(vec!["Department".into(), "Department".into(), "Owner".into()]),
    );
    let policy = (definition(ids::POLICY_REQUIRED_TAGS).unwrap().build)(&cfg);
    let out = run(policy.as_ref(), "ecs:Cluster", json!({ "tags": {} }));
    assert_eq!(out.len(), 2, "duplicate keys collapse");

    let policy = (definition(ids::POLICY_MAX_CPU).unwrap().build)(&ValidatedConfig::new());
    let out = run(policy.as_ref(), "ecs:TaskDefinition", json!({ "cpu": "99999" }));
    assert!(out.is_empty(), "no limits configured");
}

// --- required-tags ---

#[test]
fn required_tags_targets_taggable_types() {
    assert_eq!(
        RequiredTags::default().filter(),
        ResourceFilter::Capability(Capability::Tags)
    );
}

#[test]
fn required_tags_single_missing_tag() {
    let policy = RequiredTags::new(["Department"]);
    let out = run(&policy, "ecs:Cluster", json!({ "tags": {} }));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, ids::CODE_MISSING_TAG);
    assert!(out[0].message.contains("Department"));
    assert_eq!(out[0].subject, "Department");
}

#[test]
fn required_tags_all_present() {
    let policy = RequiredTags::new(["Department", "Owner"]);
    let out = run(
        &policy,
        "ecs:Cluster",
        json!({ "tags": { "Department": "eng", "Owner": "x" } }),
    );
    assert!(out.is_empty());
}

#[test]
fn required_tags_one_violation_per_missing_key_in_config_order() {
    let policy = RequiredTags::new(["Owner", "Department", "CostCenter"]);
    let out = run(&policy, "aws:s3/bucket:Bucket", json!({ "tags": { "Department": "eng" } }));
    let subjects: Vec<_> = out.iter().map(|f| f.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Owner", "CostCenter"]);
}

#[test]
fn required_tags_empty_and_null_values_count_as_missing() {
    let policy = RequiredTags::new(["A", "B", "C", "D"]);
    let out = run(
        &policy,
        "ecs:Cluster",
        json!({ "tags": { "A": "", "B": "   ", "C": null, "D": 7 } }),
    );
    let subjects: Vec<_> = out.iter().map(|f| f.subject.as_str()).collect();
    assert_eq!(subjects, vec!["A", "B", "C"]);
}

#[test]
fn required_tags_absent_tags_property_is_empty() {
    let policy = RequiredTags::new(["Owner"]);
    assert_eq!(run(&policy, "ecs:Cluster", json!({})).len(), 1);
    assert_eq!(run(&policy, "ecs:Cluster", json!({ "tags": null })).len(), 1);
}

#[test]
fn required_tags_non_mapping_tags_is_single_violation() {
    let policy = RequiredTags::new(["Owner", "Department"]);
    let out = run(&policy, "ecs:Cluster", json!({ "tags": ["Owner=x"] }));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, ids::CODE_INVALID_TAGS);
}

#[test]
fn required_tags_no_required_keys_never_reports() {
    let policy = RequiredTags::default();
    assert!(run(&policy, "ecs:Cluster", json!({ "tags": ["junk"] })).is_empty());
}

// --- max-cpu ---

#[test]
fn max_cpu_targets_task_definitions() {
    let filter = MaxCpu::default().filter();
    let taxonomy = crate::taxonomy::Taxonomy::builtin();
    assert!(filter.matches(
        &crate::model::ResourceType::parse("ecs:TaskDefinition"),
        &taxonomy
    ));
    assert!(!filter.matches(&crate::model::ResourceType::parse("ecs:Cluster"), &taxonomy));
    assert!(!filter.matches(
        &crate::model::ResourceType::parse("aws:ecs/anything:TaskDefinition"),
        &taxonomy
    ));
}

#[test]
fn max_cpu_exceeded_mentions_value_and_limit() {
    let policy = MaxCpu::new(Some(64), None);
    let out = run(&policy, "ecs:TaskDefinition", json!({ "cpu": "128" }));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, ids::CODE_LIMIT_EXCEEDED);
    assert!(out[0].message.contains("128"));
    assert!(out[0].message.contains("64"));
    assert_eq!(out[0].data["limit"], 64);
}

#[test]
fn max_cpu_boundary_is_inclusive() {
    let policy = MaxCpu::new(Some(64), None);
    assert!(run(&policy, "ecs:TaskDefinition", json!({ "cpu": "64" })).is_empty());
    assert!(run(&policy, "ecs:TaskDefinition", json!({ "cpu": "63" })).is_empty());
}

#[test]
fn thresholds_are_independent() {
    let policy = MaxCpu::new(Some(256), Some(512));
    let both = run(
        &policy,
        "ecs:TaskDefinition",
        json!({ "cpu": "1024", "memory": "2048" }),
    );
    assert_eq!(both.len(), 2);
    assert_eq!(both[0].subject, "cpu");
    assert_eq!(both[1].subject, "memory");

    let memory_only = run(
        &policy,
        "ecs:TaskDefinition",
        json!({ "cpu": "256", "memory": "2048" }),
    );
    assert_eq!(memory_only.len(), 1);
    assert_eq!(memory_only[0].subject, "memory");
}

#[test]
fn missing_property_or_unset_limit_is_not_checked() {
    let policy = MaxCpu::new(None, Some(512));
    assert!(run(&policy, "ecs:TaskDefinition", json!({ "cpu": "99999" })).is_empty());
    assert!(run(&policy, "ecs:TaskDefinition", json!({})).is_empty());
    assert!(run(&policy, "ecs:TaskDefinition", json!({ "memory": null })).is_empty());
}

#[test]
fn json_integers_are_accepted() {
    let policy = MaxCpu::new(Some(64), None);
    assert_eq!(run(&policy, "ecs:TaskDefinition", json!({ "cpu": 128 })).len(), 1);
    assert!(run(&policy, "ecs:TaskDefinition", json!({ "cpu": 32 })).is_empty());
}

#[test]
fn unparsable_values_are_reported() {
    let policy = MaxCpu::new(Some(64), Some(512));
    let out = run(
        &policy,
        "ecs:TaskDefinition",
        json!({ "cpu": "1 vCPU", "memory": 0.5 }),
    );
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|f| f.code == ids::CODE_UNPARSABLE_VALUE));
    assert!(out[0].message.contains("1 vCPU"));
}
