//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - taxonomy scoping of the required-tags policy
//! - threshold boundary behavior
//! - deterministic, order-stable evaluation

use crate::engine::{evaluate, evaluate_resource};
use crate::taxonomy::{supports_capability, Capability};
use crate::test_support::{default_pack, descriptor};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use stackguard_types::ids;

// ============================================================================
// Strategies
// ============================================================================

fn arb_tag_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Za-z0-9]{0,11}").unwrap()
}

fn arb_tags() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(arb_tag_key(), "[a-z0-9-]{0,8}", 0..6).prop_map(|m| {
        m.into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

/// Type tokens that are not on the taggable allow-list.
fn arb_untaggable_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("aws:ecs/taskDefinition:TaskDefinition".to_string()),
        Just("ecs:TaskDefinition".to_string()),
        Just("aws:iam/rolePolicyAttachment:RolePolicyAttachment".to_string()),
        Just("aws:lb/listener:Listener".to_string()),
        prop::string::string_regex("[a-z]{1,6}:[a-z]{1,6}/[a-z]{1,8}:Zz[A-Za-z]{0,8}").unwrap(),
    ]
    .prop_filter("must not be taggable", |t| {
        !supports_capability(t, Capability::Tags)
    })
}

fn arb_taggable_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("aws:ecs/cluster:Cluster".to_string()),
        Just("ecs:Cluster".to_string()),
        Just("aws:s3/bucket:Bucket".to_string()),
        Just("aws:ec2/vpc:Vpc".to_string()),
        Just("aws:secretsmanager/secret:Secret".to_string()),
    ]
}

fn arb_resource() -> impl Strategy<Value = (String, Map<String, Value>, u32, u32)> {
    (
        prop_oneof![arb_taggable_type(), arb_untaggable_type()],
        arb_tags(),
        0u32..4096,
        0u32..8192,
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn untaggable_types_never_get_tag_violations(
        ty in arb_untaggable_type(),
        tags in arb_tags(),
        required in prop::collection::vec(arb_tag_key(), 0..5),
    ) {
        let pack = default_pack(required.iter().map(String::as_str).collect(), None, None);
        let resource = descriptor(&ty, "r", json!({ "tags": Value::Object(tags) }));
        let violations = evaluate_resource(&pack, &resource).unwrap();
        prop_assert!(violations.iter().all(|v| v.policy_name != ids::POLICY_REQUIRED_TAGS));
    }

    #[test]
    fn taggable_types_report_exactly_the_missing_keys(
        ty in arb_taggable_type(),
        tags in arb_tags(),
        required in prop::collection::btree_set(arb_tag_key(), 0..5),
    ) {
        let required: Vec<String> = required.into_iter().collect();
        let expected: Vec<&String> = required
            .iter()
            .filter(|k| tags.get(*k).and_then(Value::as_str).is_none_or(|v| v.trim().is_empty()))
            .collect();

        let pack = default_pack(required.iter().map(String::as_str).collect(), None, None);
        let resource = descriptor(&ty, "r", json!({ "tags": Value::Object(tags) }));
        let violations = evaluate_resource(&pack, &resource).unwrap();

        let reported: Vec<String> = violations
            .iter()
            .map(|v| v.data["tag"].as_str().unwrap_or_default().to_string())
            .collect();
        prop_assert_eq!(reported.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn cpu_limit_violated_only_on_strict_exceedance(cpu in 0i64..10_000, limit in 1i64..10_000) {
        let pack = default_pack(Vec::new(), Some(limit), None);
        let resource = descriptor("ecs:TaskDefinition", "t", json!({ "cpu": cpu.to_string() }));
        let violations = evaluate_resource(&pack, &resource).unwrap();
        prop_assert_eq!(violations.len(), usize::from(cpu > limit));
    }

    #[test]
    fn evaluation_is_idempotent(
        resources in prop::collection::vec(arb_resource(), 0..12),
        required in prop::collection::vec(arb_tag_key(), 0..4),
        max_cpu in prop::option::of(1i64..4096),
        max_memory in prop::option::of(1i64..8192),
    ) {
        let pack = default_pack(required.iter().map(String::as_str).collect(), max_cpu, max_memory);
        let descriptors: Vec<_> = resources
            .into_iter()
            .enumerate()
            .map(|(i, (ty, tags, cpu, memory))| {
                descriptor(
                    &ty,
                    &format!("r{i}"),
                    json!({ "tags": Value::Object(tags), "cpu": cpu.to_string(), "memory": memory.to_string() }),
                )
            })
            .collect();

        let first = evaluate(&pack, &descriptors).unwrap();
        let second = evaluate(&pack, &descriptors).unwrap();
        prop_assert_eq!(first.violations, second.violations);
        prop_assert_eq!(first.verdict, second.verdict);
    }

    #[test]
    fn stream_result_is_concatenation_of_single_evaluations(
        resources in prop::collection::vec(arb_resource(), 0..8),
    ) {
        let pack = default_pack(vec!["Owner"], Some(512), Some(1024));
        let descriptors: Vec<_> = resources
            .into_iter()
            .enumerate()
            .map(|(i, (ty, tags, cpu, _))| {
                descriptor(&ty, &format!("r{i}"), json!({ "tags": Value::Object(tags), "cpu": cpu.to_string() }))
            })
            .collect();

        let whole = evaluate(&pack, &descriptors).unwrap().violations;
        let piecewise: Vec<_> = descriptors
            .iter()
            .flat_map(|d| evaluate_resource(&pack, d).unwrap())
            .collect();
        prop_assert_eq!(whole, piecewise);
    }
}
