//! Developer tasks (schema generation, conformance checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use stackguard_app::{CheckInput, runtime_error_report, run_check, serialize_report};
use stackguard_settings::Overrides;
use stackguard_test_util::normalize_nondeterministic;
use stackguard_types::explain;
use std::fs;
use std::path::PathBuf;

/// Workspace root (parent of the xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(PathBuf::from)
        .unwrap_or(manifest_dir)
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "stackguard.report.v1.json",
            generate: || schema_for!(stackguard_types::StackguardReport),
        },
        SchemaSpec {
            filename: "stackguard.config.v1.json",
            generate: || schema_for!(stackguard_settings::StackguardConfigV1),
        },
    ]
}

/// Pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that committed schemas match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for (label, names) in [("Missing schemas:", &missing), ("Schemas out of date:", &mismatched)] {
        if !names.is_empty() {
            eprintln!("{label}");
            for name in names {
                eprintln!("  - {name}");
            }
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

const SAMPLE_CONFIG: &str = r#"{
  "required-tags": { "enforcementLevel": "advisory", "requiredTags": ["Department", "Owner"] },
  "max-cpu": { "enforcementLevel": "mandatory", "maxCpu": 1024, "maxMemory": 2048 }
}"#;

const SAMPLE_RESOURCES: &str = r#"[
  { "type": "aws:ecs/cluster:Cluster", "name": "main", "properties": { "tags": { "Owner": "ops" } } },
  { "type": "aws:s3/bucket:Bucket", "name": "logs", "properties": { "tags": "oops" } },
  { "type": "aws:ecs/taskDefinition:TaskDefinition", "name": "api", "properties": { "cpu": "2048", "memory": "lots" } }
]"#;

fn sample_report() -> anyhow::Result<serde_json::Value> {
    let output = run_check(CheckInput {
        config_text: SAMPLE_CONFIG,
        config_is_toml: false,
        resources_text: SAMPLE_RESOURCES,
        overrides: Overrides::default(),
    })
    .context("run sample check")?;
    let bytes = serialize_report(&output.report)?;
    serde_json::from_slice(&bytes).context("reparse sample report")
}

/// Validate generated reports against the report schema, and check that output is stable.
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(schema_for!(stackguard_types::StackguardReport))
        .context("Failed to serialize report schema")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))?;

    let first = sample_report()?;
    let runtime = serde_json::to_value(runtime_error_report("sample failure"))
        .context("serialize runtime error report")?;

    let mut errors = Vec::new();
    for (name, report) in [("sample", &first), ("runtime_error", &runtime)] {
        for err in validator.iter_errors(report) {
            errors.push(format!("{name}: {err}"));
        }
    }

    let second = sample_report()?;
    if normalize_nondeterministic(first.clone()) != normalize_nondeterministic(second) {
        errors.push("sample: two runs produced different reports".to_string());
    }

    let codes = first["violations"]
        .as_array()
        .map(|vs| vs.iter().filter_map(|v| v["code"].as_str()).collect::<Vec<_>>())
        .unwrap_or_default();
    for code in explain::all_codes() {
        if !codes.contains(code) {
            errors.push(format!("sample: code '{code}' is never exercised"));
        }
    }

    if errors.is_empty() {
        println!("✓ sample and runtime error reports validate against the report schema");
        println!("✓ sample report is deterministic");
        println!("✓ sample exercises all {} codes", explain::all_codes().len());
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Conformance failed with {} errors", errors.len())
    }
}

/// Every built-in policy and every code must have a complete explanation.
fn explain_coverage() -> anyhow::Result<()> {
    let policies: Vec<&str> = stackguard_domain::policies::builtin()
        .iter()
        .map(|d| d.name)
        .collect();
    let codes = explain::all_codes();
    let mut errors = Vec::new();

    for name in &policies {
        if !explain::all_policy_names().contains(name) {
            errors.push(format!("Policy '{name}' is missing from the explain registry"));
        }
    }

    for (kind, ids) in [("Policy", policies.as_slice()), ("Code", codes)] {
        for id in ids {
            match explain::lookup_explanation(id) {
                Some(exp) => {
                    for (field, text) in [
                        ("title", exp.title),
                        ("description", exp.description),
                        ("remediation", exp.remediation),
                    ] {
                        if text.trim().is_empty() {
                            errors.push(format!("{kind} '{id}' has empty {field}"));
                        }
                    }
                }
                None => errors.push(format!("{kind} '{id}' has no explanation")),
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} policies have explanations", policies.len());
        println!("✓ {} codes have explanations", codes.len());
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Explain coverage validation failed with {} errors", errors.len())
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate sample reports against the report schema");
    eprintln!("  explain-coverage  Validate all policies and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
