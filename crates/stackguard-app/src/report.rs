use anyhow::Context;
use stackguard_domain::report::DomainReport;
use stackguard_render::{
    RenderableData, RenderableLevel, RenderableReport, RenderableVerdict, RenderableViolation,
};
use stackguard_types::{
    ids, EnforcementLevel, RunMeta, StackguardData, StackguardReport, ToolMeta, Verdict,
    VerdictCounts, VerdictStatus, Violation, SCHEMA_REPORT_V1,
};
use time::OffsetDateTime;

const TOOL_NAME: &str = "stackguard";

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn run_meta(started_at: OffsetDateTime, ended_at: OffsetDateTime) -> RunMeta {
    let duration_ms = u64::try_from((ended_at - started_at).whole_milliseconds()).unwrap_or(0);
    RunMeta {
        started_at,
        ended_at,
        duration_ms,
    }
}

/// Wrap a domain report in the `stackguard.report.v1` envelope.
pub fn build_report(
    domain: DomainReport,
    started_at: OffsetDateTime,
    ended_at: OffsetDateTime,
) -> StackguardReport {
    let DomainReport {
        verdict,
        violations,
        data,
        counts,
    } = domain;

    let mut reasons = Vec::new();
    if counts.mandatory > 0 {
        reasons.push("mandatory_violations".to_string());
    }
    if counts.advisory > 0 {
        reasons.push("advisory_violations".to_string());
    }

    StackguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: run_meta(started_at, ended_at),
        verdict: VerdictStatus {
            status: verdict,
            counts: VerdictCounts {
                advisory: counts.advisory,
                mandatory: counts.mandatory,
            },
            reasons,
        },
        violations,
        data,
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<StackguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?}");
    }

    serde_json::from_value(value).context("parse stackguard report")
}

pub fn serialize_report(report: &StackguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &StackguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict.status {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Warn => RenderableVerdict::Warn,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        violations: report
            .violations
            .iter()
            .filter_map(renderable_violation)
            .collect(),
        data: RenderableData {
            pack: report.data.pack.clone(),
            resources_scanned: report.data.resources_scanned,
            violations_total: report.data.violations_total,
        },
    }
}

fn renderable_violation(v: &Violation) -> Option<RenderableViolation> {
    let level = match v.enforcement_level {
        EnforcementLevel::Advisory => RenderableLevel::Advisory,
        EnforcementLevel::Mandatory => RenderableLevel::Mandatory,
        EnforcementLevel::Disabled => return None,
    };
    Some(RenderableViolation {
        level,
        policy_name: v.policy_name.clone(),
        code: v.code.clone(),
        message: v.message.clone(),
        urn: v.urn.as_ref().map(|u| u.as_str().to_string()),
        resource_type: v.resource_type.clone(),
        help: v.help.clone(),
    })
}

/// Report emitted when the tool itself failed: verdict `fail`, one `tool.runtime` violation.
pub fn runtime_error_report(message: &str) -> StackguardReport {
    let now = OffsetDateTime::now_utc();
    StackguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: run_meta(now, now),
        verdict: VerdictStatus {
            status: Verdict::Fail,
            counts: VerdictCounts {
                advisory: 0,
                mandatory: 1,
            },
            reasons: vec!["tool_error".to_string()],
        },
        violations: vec![Violation {
            policy_name: ids::POLICY_TOOL_RUNTIME.to_string(),
            enforcement_level: EnforcementLevel::Mandatory,
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            urn: None,
            resource_type: None,
            help: Some("Fix the tool error and re-run stackguard.".to_string()),
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: StackguardData {
            pack: "unknown".to_string(),
            pack_version: String::new(),
            taxonomy_version: stackguard_domain::taxonomy::TAXONOMY_VERSION,
            resources_scanned: 0,
            policies_enabled: 0,
            violations_total: 1,
        },
    }
}
