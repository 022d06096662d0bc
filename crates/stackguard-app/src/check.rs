//! The `check` use case: load the pack, evaluate descriptors, and produce a report.

use anyhow::Context;
use stackguard_domain::policy::PolicyPack;
use stackguard_settings::Overrides;
use stackguard_types::{StackguardReport, Verdict};
use time::OffsetDateTime;

use crate::input::parse_descriptors;
use crate::report::build_report;
use crate::reporter::{report_violations, Decision, LoggingReporter};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Policy configuration contents (empty string if not found).
    pub config_text: &'a str,
    /// Parse `config_text` as TOML instead of JSON.
    pub config_is_toml: bool,
    /// Resource descriptors as a JSON array or JSON Lines.
    pub resources_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Debug)]
pub struct CheckOutput {
    pub report: StackguardReport,
    /// The pack the descriptors were evaluated against.
    pub pack: PolicyPack,
    pub decision: Decision,
}

/// Run the check use case: load config, parse descriptors, evaluate the pack, produce a report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let pack = stackguard_settings::load_pack(
        input.config_text,
        input.config_is_toml,
        &input.overrides,
    )
    .context("load policy pack")?;
    tracing::debug!(
        pack = pack.name(),
        enabled = pack.enabled().count(),
        "policy pack loaded"
    );

    let resources = parse_descriptors(input.resources_text).context("parse resources")?;
    tracing::debug!(resources = resources.len(), "descriptors parsed");

    let domain = stackguard_domain::evaluate(&pack, &resources).context("evaluate policies")?;

    let mut reporter = LoggingReporter::default();
    let decision = report_violations(&mut reporter, &domain.violations);

    let ended_at = OffsetDateTime::now_utc();
    let report = build_report(domain, started_at, ended_at);
    tracing::debug!(
        verdict = ?report.verdict.status,
        violations = report.violations.len(),
        "evaluation finished"
    );

    Ok(CheckOutput {
        report,
        pack,
        decision,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
