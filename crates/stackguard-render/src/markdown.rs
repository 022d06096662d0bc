use crate::{RenderableLevel, RenderableReport, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Stackguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Warn => "WARN",
        RenderableVerdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Pack: `{}`\n- Resources: {}\n- Violations: {}\n\n",
        verdict, report.data.pack, report.data.resources_scanned, report.data.violations_total
    ));

    if report.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");

    for v in &report.violations {
        let level = match v.level {
            RenderableLevel::Advisory => "ADVISORY",
            RenderableLevel::Mandatory => "MANDATORY",
        };

        out.push_str(&format!(
            "- [{}] `{}` / `{}`: {}",
            level, v.policy_name, v.code, v.message
        ));
        if let Some(urn) = &v.urn {
            out.push_str(&format!(" (`{}`)", urn));
        }
        out.push('\n');

        if let Some(help) = &v.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
    }

    out
}
