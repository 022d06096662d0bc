//! The `explain` use case: look up policy/code documentation.

use stackguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; includes available policy names and codes.
    NotFound {
        identifier: String,
        available_policies: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a policy name or violation code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_policies: explain::all_policy_names(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\nRemediation\n-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\nExamples\n--------\n\n");
    for (label, body) in [
        ("Before (violation):", exp.examples.before),
        ("After (compliant):", exp.examples.after),
    ] {
        out.push_str(label);
        out.push_str("\n```json\n");
        out.push_str(body);
        out.push_str("\n```\n\n");
    }
    out.truncate(out.trim_end().len());
    out.push('\n');

    out
}

pub fn format_not_found(identifier: &str, policies: &[&str], codes: &[&str]) -> String {
    let mut out = format!("Unknown policy or code: {identifier}\n\nAvailable policies:\n");
    for name in policies {
        out.push_str(&format!("  - {name}\n"));
    }
    out.push_str("\nAvailable codes:\n");
    for code in codes {
        out.push_str(&format!("  - {code}\n"));
    }
    out
}
