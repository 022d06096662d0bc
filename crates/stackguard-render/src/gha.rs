use crate::{RenderableLevel, RenderableReport};

/// Render violations as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} title={policy}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for v in &report.violations {
        let level = match v.level {
            RenderableLevel::Mandatory => "error",
            RenderableLevel::Advisory => "warning",
        };

        let title = escape_property(&v.policy_name);
        let mut message = format!("[{}:{}] {}", v.policy_name, v.code, v.message);
        if let Some(urn) = &v.urn {
            message.push_str(&format!(" ({urn})"));
        }

        out.push(format!("::{} title={}::{}", level, title, escape_data(&message)));
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
