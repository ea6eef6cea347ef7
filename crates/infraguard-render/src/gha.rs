use crate::{RenderableLevel, RenderableReport};

/// Render violations as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} title={rule_name}::{resource}: [{rule_name}:{code}] {message}`
///
/// Mandatory violations become `error`, advisory ones `warning`.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    report
        .violations
        .iter()
        .map(|v| {
            let level = match v.level {
                RenderableLevel::Mandatory => "error",
                RenderableLevel::Advisory => "warning",
            };

            let prefix = v
                .resource
                .as_deref()
                .map(|r| format!("{r}: "))
                .unwrap_or_default();
            let message = escape_data(&format!(
                "{prefix}[{}:{}] {}",
                v.rule_name, v.code, v.message
            ));

            format!(
                "::{level} title={}::{message}",
                escape_property(&format!("infraguard {}", v.rule_name))
            )
        })
        .collect()
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
