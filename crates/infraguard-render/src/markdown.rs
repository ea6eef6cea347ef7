use crate::{RenderableLevel, RenderableReport, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Infraguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Warn => "WARN",
        RenderableVerdict::Fail => "FAIL",
    };
    let d = &report.data;
    out.push_str(&format!(
        "- Verdict: **{verdict}**\n- Policy pack: `{}` (profile `{}`)\n- Resources scanned: {}\n- Violations: {} ({} mandatory, {} advisory)\n\n",
        d.pack, d.profile, d.resources_scanned, d.violations_total, d.mandatory, d.advisory
    ));

    if d.faults > 0 {
        out.push_str(&format!(
            "> Note: {} rule evaluation(s) faulted on malformed properties and were reported as advisory.\n\n",
            d.faults
        ));
    }

    if report.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");

    for v in &report.violations {
        let level = match v.level {
            RenderableLevel::Mandatory => "MANDATORY",
            RenderableLevel::Advisory => "ADVISORY",
        };

        match &v.resource {
            Some(resource) => out.push_str(&format!(
                "- [{level}] `{}` / `{}`: {} (`{resource}`)\n",
                v.rule_name, v.code, v.message
            )),
            None => out.push_str(&format!(
                "- [{level}] `{}` / `{}`: {}\n",
                v.rule_name, v.code, v.message
            )),
        }

        if let Some(help) = &v.help {
            out.push_str(&format!("  - help: {help}\n"));
        }
    }

    out
}
