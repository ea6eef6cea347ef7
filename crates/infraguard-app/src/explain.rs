//! The `explain` use case: remediation guidance for a rule name or violation code.

use crate::rules::{RuleSummary, list_rules};
use infraguard_types::explain::{self, Explanation};

/// An identifier resolved against the registry and the explanation table.
#[derive(Clone, Debug)]
pub struct Explained {
    pub identifier: String,
    /// Registry entry owning the identifier; `None` for engine codes such as `rule_fault`.
    pub rule: Option<RuleSummary>,
    /// Codes the owning rule can emit.
    pub codes: &'static [&'static str],
    pub explanation: Explanation,
}

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explained),
    NotFound {
        identifier: String,
        available_rules: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    let Some(explanation) = explain::lookup_explanation(identifier) else {
        return ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rules: explain::all_rule_names(),
            available_codes: explain::all_codes(),
        };
    };

    let owner = explain::owning_rule(identifier);
    let rule = owner.and_then(|name| list_rules().into_iter().find(|r| r.name == name));
    let codes = match owner {
        Some(name) => explain::rule_codes(name),
        None => &[],
    };

    ExplainOutput::Found(Explained {
        identifier: identifier.to_string(),
        rule,
        codes,
        explanation,
    })
}

/// Terminal layout: a header naming the rule and its level, then guidance and a before/after diff.
pub fn format_explanation(explained: &Explained) -> String {
    let exp = &explained.explanation;
    let mut out = String::new();

    match &explained.rule {
        Some(rule) => {
            out.push_str(&format!("{}: {}\n", rule.name, exp.title));
            out.push_str(&format!(
                "  kind: {}  level: {}\n",
                rule.kind,
                rule.level.as_str()
            ));
            out.push_str(&format!("  codes: {}\n", explained.codes.join(", ")));
        }
        None => {
            out.push_str(&format!("{}: {}\n", explained.identifier, exp.title));
            out.push_str("  emitted by the engine for any rule; always advisory\n");
        }
    }

    out.push('\n');
    out.push_str(exp.description);
    out.push_str("\n\nHow to fix:\n");
    out.push_str(exp.remediation);
    out.push_str("\n\nExample:\n");
    for line in exp.examples.before.lines() {
        out.push_str(&format!("- {line}\n"));
    }
    for line in exp.examples.after.lines() {
        out.push_str(&format!("+ {line}\n"));
    }

    out
}

pub fn format_not_found(identifier: &str, rules: &[&'static str], codes: &[&'static str]) -> String {
    format!(
        "Unknown rule or code: {identifier}\n\nAvailable rules:\n{}\nAvailable codes:\n{}",
        bullet_list(rules),
        bullet_list(codes)
    )
}

fn bullet_list(items: &[&str]) -> String {
    items.iter().map(|item| format!("  - {item}\n")).collect()
}
