//! The `rules` use case: describe the built-in registry.

use infraguard_domain::Registry;
use infraguard_types::EnforcementLevel;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSummary {
    pub name: &'static str,
    pub kind: &'static str,
    pub level: EnforcementLevel,
    pub description: &'static str,
}

/// Rules of the built-in pack, in declaration order.
pub fn list_rules() -> Vec<RuleSummary> {
    Registry::builtin()
        .all_rules()
        .map(|r| RuleSummary {
            name: r.name(),
            kind: r.kind().as_str(),
            level: r.enforcement_level(),
            description: r.description(),
        })
        .collect()
}

/// One aligned line per rule.
pub fn format_rules(rules: &[RuleSummary]) -> String {
    let name_w = rules.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let kind_w = rules.iter().map(|r| r.kind.len()).max().unwrap_or(0);

    let mut out = String::new();
    for r in rules {
        out.push_str(&format!(
            "{:<name_w$}  {:<kind_w$}  {:<9}  {}\n",
            r.name,
            r.kind,
            r.level.as_str(),
            r.description
        ));
    }
    out
}
