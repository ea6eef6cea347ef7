use infraguard_domain::policy::{EffectiveConfig, FailOn, RulePolicy};
use infraguard_types::{EnforcementLevel, explain};
use std::collections::BTreeMap;

/// Known profile names.
pub const PROFILES: &[&str] = &["default", "strict", "audit"];

/// Preset profiles. Unknown names fall back to `default`.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "strict" => uniform("strict", EnforcementLevel::Mandatory),
        "audit" => uniform("audit", EnforcementLevel::Advisory),
        _ => EffectiveConfig::default(),
    }
}

/// Every rule pinned to one level.
fn uniform(profile: &str, level: EnforcementLevel) -> EffectiveConfig {
    let rules: BTreeMap<String, RulePolicy> = explain::all_rule_names()
        .iter()
        .map(|name| (name.to_string(), RulePolicy::at(level)))
        .collect();
    EffectiveConfig {
        profile: profile.to_string(),
        fail_on: FailOn::Mandatory,
        rules,
    }
}
