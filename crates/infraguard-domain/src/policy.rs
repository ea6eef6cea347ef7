use infraguard_types::EnforcementLevel;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailOn {
    /// Only mandatory violations fail the pass.
    #[default]
    Mandatory,
    /// Any violation fails the pass.
    Advisory,
}

/// Per-rule override resolved from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulePolicy {
    pub enabled: bool,
    /// Replaces the rule's catalog level when set.
    pub level: Option<EnforcementLevel>,
    /// Glob patterns matched against resource names; matching resources are exempt.
    pub allow: Vec<String>,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::enabled()
    }
}

impl RulePolicy {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            level: None,
            allow: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            level: None,
            allow: Vec::new(),
        }
    }

    pub fn at(level: EnforcementLevel) -> Self {
        Self {
            level: Some(level),
            ..Self::enabled()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    /// Rules without an entry run at their catalog level.
    pub rules: BTreeMap<String, RulePolicy>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            fail_on: FailOn::Mandatory,
            rules: BTreeMap::new(),
        }
    }
}

impl EffectiveConfig {
    /// Policy for `rule_name`, or `None` when the rule is disabled.
    pub fn rule_policy(&self, rule_name: &str) -> Option<RulePolicy> {
        match self.rules.get(rule_name) {
            None => Some(RulePolicy::enabled()),
            Some(p) if p.enabled => Some(p.clone()),
            Some(_) => None,
        }
    }
}
