//! Rule trait and the built-in registry.
//!
//! A rule is a side-effect-free predicate over one resource kind. The registry is a plain table
//! built by [`Registry::builtin`]; the evaluator walks it in declaration order.

use crate::access::RuleFault;
use crate::fingerprint::fingerprint_for_violation;
use crate::model::{ResourceDescriptor, ResourceKind};
use infraguard_types::{EnforcementLevel, Violation};
use serde_json::Value;

mod compute;
mod dns;
mod firewall;
mod volume;

#[cfg(test)]
mod tests;

pub use compute::{
    DropletNamingConvention, Ipv6Disabled, MonitoringRequired, SizeCostAwareness,
    SshKeysRecommended, TagRequired,
};
pub use dns::{DnsProxyConsideration, DnsTtlReasonable};
pub use firewall::{FirewallRuleDocumentation, OutboundRestricted, SshRestricted};
pub use volume::{VolumeBackupStrategy, VolumeMinimumSize, VolumeSizeCostAwareness};

pub trait Rule: Send + Sync {
    /// Unique, kebab-case.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Catalog level; configuration may override it.
    fn enforcement_level(&self) -> EnforcementLevel;

    /// The single resource kind this rule inspects.
    fn kind(&self) -> ResourceKind;

    fn applies_to(&self, kind: ResourceKind) -> bool {
        kind == self.kind()
    }

    /// Append zero or more violations for `ctx.resource`.
    ///
    /// Returning `Err` discards anything pushed during this call.
    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault>;
}

/// What a rule sees while evaluating one resource.
pub struct RuleContext<'a> {
    pub resource: &'a ResourceDescriptor,
    /// Position of the resource in the graph.
    pub index: usize,
    pub rule_name: &'a str,
    /// Effective level for violations emitted by this rule.
    pub level: EnforcementLevel,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        resource: &'a ResourceDescriptor,
        index: usize,
        rule_name: &'a str,
        level: EnforcementLevel,
    ) -> Self {
        Self {
            resource,
            index,
            rule_name,
            level,
        }
    }

    /// Build a violation attributed to the current rule and resource.
    pub fn violation(
        &self,
        code: &str,
        message: String,
        help: &str,
        data: Value,
    ) -> Violation {
        let resource = self.resource.to_ref(self.index);
        let fingerprint = fingerprint_for_violation(self.rule_name, code, &resource, &data);
        Violation {
            enforcement_level: self.level,
            rule_name: self.rule_name.to_string(),
            code: code.to_string(),
            message,
            resource: Some(resource),
            help: Some(help.to_string()),
            fingerprint: Some(fingerprint),
            data,
        }
    }
}

/// The ordered rule table of one policy pack.
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn into_rules(self) -> Vec<Box<dyn Rule>> {
        self.rules
    }

    /// The `heise-security-policies` pack, in catalog order.
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                Box::new(MonitoringRequired),
                Box::new(Ipv6Disabled),
                Box::new(SshKeysRecommended),
                Box::new(SshRestricted),
                Box::new(OutboundRestricted),
                Box::new(VolumeBackupStrategy),
                Box::new(VolumeMinimumSize),
                Box::new(DnsTtlReasonable),
                Box::new(DnsProxyConsideration),
                Box::new(DropletNamingConvention),
                Box::new(TagRequired),
                Box::new(FirewallRuleDocumentation),
                Box::new(SizeCostAwareness),
                Box::new(VolumeSizeCostAwareness),
            ],
        }
    }

    /// Add a rule, replacing any rule of the same name in place.
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        match self.rules.iter().position(|r| r.name() == rule.name()) {
            Some(pos) => self.rules[pos] = rule,
            None => self.rules.push(rule),
        }
        self
    }

    pub fn all_rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.all_rules().find(|r| r.name() == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Render a property number the way it was written: `300`, not `300.0`.
pub(crate) fn display_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// JSON form of a property number, integral when possible.
pub(crate) fn number_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
