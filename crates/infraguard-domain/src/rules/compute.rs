use super::{Rule, RuleContext};
use crate::access::{ComputeInstance, RuleFault};
use crate::model::ResourceKind;
use infraguard_types::{EnforcementLevel, Violation, ids};
use serde_json::json;

const EXPENSIVE_SIZES: &[&str] = &[
    "s-8vcpu-16gb",
    "s-8vcpu-32gb",
    "s-16vcpu-64gb",
    "s-24vcpu-128gb",
];

const MIN_NAME_CHARS: usize = 3;

pub struct MonitoringRequired;

impl Rule for MonitoringRequired {
    fn name(&self) -> &'static str {
        ids::RULE_MONITORING_REQUIRED
    }

    fn description(&self) -> &'static str {
        "Droplets must have monitoring enabled"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Mandatory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        if !ComputeInstance::of(ctx.resource).monitoring() {
            out.push(ctx.violation(
                ids::CODE_MONITORING_DISABLED,
                "Droplet must have monitoring enabled for security observability".to_string(),
                "Set `monitoring: true` on the droplet.",
                json!({ "monitoring": false }),
            ));
        }
        Ok(())
    }
}

pub struct Ipv6Disabled;

impl Rule for Ipv6Disabled {
    fn name(&self) -> &'static str {
        ids::RULE_IPV6_DISABLED
    }

    fn description(&self) -> &'static str {
        "IPv6 should be disabled to keep firewall rules simple"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        if ComputeInstance::of(ctx.resource).ipv6() {
            out.push(ctx.violation(
                ids::CODE_IPV6_ENABLED,
                "IPv6 should be disabled to reduce firewall complexity".to_string(),
                "Set `ipv6: false` unless the service needs IPv6 reachability.",
                json!({ "ipv6": true }),
            ));
        }
        Ok(())
    }
}

pub struct SshKeysRecommended;

impl Rule for SshKeysRecommended {
    fn name(&self) -> &'static str {
        ids::RULE_SSH_KEYS_RECOMMENDED
    }

    fn description(&self) -> &'static str {
        "SSH keys are recommended for secure authentication"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        let count = ComputeInstance::of(ctx.resource).ssh_key_count()?;
        if count.unwrap_or(0) == 0 {
            out.push(ctx.violation(
                ids::CODE_NO_SSH_KEYS,
                "SSH keys should be configured; password-based authentication is less secure"
                    .to_string(),
                "Add at least one key ID or fingerprint to `sshKeys`.",
                json!({ "ssh_keys": count.unwrap_or(0) }),
            ));
        }
        Ok(())
    }
}

pub struct DropletNamingConvention;

impl Rule for DropletNamingConvention {
    fn name(&self) -> &'static str {
        ids::RULE_DROPLET_NAMING_CONVENTION
    }

    fn description(&self) -> &'static str {
        "Droplets should have meaningful names"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        let name = ComputeInstance::of(ctx.resource).name()?;
        let chars = name.map_or(0, |n| n.chars().count());
        if chars < MIN_NAME_CHARS {
            let message = match name {
                Some(n) => format!(
                    "Droplet name '{n}' is too short; use a meaningful name (min. {MIN_NAME_CHARS} characters)"
                ),
                None => format!(
                    "Droplet should have a meaningful name (min. {MIN_NAME_CHARS} characters)"
                ),
            };
            out.push(ctx.violation(
                ids::CODE_NAME_TOO_SHORT,
                message,
                "Name droplets after the service they run, e.g. `n8n-server`.",
                json!({ "name": name, "min_chars": MIN_NAME_CHARS }),
            ));
        }
        Ok(())
    }
}

pub struct TagRequired;

impl Rule for TagRequired {
    fn name(&self) -> &'static str {
        ids::RULE_TAG_REQUIRED
    }

    fn description(&self) -> &'static str {
        "Resources should carry tags for organisation"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        if ComputeInstance::of(ctx.resource).tag_count()?.unwrap_or(0) == 0 {
            out.push(ctx.violation(
                ids::CODE_NO_TAGS,
                "Droplet should have tags for organisation and cost tracking, e.g. environment=production, service=n8n".to_string(),
                "Add `tags` such as the environment and service name.",
                json!({ "tags": 0 }),
            ));
        }
        Ok(())
    }
}

pub struct SizeCostAwareness;

impl Rule for SizeCostAwareness {
    fn name(&self) -> &'static str {
        ids::RULE_SIZE_COST_AWARENESS
    }

    fn description(&self) -> &'static str {
        "Warns about large, expensive droplet sizes"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        let Some(size) = ComputeInstance::of(ctx.resource).size()? else {
            return Ok(());
        };
        if EXPENSIVE_SIZES.contains(&size) {
            out.push(ctx.violation(
                ids::CODE_EXPENSIVE_SIZE,
                format!(
                    "Droplet size {size} is relatively expensive; make sure these resources are really needed"
                ),
                "Start with a smaller slug and resize when load demands it.",
                json!({ "size": size }),
            ));
        }
        Ok(())
    }
}
