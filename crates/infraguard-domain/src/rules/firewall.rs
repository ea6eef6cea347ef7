use super::{Rule, RuleContext};
use crate::access::{Firewall, RuleFault};
use crate::model::ResourceKind;
use infraguard_types::{EnforcementLevel, Violation, ids};
use serde_json::json;

const SSH_PORT: &str = "22";
const WORLD: &[&str] = &["0.0.0.0/0", "::/0"];
const ALL_PORTS: &[&str] = &["0", "1-65535"];
const MIN_NAME_CHARS: usize = 5;

pub struct SshRestricted;

impl Rule for SshRestricted {
    fn name(&self) -> &'static str {
        ids::RULE_SSH_RESTRICTED
    }

    fn description(&self) -> &'static str {
        "SSH access should be restricted to known addresses"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Firewall
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        for rule in Firewall::of(ctx.resource).inbound_rules()? {
            if rule.port_range()? != Some(SSH_PORT) {
                continue;
            }
            let Some(sources) = rule.source_addresses()? else {
                continue;
            };
            let open: Vec<&str> = sources
                .iter()
                .copied()
                .filter(|addr| WORLD.contains(addr))
                .collect();
            if open.is_empty() {
                continue;
            }
            out.push(ctx.violation(
                ids::CODE_SSH_OPEN_TO_WORLD,
                format!(
                    "SSH port {SSH_PORT} is open to all addresses ({}); restrict it to known IPs or use a VPN or bastion host",
                    open.join(", ")
                ),
                "Replace 0.0.0.0/0 and ::/0 with the addresses that actually need SSH.",
                json!({
                    "inbound_rule": rule.index,
                    "port_range": SSH_PORT,
                    "source_addresses": sources,
                }),
            ));
        }
        Ok(())
    }
}

pub struct OutboundRestricted;

impl Rule for OutboundRestricted {
    fn name(&self) -> &'static str {
        ids::RULE_OUTBOUND_RESTRICTED
    }

    fn description(&self) -> &'static str {
        "Outbound traffic should be restricted"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Firewall
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        for rule in Firewall::of(ctx.resource).outbound_rules()? {
            let Some(range) = rule.port_range()? else {
                continue;
            };
            if !ALL_PORTS.contains(&range) {
                continue;
            }
            out.push(ctx.violation(
                ids::CODE_OUTBOUND_ALL_PORTS,
                format!(
                    "Outbound rule allows all ports (portRange {range}); consider narrower rules for defense in depth"
                ),
                "List the egress ports the service needs (53, 80, 443, ...).",
                json!({
                    "outbound_rule": rule.index,
                    "port_range": range,
                }),
            ));
        }
        Ok(())
    }
}

pub struct FirewallRuleDocumentation;

impl Rule for FirewallRuleDocumentation {
    fn name(&self) -> &'static str {
        ids::RULE_FIREWALL_RULE_DOCUMENTATION
    }

    fn description(&self) -> &'static str {
        "Firewalls should be documented by a descriptive name"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Firewall
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        let name = Firewall::of(ctx.resource).name()?;
        if name.map_or(0, |n| n.chars().count()) < MIN_NAME_CHARS {
            let message = match name {
                Some(n) => format!(
                    "Firewall name '{n}' is too short; use a name that describes what it protects (min. {MIN_NAME_CHARS} characters)"
                ),
                None => "Firewall should have a name that describes what it protects".to_string(),
            };
            out.push(ctx.violation(
                ids::CODE_UNDOCUMENTED_FIREWALL,
                message,
                "Name the firewall after its purpose, e.g. `n8n-firewall`.",
                json!({ "name": name, "min_chars": MIN_NAME_CHARS }),
            ));
        }
        Ok(())
    }
}
