use super::{Rule, RuleContext, display_number, number_json};
use crate::access::{DnsRecord, RuleFault};
use crate::model::ResourceKind;
use infraguard_types::{EnforcementLevel, Violation, ids};
use serde_json::json;

const MIN_TTL_SECS: f64 = 120.0;
const MAX_TTL_SECS: f64 = 86_400.0;

pub struct DnsTtlReasonable;

impl Rule for DnsTtlReasonable {
    fn name(&self) -> &'static str {
        ids::RULE_DNS_TTL_REASONABLE
    }

    fn description(&self) -> &'static str {
        "DNS TTLs should be reasonable"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::DnsRecord
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        // ttl 0 is Cloudflare's "automatic" and is never flagged.
        let Some(ttl) = DnsRecord::of(ctx.resource).ttl()?.filter(|t| *t != 0.0) else {
            return Ok(());
        };
        let shown = display_number(ttl);
        if ttl < MIN_TTL_SECS {
            out.push(ctx.violation(
                ids::CODE_TTL_TOO_LOW,
                format!(
                    "DNS TTL of {shown} seconds is very low; consider higher values (e.g. 300s) for better performance"
                ),
                "Raise `ttl` to at least 120 seconds.",
                json!({ "ttl": number_json(ttl) }),
            ));
        }
        if ttl > MAX_TTL_SECS {
            out.push(ctx.violation(
                ids::CODE_TTL_TOO_HIGH,
                format!(
                    "DNS TTL of {shown} seconds is very high; changes may take a long time to propagate"
                ),
                "Lower `ttl` to one day (86400 seconds) or less.",
                json!({ "ttl": number_json(ttl) }),
            ));
        }
        Ok(())
    }
}

pub struct DnsProxyConsideration;

impl Rule for DnsProxyConsideration {
    fn name(&self) -> &'static str {
        ids::RULE_DNS_PROXY_CONSIDERATION
    }

    fn description(&self) -> &'static str {
        "Consider the Cloudflare proxy for additional protection"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::DnsRecord
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        let record = DnsRecord::of(ctx.resource);
        if record.record_type()? != Some("A") {
            return Ok(());
        }
        if !record.proxied() {
            out.push(ctx.violation(
                ids::CODE_NOT_PROXIED,
                "A record is not routed through the Cloudflare proxy; consider proxy mode for DDoS protection and WAF features (not suitable for every service, e.g. SSH)".to_string(),
                "Set `proxied: true` for HTTP(S) services.",
                json!({ "record_type": "A", "proxied": false }),
            ));
        }
        Ok(())
    }
}
