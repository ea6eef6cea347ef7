use crate::access::RuleFault;
use crate::graph::{self, InputFault};
use crate::model::{ResourceDescriptor, ResourceGraph};
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::{LevelCounts, PassStats, PolicyReport};
use crate::rules::{Registry, Rule, RuleContext};
use globset::{Glob, GlobSet, GlobSetBuilder};
use infraguard_types::{EnforcementLevel, Verdict, Violation, ids};
use serde_json::{Value, json};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// A rule that survived configuration, with its effective level and allowlist.
struct ActiveRule<'r> {
    rule: &'r dyn Rule,
    level: EnforcementLevel,
    allow: Option<GlobSet>,
}

pub fn evaluate(graph: &ResourceGraph, registry: &Registry, cfg: &EffectiveConfig) -> PolicyReport {
    let active = activate(registry, cfg);

    let mut violations: Vec<Violation> = Vec::new();
    let mut stats = PassStats {
        resources_scanned: graph.len() as u32,
        ..PassStats::default()
    };

    for (index, resource) in graph.resources.iter().enumerate() {
        let mut applicable = 0u32;
        for active_rule in active.iter().filter(|a| a.rule.applies_to(resource.kind)) {
            applicable += 1;
            if is_allowed(active_rule.allow.as_ref(), resource) {
                continue;
            }
            let ctx = RuleContext::new(resource, index, active_rule.rule.name(), active_rule.level);
            match run_rule(active_rule.rule, &ctx) {
                Ok(mut out) => violations.append(&mut out),
                Err(fault) => {
                    tracing::warn!(
                        rule = active_rule.rule.name(),
                        resource = index,
                        error = %fault,
                        "rule fault downgraded to advisory"
                    );
                    stats.faults += 1;
                    violations.push(fault_violation(&ctx, &fault));
                }
            }
        }
        if applicable > 0 {
            stats.resources_evaluated += 1;
        }
        stats.rules_evaluated += applicable;
    }

    let counts = LevelCounts::from_violations(&violations);
    let verdict = compute_verdict(&counts, cfg.fail_on);

    tracing::debug!(
        resources = stats.resources_scanned,
        rules_evaluated = stats.rules_evaluated,
        mandatory = counts.mandatory,
        advisory = counts.advisory,
        faults = stats.faults,
        "policy pass complete"
    );

    PolicyReport {
        violations,
        counts,
        stats,
        verdict,
    }
}

/// Decode `value` into a graph and evaluate it.
pub fn evaluate_value(
    value: &Value,
    registry: &Registry,
    cfg: &EffectiveConfig,
) -> Result<PolicyReport, InputFault> {
    let graph = graph::decode(value)?;
    Ok(evaluate(&graph, registry, cfg))
}

fn activate<'r>(registry: &'r Registry, cfg: &EffectiveConfig) -> Vec<ActiveRule<'r>> {
    registry
        .all_rules()
        .filter_map(|rule| {
            let policy = cfg.rule_policy(rule.name())?;
            Some(ActiveRule {
                rule,
                level: policy.level.unwrap_or_else(|| rule.enforcement_level()),
                allow: build_allowlist(rule.name(), &policy.allow),
            })
        })
        .collect()
}

fn run_rule(rule: &dyn Rule, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleFault> {
    let mut out = Vec::new();
    match catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx, &mut out))) {
        Ok(Ok(())) => Ok(out),
        Ok(Err(fault)) => Err(fault),
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(RuleFault::Panicked(msg))
        }
    }
}

fn fault_violation(ctx: &RuleContext<'_>, fault: &RuleFault) -> Violation {
    let label = ctx.resource.to_ref(ctx.index).label();
    let fault_ctx = RuleContext::new(
        ctx.resource,
        ctx.index,
        ctx.rule_name,
        EnforcementLevel::Advisory,
    );
    fault_ctx.violation(
        ids::CODE_RULE_FAULT,
        format!(
            "rule '{}' could not evaluate resource {label}: {fault}",
            ctx.rule_name
        ),
        "Fix the resource property type; the rule was skipped for this resource.",
        json!({ "fault": fault.to_string() }),
    )
}

fn build_allowlist(rule_name: &str, allow: &[String]) -> Option<GlobSet> {
    if allow.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in allow {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => {
                tracing::warn!(
                    rule = rule_name,
                    pattern = pattern.as_str(),
                    error = %err,
                    "ignoring invalid allow pattern"
                );
            }
        }
    }
    builder.build().ok()
}

fn is_allowed(allow: Option<&GlobSet>, resource: &ResourceDescriptor) -> bool {
    match (allow, resource.match_name()) {
        (Some(set), Some(name)) => set.is_match(name),
        _ => false,
    }
}

fn compute_verdict(counts: &LevelCounts, fail_on: FailOn) -> Verdict {
    if counts.mandatory > 0 {
        return Verdict::Fail;
    }

    if counts.advisory > 0 {
        return match fail_on {
            FailOn::Advisory => Verdict::Fail,
            FailOn::Mandatory => Verdict::Warn,
        };
    }

    Verdict::Pass
}
