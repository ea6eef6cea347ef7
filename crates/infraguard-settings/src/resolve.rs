use crate::{model::InfraguardConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use infraguard_domain::policy::{EffectiveConfig, FailOn, RulePolicy};
use infraguard_types::{EnforcementLevel, explain};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: InfraguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .or(cfg.profile)
        .unwrap_or_else(|| "default".to_string());

    let mut effective = presets::preset(&profile);

    for (rule_name, rc) in cfg.rules.iter() {
        if !explain::all_rule_names().contains(&rule_name.as_str()) {
            anyhow::bail!(
                "unknown rule in config: {rule_name} (known rules: {})",
                explain::all_rule_names().join(", ")
            );
        }

        let entry = effective
            .rules
            .entry(rule_name.clone())
            .or_insert_with(RulePolicy::enabled);

        if let Some(enabled) = rc.enabled {
            entry.enabled = enabled;
        }
        if let Some(level) = rc.level.as_deref() {
            match parse_level(level).with_context(|| format!("invalid level for {rule_name}"))? {
                Some(level) => entry.level = Some(level),
                None => entry.enabled = false,
            }
        }
        if !rc.allow.is_empty() {
            validate_allowlist(rule_name, &rc.allow)?;
            entry.allow = rc.allow.clone();
        }
    }

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { effective })
}

fn validate_allowlist(rule_name: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {rule_name}: {pattern}"))?;
    }
    Ok(())
}

/// `None` means the rule is disabled.
fn parse_level(v: &str) -> anyhow::Result<Option<EnforcementLevel>> {
    match v {
        "mandatory" => Ok(Some(EnforcementLevel::Mandatory)),
        "advisory" => Ok(Some(EnforcementLevel::Advisory)),
        "disabled" => Ok(None),
        other => anyhow::bail!("unknown level: {other} (expected mandatory|advisory|disabled)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "mandatory" => Ok(FailOn::Mandatory),
        "advisory" => Ok(FailOn::Advisory),
        other => anyhow::bail!("unknown fail_on: {other} (expected mandatory|advisory)"),
    }
}
