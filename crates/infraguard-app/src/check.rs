//! The `check` use case: load a resource graph, evaluate the policy pack, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use infraguard_domain::Registry;
use infraguard_settings::{Overrides, ResolvedConfig};
use infraguard_types::{
    InfraguardData, InfraguardReport, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Snapshot file or directory of snapshot files.
    pub graph_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: InfraguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, load the graph, evaluate, produce the report envelope.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        infraguard_settings::InfraguardConfigV1::default()
    } else {
        infraguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = infraguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let snapshot = infraguard_graph::load_snapshot(input.graph_path)
        .with_context(|| format!("load resource graph {}", input.graph_path))?;

    let registry = Registry::builtin();
    let report = infraguard_domain::evaluate_value(&snapshot, &registry, &resolved.effective)
        .context("invalid resource graph")?;

    let has_blocking_violations = report.has_blocking_violations();
    let infraguard_domain::report::PolicyReport {
        violations,
        counts,
        stats,
        verdict,
    } = report;

    tracing::info!(
        verdict = ?verdict,
        violations = violations.len(),
        blocking = has_blocking_violations,
        "check complete"
    );

    let data = InfraguardData {
        profile: resolved.effective.profile.clone(),
        pack: ids::POLICY_PACK.to_string(),
        resources_scanned: stats.resources_scanned,
        resources_evaluated: stats.resources_evaluated,
        rules_evaluated: stats.rules_evaluated,
        violations_total: violations.len() as u32,
        mandatory: counts.mandatory,
        advisory: counts.advisory,
        faults: stats.faults,
    };

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "infraguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        has_blocking_violations,
        violations,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
