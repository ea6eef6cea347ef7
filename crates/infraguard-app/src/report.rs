use anyhow::Context;
use camino::Utf8Path;
use infraguard_render::{
    RenderableData, RenderableLevel, RenderableReport, RenderableVerdict, RenderableViolation,
};
use infraguard_types::{
    EnforcementLevel, InfraguardData, InfraguardReport, SCHEMA_REPORT_V1, ToolMeta, Verdict,
    Violation, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<InfraguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse infraguard report")
}

pub fn serialize_report(report: &InfraguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Write `report` as pretty JSON, creating parent directories.
pub fn write_report(path: &Utf8Path, report: &InfraguardReport) -> anyhow::Result<()> {
    let bytes = serialize_report(report)?;
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))
}

pub fn to_renderable(report: &InfraguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Warn => RenderableVerdict::Warn,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        violations: report.violations.iter().map(renderable_violation).collect(),
        data: RenderableData {
            profile: report.data.profile.clone(),
            pack: report.data.pack.clone(),
            resources_scanned: report.data.resources_scanned,
            violations_total: report.data.violations_total,
            mandatory: report.data.mandatory,
            advisory: report.data.advisory,
            faults: report.data.faults,
        },
    }
}

fn renderable_violation(v: &Violation) -> RenderableViolation {
    RenderableViolation {
        level: match v.enforcement_level {
            EnforcementLevel::Mandatory => RenderableLevel::Mandatory,
            EnforcementLevel::Advisory => RenderableLevel::Advisory,
        },
        rule_name: v.rule_name.clone(),
        code: v.code.clone(),
        message: v.message.clone(),
        resource: v.resource.as_ref().map(|r| r.label()),
        help: v.help.clone(),
    }
}

/// Report written when the tool itself fails (bad input, IO, config).
pub fn runtime_error_report(message: &str, profile: &str) -> InfraguardReport {
    let now = OffsetDateTime::now_utc();
    InfraguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "infraguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        has_blocking_violations: true,
        violations: vec![Violation {
            enforcement_level: EnforcementLevel::Mandatory,
            rule_name: ids::RULE_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            resource: None,
            help: Some("Fix the tool error and re-run infraguard.".to_string()),
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: InfraguardData {
            profile: profile.to_string(),
            pack: ids::POLICY_PACK.to_string(),
            violations_total: 1,
            mandatory: 1,
            ..InfraguardData::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_report_round_trips_through_json() {
        let report = runtime_error_report("read graph.json: No such file", "default");
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");

        assert_eq!(parsed.verdict, Verdict::Fail);
        assert!(parsed.has_blocking_violations);
        assert_eq!(parsed.violations[0].code, ids::CODE_RUNTIME_ERROR);
        assert_eq!(parsed.violations[0].rule_name, ids::RULE_TOOL_RUNTIME);
    }

    #[test]
    fn parse_rejects_foreign_schema() {
        let err = parse_report_json(r#"{ "schema": "other.report.v1" }"#).expect_err("schema");
        assert!(err.to_string().contains("unknown report schema"));
        assert!(parse_report_json("not json").is_err());
    }

    #[test]
    fn renderable_uses_resource_labels() {
        let mut report = runtime_error_report("boom", "strict");
        report.violations[0].resource = Some(infraguard_types::ResourceRef {
            index: 3,
            type_token: "digitalocean:index/volume:Volume".to_string(),
            name: None,
            urn: None,
        });
        let renderable = to_renderable(&report);
        assert_eq!(renderable.verdict, RenderableVerdict::Fail);
        assert_eq!(renderable.violations[0].resource.as_deref(), Some("#3"));
        assert_eq!(renderable.data.profile, "strict");
    }

    #[test]
    fn write_report_creates_parent_dirs() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let path = root.join("artifacts/infraguard/report.json");

        write_report(&path, &runtime_error_report("boom", "default")).expect("write");
        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("\"infraguard.report.v1\""));
    }
}
