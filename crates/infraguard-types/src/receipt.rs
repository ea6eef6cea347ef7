use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for infraguard reports.
pub const SCHEMA_REPORT_V1: &str = "infraguard.report.v1";

/// Enforcement level of a rule, and of every violation it emits.
///
/// `Mandatory` is the stricter level: a pass containing one must be treated as failed by the
/// caller. `Advisory` violations are informational only.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementLevel {
    Mandatory,
    Advisory,
}

impl EnforcementLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EnforcementLevel::Mandatory => "mandatory",
            EnforcementLevel::Advisory => "advisory",
        }
    }

    pub fn is_blocking(self) -> bool {
        self == EnforcementLevel::Mandatory
    }
}

/// Points at the resource that triggered a violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceRef {
    /// Position of the resource in the evaluated graph.
    pub index: u32,
    /// Provider type token, e.g. `digitalocean:index/droplet:Droplet`.
    pub type_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
}

impl ResourceRef {
    /// Best human label for the resource: urn, then name, then `#index`.
    pub fn label(&self) -> String {
        if let Some(urn) = &self.urn {
            return urn.clone();
        }
        if let Some(name) = &self.name {
            return name.clone();
        }
        format!("#{}", self.index)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub enforcement_level: EnforcementLevel,
    pub rule_name: String,
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier intended for dedup and trending. A hash of
    /// `rule_name + code + resource identity + salient value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Rule-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Infraguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct InfraguardData {
    pub profile: String,
    pub pack: String,

    pub resources_scanned: u32,
    pub resources_evaluated: u32,
    pub rules_evaluated: u32,

    pub violations_total: u32,
    pub mandatory: u32,
    pub advisory: u32,

    /// Rule faults that were downgraded to advisory diagnostics.
    pub faults: u32,
}

/// Report envelope written by `infraguard check`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = InfraguardData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub has_blocking_violations: bool,
    pub violations: Vec<Violation>,
    pub data: TData,
}

pub type InfraguardReport = ReportEnvelope<InfraguardData>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforcement_level_serializes_lowercase() {
        let s = serde_json::to_string(&EnforcementLevel::Mandatory).expect("serialize");
        assert_eq!(s, "\"mandatory\"");
        let lvl: EnforcementLevel = serde_json::from_str("\"advisory\"").expect("deserialize");
        assert_eq!(lvl, EnforcementLevel::Advisory);
    }

    #[test]
    fn mandatory_is_stricter_than_advisory() {
        assert!(EnforcementLevel::Mandatory < EnforcementLevel::Advisory);
        assert!(EnforcementLevel::Mandatory.is_blocking());
        assert!(!EnforcementLevel::Advisory.is_blocking());
    }

    #[test]
    fn resource_label_prefers_urn_then_name() {
        let mut r = ResourceRef {
            index: 3,
            type_token: "digitalocean:index/volume:Volume".to_string(),
            name: None,
            urn: None,
        };
        assert_eq!(r.label(), "#3");
        r.name = Some("n8n-data".to_string());
        assert_eq!(r.label(), "n8n-data");
        r.urn = Some("urn:pulumi:dev::demo::digitalocean:index/volume:Volume::n8n-data".into());
        assert!(r.label().starts_with("urn:pulumi:"));
    }

    #[test]
    fn violation_omits_empty_optional_fields() {
        let v = Violation {
            enforcement_level: EnforcementLevel::Advisory,
            rule_name: "tag-required".to_string(),
            code: "no_tags".to_string(),
            message: "m".to_string(),
            resource: None,
            help: None,
            fingerprint: None,
            data: JsonValue::Null,
        };
        let json = serde_json::to_value(&v).expect("serialize");
        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("resource"));
        assert!(!obj.contains_key("help"));
        assert!(!obj.contains_key("data"));
    }
}
