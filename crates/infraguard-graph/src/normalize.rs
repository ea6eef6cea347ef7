use serde_json::{Map, Value, json};

/// Snapshot formats understood by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `[...]` or `{"resources": [...]}`, already in engine shape.
    Graph,
    /// `pulumi preview --json`.
    PulumiPreview,
    /// `pulumi stack export`.
    PulumiExport,
}

impl SnapshotFormat {
    pub fn detect(value: &Value) -> Option<Self> {
        match value {
            Value::Array(_) => Some(SnapshotFormat::Graph),
            Value::Object(obj) => {
                if obj.get("resources").is_some_and(Value::is_array) {
                    Some(SnapshotFormat::Graph)
                } else if obj.get("steps").is_some_and(Value::is_array) {
                    Some(SnapshotFormat::PulumiPreview)
                } else if obj
                    .get("deployment")
                    .and_then(|d| d.get("resources"))
                    .is_some_and(Value::is_array)
                {
                    Some(SnapshotFormat::PulumiExport)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotFormat::Graph => "graph",
            SnapshotFormat::PulumiPreview => "pulumi-preview",
            SnapshotFormat::PulumiExport => "pulumi-export",
        }
    }
}

/// Flatten a snapshot into engine-shaped resource values.
///
/// Returns `None` when the format is not recognised. Resources are passed through without
/// validation; structural problems surface later as input faults.
pub fn normalize(value: &Value) -> Option<Vec<Value>> {
    let format = SnapshotFormat::detect(value)?;
    let resources = match format {
        SnapshotFormat::Graph => match value {
            Value::Array(items) => items.clone(),
            _ => value["resources"].as_array().cloned().unwrap_or_default(),
        },
        SnapshotFormat::PulumiPreview => value["steps"]
            .as_array()
            .map(|steps| steps.iter().filter_map(from_preview_step).collect())
            .unwrap_or_default(),
        SnapshotFormat::PulumiExport => value["deployment"]["resources"]
            .as_array()
            .map(|items| items.iter().map(from_state).collect())
            .unwrap_or_default(),
    };
    Some(resources)
}

fn from_preview_step(step: &Value) -> Option<Value> {
    if step.get("op").and_then(Value::as_str) == Some("delete") {
        return None;
    }
    let state = step.get("newState").filter(|s| s.is_object())?;
    Some(from_state(state))
}

/// Convert one Pulumi resource state (`type`, `urn`, `inputs`/`outputs`) to engine shape.
fn from_state(state: &Value) -> Value {
    let mut obj = Map::new();
    if let Some(t) = state.get("type") {
        obj.insert("type".into(), t.clone());
    }
    if let Some(urn) = state.get("urn").and_then(Value::as_str) {
        obj.insert("urn".into(), json!(urn));
        if let Some(name) = name_from_urn(urn) {
            obj.insert("name".into(), json!(name));
        }
    }
    let properties = state
        .get("inputs")
        .filter(|v| v.is_object())
        .or_else(|| state.get("outputs").filter(|v| v.is_object()))
        .cloned()
        .unwrap_or_else(|| json!({}));
    obj.insert("properties".into(), properties);
    Value::Object(obj)
}

/// Logical name: the last `::` segment of a Pulumi URN.
pub fn name_from_urn(urn: &str) -> Option<&str> {
    urn.rsplit("::").next().filter(|s| !s.is_empty() && *s != urn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urn_name_is_last_segment() {
        assert_eq!(
            name_from_urn("urn:pulumi:dev::n8n::digitalocean:index/droplet:Droplet::n8n-server"),
            Some("n8n-server")
        );
        assert_eq!(name_from_urn("not-a-urn"), None);
    }

    #[test]
    fn preview_skips_deletes_and_steps_without_new_state() {
        let preview = json!({
            "steps": [
                { "op": "create", "newState": {
                    "type": "digitalocean:index/volume:Volume",
                    "urn": "urn:pulumi:dev::n8n::digitalocean:index/volume:Volume::n8n-data",
                    "inputs": { "size": 25 }
                }},
                { "op": "delete", "oldState": { "type": "digitalocean:index/tag:Tag" },
                  "newState": { "type": "digitalocean:index/tag:Tag", "inputs": {} } },
                { "op": "same" }
            ]
        });
        assert_eq!(SnapshotFormat::detect(&preview), Some(SnapshotFormat::PulumiPreview));
        let resources = normalize(&preview).expect("preview");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0]["name"], "n8n-data");
        assert_eq!(resources[0]["properties"]["size"], 25);
    }

    #[test]
    fn export_falls_back_to_outputs() {
        let export = json!({
            "version": 3,
            "deployment": { "resources": [
                { "type": "cloudflare:index/record:Record",
                  "urn": "urn:pulumi:dev::n8n::cloudflare:index/record:Record::n8n-dns",
                  "outputs": { "type": "A", "ttl": 1, "proxied": true } },
                { "type": "pulumi:providers:digitalocean",
                  "urn": "urn:pulumi:dev::n8n::pulumi:providers:digitalocean::default" }
            ]}
        });
        let resources = normalize(&export).expect("export");
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0]["properties"]["ttl"], 1);
        assert_eq!(resources[1]["properties"], json!({}));
    }

    #[test]
    fn graph_shapes_pass_through() {
        let items = json!([{ "type": "x", "properties": {} }]);
        assert_eq!(normalize(&items), Some(vec![json!({ "type": "x", "properties": {} })]));
        assert_eq!(normalize(&json!({ "resources": [] })), Some(vec![]));
        assert_eq!(normalize(&json!({ "unrelated": true })), None);
        assert_eq!(normalize(&json!(42)), None);
    }
}
