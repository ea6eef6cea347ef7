//! Decoding of resource-graph snapshots.
//!
//! Accepted shapes:
//! - a top-level array of resources
//! - an object with a `resources` array
//!
//! Each resource is an object with a string `type` and an object `properties`; `name` and `urn`
//! are optional strings. Anything else is an [`InputFault`] and nothing is evaluated.

use crate::model::{Properties, PropertyValue, ResourceDescriptor, ResourceGraph};
use serde_json::Value;

/// The graph itself is structurally invalid.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputFault {
    #[error(
        "resource graph must be an array of resources or an object with a `resources` array"
    )]
    NotASequence,
    #[error("resource #{index} is not an object")]
    ResourceNotObject { index: usize },
    #[error("resource #{index} has no `type`")]
    MissingKind { index: usize },
    #[error("resource #{index} has a non-string `type`")]
    InvalidKind { index: usize },
    #[error("resource #{index} has no `properties`")]
    MissingProperties { index: usize },
    #[error("resource #{index} has non-object `properties`")]
    InvalidProperties { index: usize },
}

pub fn decode(value: &Value) -> Result<ResourceGraph, InputFault> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("resources") {
            Some(Value::Array(items)) => items,
            _ => return Err(InputFault::NotASequence),
        },
        _ => return Err(InputFault::NotASequence),
    };

    let resources = items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_resource(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResourceGraph::new(resources))
}

fn decode_resource(index: usize, item: &Value) -> Result<ResourceDescriptor, InputFault> {
    let obj = item
        .as_object()
        .ok_or(InputFault::ResourceNotObject { index })?;

    let type_token = match obj.get("type") {
        None | Some(Value::Null) => return Err(InputFault::MissingKind { index }),
        Some(Value::String(s)) => s,
        Some(_) => return Err(InputFault::InvalidKind { index }),
    };

    let properties: Properties = match obj.get("properties") {
        None | Some(Value::Null) => return Err(InputFault::MissingProperties { index }),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), PropertyValue::from(v)))
            .collect(),
        Some(_) => return Err(InputFault::InvalidProperties { index }),
    };

    let mut resource = ResourceDescriptor::new(type_token.as_str(), properties);
    resource.name = obj.get("name").and_then(Value::as_str).map(str::to_string);
    resource.urn = obj.get("urn").and_then(Value::as_str).map(str::to_string);
    Ok(resource)
}

/// Inverse of [`decode`]: the canonical `{"resources": [...]}` form.
pub fn encode(graph: &ResourceGraph) -> Value {
    let resources = graph
        .resources
        .iter()
        .map(|r| {
            let mut obj = serde_json::Map::new();
            obj.insert("type".into(), Value::String(r.type_token.clone()));
            if let Some(name) = &r.name {
                obj.insert("name".into(), Value::String(name.clone()));
            }
            if let Some(urn) = &r.urn {
                obj.insert("urn".into(), Value::String(urn.clone()));
            }
            obj.insert("properties".into(), r.properties.to_json());
            Value::Object(obj)
        })
        .collect();
    serde_json::json!({ "resources": Value::Array(resources) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceKind;
    use serde_json::json;

    #[test]
    fn decodes_bare_array_and_wrapped_object() {
        let resource = json!({
            "type": "digitalocean:index/volume:Volume",
            "name": "n8n-data",
            "properties": { "size": 25 }
        });
        let bare = decode(&json!([resource.clone()])).expect("bare array");
        let wrapped = decode(&json!({ "resources": [resource] })).expect("wrapped");
        assert_eq!(bare, wrapped);
        assert_eq!(bare.resources[0].kind, ResourceKind::Volume);
        assert_eq!(bare.resources[0].name.as_deref(), Some("n8n-data"));
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = decode(&json!([])).expect("empty");
        assert!(graph.is_empty());
    }

    #[test]
    fn structural_faults_name_the_resource() {
        assert_eq!(decode(&json!("nope")), Err(InputFault::NotASequence));
        assert_eq!(decode(&json!({ "steps": [] })), Err(InputFault::NotASequence));
        assert_eq!(
            decode(&json!([{ "type": "x", "properties": {} }, 42])),
            Err(InputFault::ResourceNotObject { index: 1 })
        );
        assert_eq!(
            decode(&json!([{ "properties": {} }])),
            Err(InputFault::MissingKind { index: 0 })
        );
        assert_eq!(
            decode(&json!([{ "type": 7, "properties": {} }])),
            Err(InputFault::InvalidKind { index: 0 })
        );
        assert_eq!(
            decode(&json!([{ "type": "x" }])),
            Err(InputFault::MissingProperties { index: 0 })
        );
        assert_eq!(
            decode(&json!([{ "type": "x", "properties": [] }])),
            Err(InputFault::InvalidProperties { index: 0 })
        );
    }

    #[test]
    fn encode_is_accepted_by_decode() {
        let graph = decode(&json!([{
            "type": "cloudflare:index/dnsRecord:DnsRecord",
            "urn": "urn:pulumi:dev::demo::cloudflare:index/dnsRecord:DnsRecord::n8n-dns",
            "properties": { "type": "A", "ttl": 300, "proxied": false }
        }]))
        .expect("decode");
        assert_eq!(decode(&encode(&graph)).expect("re-decode"), graph);
    }
}
