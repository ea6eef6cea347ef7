use infraguard_types::ResourceRef;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation.
///
/// Identity fields:
/// - rule_name
/// - code
/// - resource identity (urn, else name, else `type_token#index`)
/// - salient value (the violation's `data` payload)
pub fn fingerprint_for_violation(
    rule_name: &str,
    code: &str,
    resource: &ResourceRef,
    data: &Value,
) -> String {
    let identity = match (&resource.urn, &resource.name) {
        (Some(urn), _) => urn.clone(),
        (None, Some(name)) => name.clone(),
        (None, None) => format!("{}#{}", resource.type_token, resource.index),
    };
    let salient = data.to_string();
    let canonical = [rule_name, code, identity.as_str(), salient.as_str()].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: &str, index: u32) -> ResourceRef {
        ResourceRef {
            index,
            type_token: "digitalocean:index/volume:Volume".to_string(),
            name: Some(name.to_string()),
            urn: None,
        }
    }

    #[test]
    fn stable_across_graph_positions_for_named_resources() {
        let data = json!({ "size": 250 });
        let a = fingerprint_for_violation("r", "c", &named("vol", 0), &data);
        let b = fingerprint_for_violation("r", "c", &named("vol", 7), &data);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn differs_by_salient_value() {
        let a = fingerprint_for_violation("r", "c", &named("vol", 0), &json!({ "size": 250 }));
        let b = fingerprint_for_violation("r", "c", &named("vol", 0), &json!({ "size": 500 }));
        assert_ne!(a, b);
    }
}
