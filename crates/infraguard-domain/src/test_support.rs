use crate::model::{Properties, PropertyValue, ResourceDescriptor, ResourceGraph};
use crate::policy::{EffectiveConfig, RulePolicy};
use infraguard_types::EnforcementLevel;
use serde_json::Value;

pub const DROPLET: &str = "digitalocean:index/droplet:Droplet";
pub const FIREWALL: &str = "digitalocean:index/firewall:Firewall";
pub const VOLUME: &str = "digitalocean:index/volume:Volume";
pub const DNS_RECORD: &str = "cloudflare:index/dnsRecord:DnsRecord";

pub fn props(value: Value) -> Properties {
    match PropertyValue::from(&value) {
        PropertyValue::Record(props) => props,
        other => panic!("expected a JSON object, got a {}", other.type_name()),
    }
}

pub fn resource(type_token: &str, name: &str, value: Value) -> ResourceDescriptor {
    ResourceDescriptor::new(type_token, props(value)).with_name(name)
}

pub fn droplet(name: &str, value: Value) -> ResourceDescriptor {
    resource(DROPLET, name, value)
}

pub fn firewall(name: &str, value: Value) -> ResourceDescriptor {
    resource(FIREWALL, name, value)
}

pub fn volume(name: &str, value: Value) -> ResourceDescriptor {
    resource(VOLUME, name, value)
}

pub fn dns_record(name: &str, value: Value) -> ResourceDescriptor {
    resource(DNS_RECORD, name, value)
}

pub fn graph(resources: Vec<ResourceDescriptor>) -> ResourceGraph {
    ResourceGraph::new(resources)
}

/// A droplet that passes every compute rule.
pub fn compliant_droplet() -> ResourceDescriptor {
    droplet(
        "n8n-server",
        serde_json::json!({
            "name": "n8n-server",
            "monitoring": true,
            "ipv6": false,
            "sshKeys": ["ab:cd:ef"],
            "tags": ["demo", "n8n"],
            "size": "s-2vcpu-2gb",
        }),
    )
}

pub fn config_with_rule(rule: &str, policy: RulePolicy) -> EffectiveConfig {
    let mut cfg = EffectiveConfig::default();
    cfg.rules.insert(rule.to_string(), policy);
    cfg
}

pub fn config_with_level(rule: &str, level: EnforcementLevel) -> EffectiveConfig {
    config_with_rule(
        rule,
        RulePolicy {
            enabled: true,
            level: Some(level),
            allow: Vec::new(),
        },
    )
}
