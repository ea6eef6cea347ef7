//! Structured fuzz target for rule evaluation over arbitrary property bags.
//!
//! Every resource kind gets the same fuzzed properties, so each rule sees values of
//! unexpected types. The pass must complete and every fault must be advisory.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_resource_properties
//! ```

#![no_main]

use arbitrary::Arbitrary;
use infraguard_domain::Registry;
use infraguard_domain::policy::EffectiveConfig;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value, json};

const TYPES: &[&str] = &[
    "digitalocean:index/droplet:Droplet",
    "digitalocean:index/firewall:Firewall",
    "digitalocean:index/volume:Volume",
    "cloudflare:index/record:Record",
];

const KEYS: &[&str] = &[
    "monitoring",
    "ipv6",
    "sshKeys",
    "name",
    "tags",
    "size",
    "inboundRules",
    "outboundRules",
    "description",
    "ttl",
    "type",
    "proxied",
    "portRange",
    "sourceAddresses",
];

#[derive(Arbitrary, Debug)]
enum Prop {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Prop>),
    Record(Vec<(u8, Prop)>),
}

fn to_json(prop: &Prop, depth: u8) -> Value {
    if depth > 4 {
        return Value::Null;
    }
    match prop {
        Prop::Null => Value::Null,
        Prop::Bool(b) => json!(b),
        Prop::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
        Prop::Text(s) => json!(s),
        Prop::List(items) => Value::Array(items.iter().map(|p| to_json(p, depth + 1)).collect()),
        Prop::Record(fields) => Value::Object(record(fields, depth + 1)),
    }
}

fn record(fields: &[(u8, Prop)], depth: u8) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, p)| {
            let key = KEYS[*k as usize % KEYS.len()].to_string();
            (key, to_json(p, depth))
        })
        .collect()
}

fuzz_target!(|fields: Vec<(u8, Prop)>| {
    if fields.len() > 32 {
        return;
    }
    let properties = record(&fields, 0);
    let graph: Vec<Value> = TYPES
        .iter()
        .map(|t| json!({ "type": t, "name": "fuzz", "properties": properties }))
        .collect();

    let registry = Registry::builtin();
    let report =
        infraguard_domain::evaluate_value(&Value::Array(graph), &registry, &EffectiveConfig::default())
            .expect("well-formed graph");
    for v in &report.violations {
        if v.code == "rule_fault" {
            assert_eq!(v.enforcement_level.as_str(), "advisory");
        }
    }
});
