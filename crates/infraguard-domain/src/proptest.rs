//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Totality over arbitrary property bags (faults, never panics)
//! - Idempotence and registry-order independence of the violation set
//! - Resources of unknown kinds never producing violations

use crate::engine::evaluate;
use crate::model::{Properties, PropertyValue, ResourceDescriptor, ResourceGraph};
use crate::policy::EffectiveConfig;
use crate::rules::Registry;
use infraguard_types::{Violation, ids};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

const TYPE_TOKENS: &[&str] = &[
    "digitalocean:index/droplet:Droplet",
    "digitalocean:index/firewall:Firewall",
    "digitalocean:index/volume:Volume",
    "cloudflare:index/dnsRecord:DnsRecord",
    "cloudflare:index/record:Record",
    "digitalocean:index/tag:Tag",
    "pulumi:providers:digitalocean",
];

/// Property names the rules read, mixed with noise.
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(vec![
            "monitoring", "ipv6", "sshKeys", "name", "tags", "size", "inboundRules",
            "outboundRules", "portRange", "sourceAddresses", "destinationAddresses",
            "description", "ttl", "type", "proxied",
        ])
        .prop_map(str::to_string),
        1 => "[a-z][a-zA-Z]{0,10}",
    ]
}

fn arb_leaf() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        Just(PropertyValue::Null),
        any::<bool>().prop_map(PropertyValue::Bool),
        (-1000.0f64..200_000.0).prop_map(PropertyValue::Number),
        prop::sample::select(vec![0.0, 0.5, 1.0, 22.0, 50.0, 100.0, 101.0, 120.0, 86_401.0])
            .prop_map(PropertyValue::Number),
        prop::sample::select(vec![
            "22", "0", "1-65535", "0.0.0.0/0", "::/0", "A", "CNAME", "s-8vcpu-16gb", "backup", "",
        ])
        .prop_map(|s| PropertyValue::String(s.to_string())),
        "[a-zA-Z0-9 ./:-]{0,16}".prop_map(PropertyValue::String),
    ]
}

fn arb_value() -> impl Strategy<Value = PropertyValue> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(PropertyValue::List),
            prop::collection::btree_map(arb_key(), inner, 0..4)
                .prop_map(|m| PropertyValue::Record(m.into_iter().collect())),
        ]
    })
}

fn arb_properties() -> impl Strategy<Value = Properties> {
    prop::collection::btree_map(arb_key(), arb_value(), 0..8)
        .prop_map(|m| m.into_iter().collect())
}

fn arb_resource() -> impl Strategy<Value = ResourceDescriptor> {
    (
        prop::sample::select(TYPE_TOKENS.to_vec()),
        prop::option::of("[a-z][a-z0-9-]{0,12}"),
        arb_properties(),
    )
        .prop_map(|(token, name, props)| {
            let mut resource = ResourceDescriptor::new(token, props);
            resource.name = name;
            resource
        })
}

fn arb_graph() -> impl Strategy<Value = ResourceGraph> {
    prop::collection::vec(arb_resource(), 0..12).prop_map(ResourceGraph::new)
}

fn sorted(mut violations: Vec<Violation>) -> Vec<Violation> {
    violations.sort_by(|a, b| {
        let ai = a.resource.as_ref().map(|r| r.index);
        let bi = b.resource.as_ref().map(|r| r.index);
        ai.cmp(&bi)
            .then_with(|| a.rule_name.cmp(&b.rule_name))
            .then_with(|| a.fingerprint.cmp(&b.fingerprint))
    });
    violations
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every resource/rule pair yields violations or a fault; the pass always completes.
    #[test]
    fn evaluation_is_total(graph in arb_graph()) {
        let registry = Registry::builtin();
        let report = evaluate(&graph, &registry, &EffectiveConfig::default());

        prop_assert_eq!(report.stats.resources_scanned as usize, graph.len());
        for v in &report.violations {
            prop_assert!(registry.get(&v.rule_name).is_some(), "unknown rule {}", v.rule_name);
            let resource = v.resource.as_ref();
            prop_assert!(resource.is_some_and(|r| (r.index as usize) < graph.len()));
            prop_assert!(v.fingerprint.is_some());
        }
        let faults = report.faults().count() as u32;
        prop_assert_eq!(faults, report.stats.faults);
        prop_assert!(report.faults().all(|v| !v.enforcement_level.is_blocking()));
        prop_assert_eq!(
            report.has_blocking_violations(),
            report.counts.mandatory > 0
        );
    }

    /// Two passes over the same graph produce identical reports.
    #[test]
    fn evaluation_is_idempotent(graph in arb_graph()) {
        let registry = Registry::builtin();
        let cfg = EffectiveConfig::default();
        let first = evaluate(&graph, &registry, &cfg);
        let second = evaluate(&graph, &registry, &cfg);
        prop_assert_eq!(first, second);
    }

    /// Shuffling the registry permutes the output but never changes the violation set.
    #[test]
    fn violation_set_is_independent_of_registry_order(
        graph in arb_graph(),
        order in Just((0..14).collect::<Vec<usize>>()).prop_shuffle(),
    ) {
        let cfg = EffectiveConfig::default();
        let baseline = evaluate(&graph, &Registry::builtin(), &cfg);

        let mut slots: Vec<Option<_>> = Registry::builtin().into_rules().into_iter().map(Some).collect();
        let shuffled = Registry::from_rules(order.iter().filter_map(|&i| slots[i].take()).collect());
        prop_assert_eq!(shuffled.len(), 14);
        let permuted = evaluate(&graph, &shuffled, &cfg);

        prop_assert_eq!(sorted(baseline.violations), sorted(permuted.violations));
        prop_assert_eq!(baseline.verdict, permuted.verdict);
    }

    /// Resources whose type token maps to no known kind are never flagged.
    #[test]
    fn other_kinds_produce_no_violations(props in prop::collection::vec(arb_properties(), 0..8)) {
        let graph = ResourceGraph::new(
            props
                .into_iter()
                .map(|p| ResourceDescriptor::new("digitalocean:index/project:Project", p))
                .collect(),
        );
        let report = evaluate(&graph, &Registry::builtin(), &EffectiveConfig::default());
        prop_assert!(report.violations.is_empty());
        prop_assert_eq!(report.stats.rules_evaluated, 0);
    }

    /// Fault violations always carry the rule_fault code and the name of the faulting rule.
    #[test]
    fn faults_name_their_rule(graph in arb_graph()) {
        let report = evaluate(&graph, &Registry::builtin(), &EffectiveConfig::default());
        for v in report.faults() {
            prop_assert_eq!(v.code.as_str(), ids::CODE_RULE_FAULT);
            prop_assert!(v.message.contains(v.rule_name.as_str()));
        }
    }
}
