use super::Registry;
use crate::engine::evaluate;
use crate::policy::EffectiveConfig;
use crate::report::PolicyReport;
use crate::test_support::{
    DROPLET, compliant_droplet, dns_record, droplet, firewall, graph, resource, volume,
};
use infraguard_types::{EnforcementLevel, Violation, ids};
use serde_json::json;

fn run(resources: Vec<crate::model::ResourceDescriptor>) -> PolicyReport {
    evaluate(
        &graph(resources),
        &Registry::builtin(),
        &EffectiveConfig::default(),
    )
}

fn codes(report: &PolicyReport) -> Vec<&str> {
    report.violations.iter().map(|v| v.code.as_str()).collect()
}

fn by_rule<'a>(report: &'a PolicyReport, rule: &str) -> Vec<&'a Violation> {
    report
        .violations
        .iter()
        .filter(|v| v.rule_name == rule)
        .collect()
}

#[test]
fn builtin_registry_is_in_catalog_order() {
    let names: Vec<&str> = Registry::builtin().all_rules().map(|r| r.name()).collect();
    assert_eq!(names, infraguard_types::explain::all_rule_names());
}

#[test]
fn with_rule_replaces_by_name_in_place() {
    let registry = Registry::builtin().with_rule(Box::new(super::TagRequired));
    assert_eq!(registry.len(), 14);
    assert!(registry.get(ids::RULE_TAG_REQUIRED).is_some());
    assert!(registry.get("no-such-rule").is_none());
}

#[test]
fn compliant_droplet_has_no_violations() {
    let report = run(vec![compliant_droplet()]);
    assert!(report.violations.is_empty(), "{:?}", codes(&report));
}

#[test]
fn scenario_monitoring_disabled_blocks() {
    let report = run(vec![droplet("n8n-server", json!({ "monitoring": false }))]);

    let mandatory: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.enforcement_level == EnforcementLevel::Mandatory)
        .collect();
    assert_eq!(mandatory.len(), 1);
    assert_eq!(mandatory[0].rule_name, ids::RULE_MONITORING_REQUIRED);
    assert!(report.has_blocking_violations());
}

#[test]
fn scenario_ssh_open_to_world_is_advisory() {
    let report = run(vec![firewall(
        "n8n-firewall",
        json!({
            "name": "n8n-firewall",
            "inboundRules": [
                { "protocol": "tcp", "portRange": "22", "sourceAddresses": ["0.0.0.0/0"] },
                { "protocol": "tcp", "portRange": "443", "sourceAddresses": ["0.0.0.0/0", "::/0"] },
            ],
        }),
    )]);

    assert_eq!(codes(&report), vec![ids::CODE_SSH_OPEN_TO_WORLD]);
    let v = &report.violations[0];
    assert_eq!(v.enforcement_level, EnforcementLevel::Advisory);
    assert!(v.message.contains("0.0.0.0/0"));
    assert_eq!(v.data["inbound_rule"], 0);
    assert!(!report.has_blocking_violations());
}

#[test]
fn scenario_volume_below_minimum_embeds_size() {
    let report = run(vec![volume(
        "n8n-data",
        json!({ "size": 0.5, "description": "daily backup via snapshots" }),
    )]);

    assert_eq!(codes(&report), vec![ids::CODE_VOLUME_TOO_SMALL]);
    let v = &report.violations[0];
    assert_eq!(v.enforcement_level, EnforcementLevel::Mandatory);
    assert!(v.message.contains("0.5"));
    assert!(report.has_blocking_violations());
}

#[test]
fn scenario_low_ttl_unproxied_a_record() {
    let report = run(vec![dns_record(
        "n8n-dns",
        json!({ "type": "A", "ttl": 50, "proxied": false }),
    )]);

    assert_eq!(
        codes(&report),
        vec![ids::CODE_TTL_TOO_LOW, ids::CODE_NOT_PROXIED]
    );
    assert!(report.violations[0].message.contains("50 seconds"));
    assert!(
        report
            .violations
            .iter()
            .all(|v| v.enforcement_level == EnforcementLevel::Advisory)
    );
    assert!(!report.has_blocking_violations());
}

#[test]
fn scenario_sloppy_droplet_yields_four_advisories() {
    let report = run(vec![droplet(
        "ab",
        json!({
            "name": "ab",
            "tags": [],
            "sshKeys": [],
            "monitoring": true,
            "ipv6": false,
            "size": "s-8vcpu-16gb",
        }),
    )]);

    assert_eq!(
        codes(&report),
        vec![
            ids::CODE_NO_SSH_KEYS,
            ids::CODE_NAME_TOO_SHORT,
            ids::CODE_NO_TAGS,
            ids::CODE_EXPENSIVE_SIZE,
        ]
    );
    assert_eq!(report.counts.mandatory, 0);
    assert_eq!(report.counts.advisory, 4);
    assert!(report.violations[3].message.contains("s-8vcpu-16gb"));
}

#[test]
fn ipv6_only_fires_when_true() {
    let mut d = compliant_droplet();
    d.properties.insert(
        "ipv6",
        crate::model::PropertyValue::Bool(true),
    );
    let report = run(vec![d]);
    assert_eq!(codes(&report), vec![ids::CODE_IPV6_ENABLED]);
}

#[test]
fn droplet_name_length_counts_characters() {
    let report = run(vec![droplet(
        "umlaut",
        json!({
            "name": "äöü",
            "monitoring": true,
            "sshKeys": ["k"],
            "tags": ["t"],
        }),
    )]);
    assert!(report.violations.is_empty(), "{:?}", codes(&report));
}

#[test]
fn ssh_rule_ignores_restricted_sources_and_other_ports() {
    let report = run(vec![firewall(
        "n8n-firewall",
        json!({
            "name": "n8n-firewall",
            "inboundRules": [
                { "portRange": "22", "sourceAddresses": ["203.0.113.7/32"] },
                { "portRange": "22" },
                { "portRange": "2222", "sourceAddresses": ["::/0"] },
            ],
        }),
    )]);
    assert!(report.violations.is_empty(), "{:?}", codes(&report));
}

#[test]
fn one_violation_per_offending_firewall_rule() {
    let report = run(vec![firewall(
        "juice-shop-firewall",
        json!({
            "name": "juice-shop-firewall",
            "inboundRules": [
                { "portRange": "22", "sourceAddresses": ["0.0.0.0/0"] },
                { "portRange": "22", "sourceAddresses": ["::/0"] },
            ],
            "outboundRules": [
                { "protocol": "tcp", "portRange": "1-65535", "destinationAddresses": ["0.0.0.0/0"] },
                { "protocol": "udp", "portRange": "0", "destinationAddresses": ["0.0.0.0/0"] },
                { "protocol": "tcp", "portRange": "443", "destinationAddresses": ["0.0.0.0/0"] },
            ],
        }),
    )]);

    assert_eq!(by_rule(&report, ids::RULE_SSH_RESTRICTED).len(), 2);
    let outbound = by_rule(&report, ids::RULE_OUTBOUND_RESTRICTED);
    assert_eq!(outbound.len(), 2);
    assert_ne!(outbound[0].fingerprint, outbound[1].fingerprint);
}

#[test]
fn firewall_name_documentation() {
    let report = run(vec![firewall("fw", json!({ "name": "fw" }))]);
    assert_eq!(codes(&report), vec![ids::CODE_UNDOCUMENTED_FIREWALL]);
    assert!(report.violations[0].message.contains("'fw'"));

    let report = run(vec![firewall("fw", json!({}))]);
    assert_eq!(codes(&report), vec![ids::CODE_UNDOCUMENTED_FIREWALL]);
}

#[test]
fn backup_keyword_is_case_insensitive() {
    let report = run(vec![volume(
        "data",
        json!({ "size": 10, "description": "Nightly BACKUP to Spaces" }),
    )]);
    assert!(report.violations.is_empty(), "{:?}", codes(&report));

    let report = run(vec![volume("data", json!({ "size": 10 }))]);
    assert_eq!(codes(&report), vec![ids::CODE_NO_BACKUP_STRATEGY]);
}

#[test]
fn volume_size_boundaries() {
    let described = |size: serde_json::Value| {
        volume("data", json!({ "size": size, "description": "backup: snapshots" }))
    };

    assert!(run(vec![described(json!(1))]).violations.is_empty());
    assert!(run(vec![described(json!(100))]).violations.is_empty());
    assert_eq!(
        codes(&run(vec![described(json!(101))])),
        vec![ids::CODE_LARGE_VOLUME]
    );
    assert!(
        run(vec![volume("data", json!({ "description": "backup" }))])
            .violations
            .is_empty(),
        "absent size is not a violation"
    );
}

#[test]
fn ttl_boundaries_and_automatic_ttl() {
    let record = |ttl: u64| dns_record("dns", json!({ "type": "CNAME", "ttl": ttl }));

    assert!(run(vec![record(0)]).violations.is_empty());
    assert!(run(vec![record(120)]).violations.is_empty());
    assert!(run(vec![record(86_400)]).violations.is_empty());
    assert_eq!(codes(&run(vec![record(119)])), vec![ids::CODE_TTL_TOO_LOW]);

    let high = run(vec![record(86_401)]);
    assert_eq!(codes(&high), vec![ids::CODE_TTL_TOO_HIGH]);
    assert!(high.violations[0].message.contains("86401 seconds"));
}

#[test]
fn proxied_a_records_and_other_types_pass() {
    let report = run(vec![
        dns_record("a", json!({ "type": "A", "ttl": 300, "proxied": true })),
        dns_record("cname", json!({ "type": "CNAME", "ttl": 300 })),
    ]);
    assert!(report.violations.is_empty(), "{:?}", codes(&report));
}

#[test]
fn falsy_monitoring_values_block() {
    for monitoring in [json!(0), json!(""), json!(null), json!(false)] {
        let report = run(vec![droplet(
            "n8n-server",
            json!({
                "name": "n8n-server",
                "monitoring": monitoring,
                "sshKeys": ["k"],
                "tags": ["t"],
            }),
        )]);

        assert_eq!(
            codes(&report),
            vec![ids::CODE_MONITORING_DISABLED],
            "monitoring = {monitoring}"
        );
        assert_eq!(report.violations[0].enforcement_level, EnforcementLevel::Mandatory);
        assert!(report.has_blocking_violations(), "monitoring = {monitoring}");
    }
}

#[test]
fn truthy_flags_of_other_types_do_not_fault() {
    let report = run(vec![
        droplet(
            "n8n-server",
            json!({
                "name": "n8n-server",
                "monitoring": "yes",
                "ipv6": 1,
                "sshKeys": ["k"],
                "tags": ["t"],
            }),
        ),
        dns_record("n8n", json!({ "type": "A", "ttl": 300, "proxied": 1 })),
    ]);

    assert_eq!(codes(&report), vec![ids::CODE_IPV6_ENABLED]);
    assert_eq!(report.stats.faults, 0);
}

#[test]
fn wrong_property_type_becomes_rule_fault() {
    let report = run(vec![droplet(
        "n8n-server",
        json!({
            "name": "n8n-server",
            "monitoring": true,
            "size": 42,
            "sshKeys": ["k"],
            "tags": ["t"],
        }),
    )]);

    assert_eq!(codes(&report), vec![ids::CODE_RULE_FAULT]);
    let v = &report.violations[0];
    assert_eq!(v.rule_name, ids::RULE_SIZE_COST_AWARENESS);
    assert_eq!(v.enforcement_level, EnforcementLevel::Advisory);
    assert!(v.message.contains("size-cost-awareness"));
    assert!(v.message.contains("n8n-server"));
    assert!(!report.has_blocking_violations());
    assert_eq!(report.stats.faults, 1);
}

#[test]
fn fault_in_one_firewall_rule_discards_partial_output() {
    let report = run(vec![firewall(
        "n8n-firewall",
        json!({
            "name": "n8n-firewall",
            "inboundRules": [
                { "portRange": "22", "sourceAddresses": ["0.0.0.0/0"] },
                { "portRange": 22, "sourceAddresses": ["0.0.0.0/0"] },
            ],
        }),
    )]);

    let ssh = by_rule(&report, ids::RULE_SSH_RESTRICTED);
    assert_eq!(ssh.len(), 1);
    assert_eq!(ssh[0].code, ids::CODE_RULE_FAULT);
    assert!(ssh[0].message.contains("inboundRules[1].portRange"));
}

#[test]
fn other_kinds_are_ignored() {
    let report = run(vec![resource(
        "digitalocean:index/project:Project",
        "demo",
        json!({ "monitoring": false, "size": 0 }),
    )]);
    assert!(report.violations.is_empty());
    assert_eq!(report.stats.resources_scanned, 1);
    assert_eq!(report.stats.resources_evaluated, 0);
    assert_eq!(report.stats.rules_evaluated, 0);
}

#[test]
fn violations_follow_resource_then_registry_order() {
    let report = run(vec![
        volume("data", json!({ "size": 0 })),
        droplet("x", json!({ "monitoring": false })),
    ]);

    let indices: Vec<u32> = report
        .violations
        .iter()
        .filter_map(|v| v.resource.as_ref().map(|r| r.index))
        .collect();
    assert!(indices.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        codes(&report),
        vec![
            ids::CODE_NO_BACKUP_STRATEGY,
            ids::CODE_VOLUME_TOO_SMALL,
            ids::CODE_MONITORING_DISABLED,
            ids::CODE_NO_SSH_KEYS,
            ids::CODE_NAME_TOO_SHORT,
            ids::CODE_NO_TAGS,
        ]
    );
    assert_eq!(
        report.violations[2].resource.as_ref().map(|r| r.type_token.as_str()),
        Some(DROPLET)
    );
}
