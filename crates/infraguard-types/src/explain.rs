//! Explain registry for rules and codes.
//!
//! Maps rule names and violation codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/code.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after resource declarations.
    pub examples: ExamplePair,
}

/// Before and after resource declarations.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Declaration that would trigger a violation.
    pub before: &'static str,
    /// Declaration that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule name or code.
///
/// Codes resolve to the explanation of the rule that emits them.
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_MONITORING_REQUIRED | ids::CODE_MONITORING_DISABLED => {
            Some(explain_monitoring_required())
        }
        ids::RULE_IPV6_DISABLED | ids::CODE_IPV6_ENABLED => Some(explain_ipv6_disabled()),
        ids::RULE_SSH_KEYS_RECOMMENDED | ids::CODE_NO_SSH_KEYS => {
            Some(explain_ssh_keys_recommended())
        }
        ids::RULE_SSH_RESTRICTED | ids::CODE_SSH_OPEN_TO_WORLD => Some(explain_ssh_restricted()),
        ids::RULE_OUTBOUND_RESTRICTED | ids::CODE_OUTBOUND_ALL_PORTS => {
            Some(explain_outbound_restricted())
        }
        ids::RULE_VOLUME_BACKUP_STRATEGY | ids::CODE_NO_BACKUP_STRATEGY => {
            Some(explain_volume_backup_strategy())
        }
        ids::RULE_VOLUME_MINIMUM_SIZE | ids::CODE_VOLUME_TOO_SMALL => {
            Some(explain_volume_minimum_size())
        }
        ids::RULE_DNS_TTL_REASONABLE | ids::CODE_TTL_TOO_LOW | ids::CODE_TTL_TOO_HIGH => {
            Some(explain_dns_ttl_reasonable())
        }
        ids::RULE_DNS_PROXY_CONSIDERATION | ids::CODE_NOT_PROXIED => {
            Some(explain_dns_proxy_consideration())
        }
        ids::RULE_DROPLET_NAMING_CONVENTION | ids::CODE_NAME_TOO_SHORT => {
            Some(explain_droplet_naming_convention())
        }
        ids::RULE_TAG_REQUIRED | ids::CODE_NO_TAGS => Some(explain_tag_required()),
        ids::RULE_FIREWALL_RULE_DOCUMENTATION | ids::CODE_UNDOCUMENTED_FIREWALL => {
            Some(explain_firewall_rule_documentation())
        }
        ids::RULE_SIZE_COST_AWARENESS | ids::CODE_EXPENSIVE_SIZE => {
            Some(explain_size_cost_awareness())
        }
        ids::RULE_VOLUME_SIZE_COST_AWARENESS | ids::CODE_LARGE_VOLUME => {
            Some(explain_volume_size_cost_awareness())
        }
        ids::CODE_RULE_FAULT => Some(explain_rule_fault()),
        _ => None,
    }
}

/// Codes a rule can emit. Empty for unknown rule names.
pub fn rule_codes(rule_name: &str) -> &'static [&'static str] {
    match rule_name {
        ids::RULE_MONITORING_REQUIRED => &[ids::CODE_MONITORING_DISABLED],
        ids::RULE_IPV6_DISABLED => &[ids::CODE_IPV6_ENABLED],
        ids::RULE_SSH_KEYS_RECOMMENDED => &[ids::CODE_NO_SSH_KEYS],
        ids::RULE_SSH_RESTRICTED => &[ids::CODE_SSH_OPEN_TO_WORLD],
        ids::RULE_OUTBOUND_RESTRICTED => &[ids::CODE_OUTBOUND_ALL_PORTS],
        ids::RULE_VOLUME_BACKUP_STRATEGY => &[ids::CODE_NO_BACKUP_STRATEGY],
        ids::RULE_VOLUME_MINIMUM_SIZE => &[ids::CODE_VOLUME_TOO_SMALL],
        ids::RULE_DNS_TTL_REASONABLE => &[ids::CODE_TTL_TOO_LOW, ids::CODE_TTL_TOO_HIGH],
        ids::RULE_DNS_PROXY_CONSIDERATION => &[ids::CODE_NOT_PROXIED],
        ids::RULE_DROPLET_NAMING_CONVENTION => &[ids::CODE_NAME_TOO_SHORT],
        ids::RULE_TAG_REQUIRED => &[ids::CODE_NO_TAGS],
        ids::RULE_FIREWALL_RULE_DOCUMENTATION => &[ids::CODE_UNDOCUMENTED_FIREWALL],
        ids::RULE_SIZE_COST_AWARENESS => &[ids::CODE_EXPENSIVE_SIZE],
        ids::RULE_VOLUME_SIZE_COST_AWARENESS => &[ids::CODE_LARGE_VOLUME],
        _ => &[],
    }
}

/// Resolve a rule name or code to the rule it belongs to.
///
/// `rule_fault` is emitted by the engine on behalf of any rule, so it resolves to `None`.
pub fn owning_rule(identifier: &str) -> Option<&'static str> {
    all_rule_names()
        .iter()
        .copied()
        .find(|rule| *rule == identifier || rule_codes(rule).contains(&identifier))
}

/// List all known rule names, in catalog order.
pub fn all_rule_names() -> &'static [&'static str] {
    &[
        ids::RULE_MONITORING_REQUIRED,
        ids::RULE_IPV6_DISABLED,
        ids::RULE_SSH_KEYS_RECOMMENDED,
        ids::RULE_SSH_RESTRICTED,
        ids::RULE_OUTBOUND_RESTRICTED,
        ids::RULE_VOLUME_BACKUP_STRATEGY,
        ids::RULE_VOLUME_MINIMUM_SIZE,
        ids::RULE_DNS_TTL_REASONABLE,
        ids::RULE_DNS_PROXY_CONSIDERATION,
        ids::RULE_DROPLET_NAMING_CONVENTION,
        ids::RULE_TAG_REQUIRED,
        ids::RULE_FIREWALL_RULE_DOCUMENTATION,
        ids::RULE_SIZE_COST_AWARENESS,
        ids::RULE_VOLUME_SIZE_COST_AWARENESS,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MONITORING_DISABLED,
        ids::CODE_IPV6_ENABLED,
        ids::CODE_NO_SSH_KEYS,
        ids::CODE_SSH_OPEN_TO_WORLD,
        ids::CODE_OUTBOUND_ALL_PORTS,
        ids::CODE_NO_BACKUP_STRATEGY,
        ids::CODE_VOLUME_TOO_SMALL,
        ids::CODE_TTL_TOO_LOW,
        ids::CODE_TTL_TOO_HIGH,
        ids::CODE_NOT_PROXIED,
        ids::CODE_NAME_TOO_SHORT,
        ids::CODE_NO_TAGS,
        ids::CODE_UNDOCUMENTED_FIREWALL,
        ids::CODE_EXPENSIVE_SIZE,
        ids::CODE_LARGE_VOLUME,
        ids::CODE_RULE_FAULT,
    ]
}

// --- Compute instances ---

fn explain_monitoring_required() -> Explanation {
    Explanation {
        title: "Monitoring Required",
        description: "\
Droplets must have the provider monitoring agent enabled.

Without monitoring there is no CPU, memory or disk telemetry for the instance, so
compromises and resource exhaustion on an internet-facing demo go unnoticed.

This rule is mandatory: a violation blocks the deployment.",
        remediation: "\
Set `monitoring: true` on the droplet.",
        examples: ExamplePair {
            before: r#"new digitalocean.Droplet("n8n-droplet", {
    size: "s-2vcpu-2gb",
    monitoring: false,
});"#,
            after: r#"new digitalocean.Droplet("n8n-droplet", {
    size: "s-2vcpu-2gb",
    monitoring: true,
});"#,
        },
    }
}

fn explain_ipv6_disabled() -> Explanation {
    Explanation {
        title: "IPv6 Disabled",
        description: "\
IPv6 should stay disabled on demo droplets.

Every firewall rule then has to be written and reviewed for two address families.
The demos do not need IPv6 reachability, so enabling it only widens the surface.",
        remediation: "\
Set `ipv6: false`, or remove the property.",
        examples: ExamplePair {
            before: r#"new digitalocean.Droplet("juice-shop", { ipv6: true });"#,
            after: r#"new digitalocean.Droplet("juice-shop", { ipv6: false });"#,
        },
    }
}

fn explain_ssh_keys_recommended() -> Explanation {
    Explanation {
        title: "SSH Keys Recommended",
        description: "\
Droplets should be provisioned with at least one SSH key.

Without keys the provider falls back to emailed root passwords, and password
authentication is far easier to brute-force.",
        remediation: "\
Register a key with the provider and reference it in `sshKeys`.",
        examples: ExamplePair {
            before: r#"new digitalocean.Droplet("n8n-droplet", { sshKeys: [] });"#,
            after: r#"new digitalocean.Droplet("n8n-droplet", { sshKeys: [deployKey.fingerprint] });"#,
        },
    }
}

fn explain_droplet_naming_convention() -> Explanation {
    Explanation {
        title: "Droplet Naming Convention",
        description: "\
Droplets should have a meaningful name of at least 3 characters.

Names show up in billing, monitoring and the control panel; short names make it
hard to tell demo environments apart.",
        remediation: "\
Give the droplet a descriptive `name`, e.g. the demo and its role.",
        examples: ExamplePair {
            before: r#"new digitalocean.Droplet("d", { name: "d1" });"#,
            after: r#"new digitalocean.Droplet("n8n", { name: "heise-n8n-demo" });"#,
        },
    }
}

fn explain_tag_required() -> Explanation {
    Explanation {
        title: "Tags Required",
        description: "\
Droplets should carry at least one tag.

Tags drive cost reports, firewall targeting and bulk cleanup of demo resources.",
        remediation: "\
Attach a tag such as `environment=demo` or `service=n8n`.",
        examples: ExamplePair {
            before: r#"new digitalocean.Droplet("n8n-droplet", { tags: [] });"#,
            after: r#"new digitalocean.Droplet("n8n-droplet", { tags: [demoTag.id] });"#,
        },
    }
}

fn explain_size_cost_awareness() -> Explanation {
    Explanation {
        title: "Droplet Size Cost Awareness",
        description: "\
Warns when a droplet uses one of the large, expensive size slugs
(`s-8vcpu-16gb`, `s-8vcpu-32gb`, `s-16vcpu-64gb`, `s-24vcpu-128gb`).

Demo environments rarely need that much capacity and are often left running.",
        remediation: "\
Pick a smaller slug unless the workload has been measured to need it.",
        examples: ExamplePair {
            before: r#"new digitalocean.Droplet("n8n-droplet", { size: "s-8vcpu-16gb" });"#,
            after: r#"new digitalocean.Droplet("n8n-droplet", { size: "s-2vcpu-2gb" });"#,
        },
    }
}

// --- Firewalls ---

fn explain_ssh_restricted() -> Explanation {
    Explanation {
        title: "SSH Restricted",
        description: "\
Inbound SSH (port 22) should not be open to every address.

A rule with source `0.0.0.0/0` or `::/0` exposes sshd to the whole internet and to
constant credential-stuffing traffic.",
        remediation: "\
Restrict `sourceAddresses` for port 22 to known IPs, or reach the host through a VPN
or bastion host instead.",
        examples: ExamplePair {
            before: r#"inboundRules: [
    { protocol: "tcp", portRange: "22", sourceAddresses: ["0.0.0.0/0", "::/0"] },
]"#,
            after: r#"inboundRules: [
    { protocol: "tcp", portRange: "22", sourceAddresses: ["203.0.113.10/32"] },
]"#,
        },
    }
}

fn explain_outbound_restricted() -> Explanation {
    Explanation {
        title: "Outbound Restricted",
        description: "\
Outbound rules should not allow every port (`0` or `1-65535`).

Unrestricted egress makes data exfiltration and command-and-control trivial once a
demo application is compromised.",
        remediation: "\
Allow only what the host needs: HTTP/HTTPS for updates and images, DNS, NTP.",
        examples: ExamplePair {
            before: r#"outboundRules: [
    { protocol: "tcp", portRange: "0", destinationAddresses: ["0.0.0.0/0"] },
]"#,
            after: r#"outboundRules: [
    { protocol: "tcp", portRange: "443", destinationAddresses: ["0.0.0.0/0"] },
    { protocol: "udp", portRange: "53", destinationAddresses: ["0.0.0.0/0"] },
]"#,
        },
    }
}

fn explain_firewall_rule_documentation() -> Explanation {
    Explanation {
        title: "Firewall Rule Documentation",
        description: "\
Firewalls should have a descriptive name of at least 5 characters.

The name is the only documentation a firewall carries in the control panel.",
        remediation: "\
Name the firewall after the service and purpose it protects.",
        examples: ExamplePair {
            before: r#"new digitalocean.Firewall("fw", { name: "fw" });"#,
            after: r#"new digitalocean.Firewall("n8n-firewall", { name: "n8n-web-ssh" });"#,
        },
    }
}

// --- Volumes ---

fn explain_volume_backup_strategy() -> Explanation {
    Explanation {
        title: "Volume Backup Strategy",
        description: "\
Volumes should document a backup strategy in their description.

The description is checked for the word `backup` (case-insensitive).",
        remediation: "\
Set up snapshots or external backups and mention them in `description`.",
        examples: ExamplePair {
            before: r#"new digitalocean.Volume("n8n-data", {
    description: "Persistent volume for n8n data",
});"#,
            after: r#"new digitalocean.Volume("n8n-data", {
    description: "n8n data, daily snapshot backup",
});"#,
        },
    }
}

fn explain_volume_minimum_size() -> Explanation {
    Explanation {
        title: "Volume Minimum Size",
        description: "\
Volumes must be at least 1 GB.

Smaller sizes are rejected by the provider at apply time; catching them here fails
fast. This rule is mandatory.",
        remediation: "\
Set `size` to 1 or more (GB).",
        examples: ExamplePair {
            before: r#"new digitalocean.Volume("n8n-data", { size: 0.5 });"#,
            after: r#"new digitalocean.Volume("n8n-data", { size: 25 });"#,
        },
    }
}

fn explain_volume_size_cost_awareness() -> Explanation {
    Explanation {
        title: "Volume Size Cost Awareness",
        description: "\
Warns about volumes larger than 100 GB.

Block storage is billed by provisioned size, not by usage.",
        remediation: "\
Check that the capacity is really needed; volumes can be grown later.",
        examples: ExamplePair {
            before: r#"new digitalocean.Volume("n8n-data", { size: 500 });"#,
            after: r#"new digitalocean.Volume("n8n-data", { size: 25 });"#,
        },
    }
}

// --- DNS records ---

fn explain_dns_ttl_reasonable() -> Explanation {
    Explanation {
        title: "DNS TTL Reasonable",
        description: "\
DNS records should use a TTL between 120 seconds and one day (86400 seconds).

Very low TTLs hurt resolver caching and performance; very high TTLs mean changes
take a long time to propagate. Codes: `ttl_too_low`, `ttl_too_high`.",
        remediation: "\
Use a moderate TTL such as 300 seconds.",
        examples: ExamplePair {
            before: r#"new cloudflare.DnsRecord("n8n-dns", { type: "A", ttl: 60 });"#,
            after: r#"new cloudflare.DnsRecord("n8n-dns", { type: "A", ttl: 300 });"#,
        },
    }
}

fn explain_dns_proxy_consideration() -> Explanation {
    Explanation {
        title: "DNS Proxy Consideration",
        description: "\
A records that are not routed through the Cloudflare proxy expose the origin IP and
miss DDoS protection and WAF features.

Proxying is not appropriate for every service (e.g. SSH), so this is advisory.",
        remediation: "\
Set `proxied: true` for web-facing A records.",
        examples: ExamplePair {
            before: r#"new cloudflare.DnsRecord("n8n-dns", { type: "A", proxied: false });"#,
            after: r#"new cloudflare.DnsRecord("n8n-dns", { type: "A", proxied: true });"#,
        },
    }
}

// --- Engine ---

fn explain_rule_fault() -> Explanation {
    Explanation {
        title: "Rule Fault",
        description: "\
A rule could not be evaluated against a resource, usually because a property it
reads has an unexpected type (e.g. a numeric droplet `size` instead of a slug).

The evaluation continues; the fault is reported as an advisory diagnostic naming the
rule and the resource, so the rule's real verdict for that resource is unknown.",
        remediation: "\
Fix the property type in the resource declaration, or the snapshot export that
produced it, and re-run the check.",
        examples: ExamplePair {
            before: r#"new digitalocean.Droplet("n8n-droplet", { size: 2 as any });"#,
            after: r#"new digitalocean.Droplet("n8n-droplet", { size: "s-2vcpu-2gb" });"#,
        },
    }
}
