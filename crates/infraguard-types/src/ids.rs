//! Stable identifiers for rules and violation codes.
//!
//! Rule names are kebab-case and unique within the pack. `code` is a short snake_case
//! discriminator; a rule that can fail in more than one way uses one code per way.

/// Name of the built-in policy pack.
pub const POLICY_PACK: &str = "heise-security-policies";

// Rules: compute instances
pub const RULE_MONITORING_REQUIRED: &str = "monitoring-required";
pub const RULE_IPV6_DISABLED: &str = "ipv6-disabled";
pub const RULE_SSH_KEYS_RECOMMENDED: &str = "ssh-keys-recommended";
pub const RULE_DROPLET_NAMING_CONVENTION: &str = "droplet-naming-convention";
pub const RULE_TAG_REQUIRED: &str = "tag-required";
pub const RULE_SIZE_COST_AWARENESS: &str = "size-cost-awareness";

// Rules: firewalls
pub const RULE_SSH_RESTRICTED: &str = "ssh-restricted";
pub const RULE_OUTBOUND_RESTRICTED: &str = "outbound-restricted";
pub const RULE_FIREWALL_RULE_DOCUMENTATION: &str = "firewall-rule-documentation";

// Rules: volumes
pub const RULE_VOLUME_BACKUP_STRATEGY: &str = "volume-backup-strategy";
pub const RULE_VOLUME_MINIMUM_SIZE: &str = "volume-minimum-size";
pub const RULE_VOLUME_SIZE_COST_AWARENESS: &str = "volume-size-cost-awareness";

// Rules: DNS records
pub const RULE_DNS_TTL_REASONABLE: &str = "dns-ttl-reasonable";
pub const RULE_DNS_PROXY_CONSIDERATION: &str = "dns-proxy-consideration";

// Codes: compute instances
pub const CODE_MONITORING_DISABLED: &str = "monitoring_disabled";
pub const CODE_IPV6_ENABLED: &str = "ipv6_enabled";
pub const CODE_NO_SSH_KEYS: &str = "no_ssh_keys";
pub const CODE_NAME_TOO_SHORT: &str = "name_too_short";
pub const CODE_NO_TAGS: &str = "no_tags";
pub const CODE_EXPENSIVE_SIZE: &str = "expensive_size";

// Codes: firewalls
pub const CODE_SSH_OPEN_TO_WORLD: &str = "ssh_open_to_world";
pub const CODE_OUTBOUND_ALL_PORTS: &str = "outbound_all_ports";
pub const CODE_UNDOCUMENTED_FIREWALL: &str = "undocumented_firewall";

// Codes: volumes
pub const CODE_NO_BACKUP_STRATEGY: &str = "no_backup_strategy";
pub const CODE_VOLUME_TOO_SMALL: &str = "volume_too_small";
pub const CODE_LARGE_VOLUME: &str = "large_volume";

// Codes: DNS records
pub const CODE_TTL_TOO_LOW: &str = "ttl_too_low";
pub const CODE_TTL_TOO_HIGH: &str = "ttl_too_high";
pub const CODE_NOT_PROXIED: &str = "not_proxied";

// Engine-level
pub const CODE_RULE_FAULT: &str = "rule_fault";

// Tool-level
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
