//! Typed property access.
//!
//! Absent and `null` properties read as `None`. A property that is present with the wrong type
//! is a [`RuleFault`]; the engine turns those into advisory diagnostics instead of guessing.
//! On/off flags (`monitoring`, `ipv6`, `proxied`) are read by truthiness and never fault.

use crate::model::{Properties, PropertyValue, ResourceDescriptor};

/// A rule could not be evaluated against a resource.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleFault {
    #[error("property `{property}` is a {found}, expected a {expected}")]
    WrongType {
        property: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("rule panicked: {0}")]
    Panicked(String),
}

impl RuleFault {
    fn wrong_type(property: &str, expected: &'static str, found: &PropertyValue) -> Self {
        RuleFault::WrongType {
            property: property.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    /// Prefix the faulting property path with its parent, e.g. `inboundRules[0]`.
    pub fn within(self, parent: &str) -> Self {
        match self {
            RuleFault::WrongType {
                property,
                expected,
                found,
            } => RuleFault::WrongType {
                property: format!("{parent}.{property}"),
                expected,
                found,
            },
            other => other,
        }
    }
}

pub type AccessResult<T> = Result<Option<T>, RuleFault>;

impl Properties {
    fn present(&self, key: &str) -> Option<&PropertyValue> {
        match self.get(key) {
            None | Some(PropertyValue::Null) => None,
            Some(v) => Some(v),
        }
    }

    /// Truthiness of a flag: `0`, `""`, `false`, `null` and absent are false.
    pub fn truthy(&self, key: &str) -> bool {
        match self.present(key) {
            None => false,
            Some(PropertyValue::Bool(b)) => *b,
            Some(PropertyValue::Number(n)) => *n != 0.0 && !n.is_nan(),
            Some(PropertyValue::String(s)) => !s.is_empty(),
            Some(PropertyValue::List(_) | PropertyValue::Record(_)) => true,
            Some(PropertyValue::Null) => false,
        }
    }

    pub fn number(&self, key: &str) -> AccessResult<f64> {
        match self.present(key) {
            None => Ok(None),
            Some(PropertyValue::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(RuleFault::wrong_type(key, "number", other)),
        }
    }

    pub fn string(&self, key: &str) -> AccessResult<&str> {
        match self.present(key) {
            None => Ok(None),
            Some(PropertyValue::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(RuleFault::wrong_type(key, "string", other)),
        }
    }

    pub fn seq(&self, key: &str) -> AccessResult<&[PropertyValue]> {
        match self.present(key) {
            None => Ok(None),
            Some(PropertyValue::List(items)) => Ok(Some(items.as_slice())),
            Some(other) => Err(RuleFault::wrong_type(key, "sequence", other)),
        }
    }

    pub fn strings(&self, key: &str) -> AccessResult<Vec<&str>> {
        let Some(items) = self.seq(key)? else {
            return Ok(None);
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                PropertyValue::String(s) => Ok(s.as_str()),
                other => Err(RuleFault::wrong_type(&format!("{key}[{i}]"), "string", other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    pub fn records(&self, key: &str) -> AccessResult<Vec<&Properties>> {
        let Some(items) = self.seq(key)? else {
            return Ok(None);
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                PropertyValue::Record(props) => Ok(props),
                other => Err(RuleFault::wrong_type(&format!("{key}[{i}]"), "record", other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Droplet view.
pub struct ComputeInstance<'a>(&'a Properties);

impl<'a> ComputeInstance<'a> {
    pub fn of(resource: &'a ResourceDescriptor) -> Self {
        Self(&resource.properties)
    }

    pub fn monitoring(&self) -> bool {
        self.0.truthy("monitoring")
    }

    pub fn ipv6(&self) -> bool {
        self.0.truthy("ipv6")
    }

    /// Number of configured SSH keys (IDs or fingerprints).
    pub fn ssh_key_count(&self) -> AccessResult<usize> {
        Ok(self.0.seq("sshKeys")?.map(<[_]>::len))
    }

    pub fn name(&self) -> AccessResult<&'a str> {
        self.0.string("name")
    }

    pub fn tag_count(&self) -> AccessResult<usize> {
        Ok(self.0.seq("tags")?.map(<[_]>::len))
    }

    /// Size slug, e.g. `s-2vcpu-2gb`.
    pub fn size(&self) -> AccessResult<&'a str> {
        self.0.string("size")
    }
}

/// Firewall view.
pub struct Firewall<'a>(&'a Properties);

/// One inbound or outbound firewall rule.
pub struct FirewallRule<'a> {
    pub index: usize,
    path: String,
    props: &'a Properties,
}

impl<'a> Firewall<'a> {
    pub fn of(resource: &'a ResourceDescriptor) -> Self {
        Self(&resource.properties)
    }

    pub fn name(&self) -> AccessResult<&'a str> {
        self.0.string("name")
    }

    pub fn inbound_rules(&self) -> Result<Vec<FirewallRule<'a>>, RuleFault> {
        self.rules("inboundRules")
    }

    pub fn outbound_rules(&self) -> Result<Vec<FirewallRule<'a>>, RuleFault> {
        self.rules("outboundRules")
    }

    fn rules(&self, key: &str) -> Result<Vec<FirewallRule<'a>>, RuleFault> {
        let rules = self.0.records(key)?.unwrap_or_default();
        Ok(rules
            .into_iter()
            .enumerate()
            .map(|(index, props)| FirewallRule {
                index,
                path: format!("{key}[{index}]"),
                props,
            })
            .collect())
    }
}

impl<'a> FirewallRule<'a> {
    pub fn protocol(&self) -> AccessResult<&'a str> {
        self.props.string("protocol").map_err(|f| f.within(&self.path))
    }

    pub fn port_range(&self) -> AccessResult<&'a str> {
        self.props
            .string("portRange")
            .map_err(|f| f.within(&self.path))
    }

    pub fn source_addresses(&self) -> AccessResult<Vec<&'a str>> {
        self.props
            .strings("sourceAddresses")
            .map_err(|f| f.within(&self.path))
    }

    pub fn destination_addresses(&self) -> AccessResult<Vec<&'a str>> {
        self.props
            .strings("destinationAddresses")
            .map_err(|f| f.within(&self.path))
    }
}

/// Block storage volume view.
pub struct Volume<'a>(&'a Properties);

impl<'a> Volume<'a> {
    pub fn of(resource: &'a ResourceDescriptor) -> Self {
        Self(&resource.properties)
    }

    /// Size in GB.
    pub fn size(&self) -> AccessResult<f64> {
        self.0.number("size")
    }

    pub fn description(&self) -> AccessResult<&'a str> {
        self.0.string("description")
    }
}

/// DNS record view.
pub struct DnsRecord<'a>(&'a Properties);

impl<'a> DnsRecord<'a> {
    pub fn of(resource: &'a ResourceDescriptor) -> Self {
        Self(&resource.properties)
    }

    /// TTL in seconds.
    pub fn ttl(&self) -> AccessResult<f64> {
        self.0.number("ttl")
    }

    /// Record type, e.g. `A` or `CNAME`.
    pub fn record_type(&self) -> AccessResult<&'a str> {
        self.0.string("type")
    }

    pub fn proxied(&self) -> bool {
        self.0.truthy("proxied")
    }
}
