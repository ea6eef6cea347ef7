use infraguard_types::ResourceRef;
use serde_json::Value;
use std::collections::BTreeMap;

/// Resource category; decides which rules apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    ComputeInstance,
    Firewall,
    Volume,
    DnsRecord,
    /// Any type token the policy pack has no rules for (tags, providers, components).
    Other,
}

impl ResourceKind {
    pub fn from_type_token(token: &str) -> Self {
        match token {
            "digitalocean:index/droplet:Droplet" => ResourceKind::ComputeInstance,
            "digitalocean:index/firewall:Firewall" => ResourceKind::Firewall,
            "digitalocean:index/volume:Volume" => ResourceKind::Volume,
            "cloudflare:index/dnsRecord:DnsRecord" | "cloudflare:index/record:Record" => {
                ResourceKind::DnsRecord
            }
            _ => ResourceKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::ComputeInstance => "compute_instance",
            ResourceKind::Firewall => "firewall",
            ResourceKind::Volume => "volume",
            ResourceKind::DnsRecord => "dns_record",
            ResourceKind::Other => "other",
        }
    }
}

/// A single property value as resolved by the provisioning engine.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<PropertyValue>),
    Record(Properties),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Number(_) => "number",
            PropertyValue::String(_) => "string",
            PropertyValue::List(_) => "sequence",
            PropertyValue::Record(_) => "record",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null => Value::Null,
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            PropertyValue::Record(props) => props.to_json(),
        }
    }
}

impl From<&Value> for PropertyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(PropertyValue::Null, PropertyValue::Number),
            Value::String(s) => PropertyValue::String(s.clone()),
            Value::Array(items) => PropertyValue::List(items.iter().map(Self::from).collect()),
            Value::Object(map) => PropertyValue::Record(
                map.iter()
                    .map(|(k, v)| (k.clone(), PropertyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Property bag of one resource (or one nested record, e.g. a firewall rule).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.0.iter()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Properties(iter.into_iter().collect())
    }
}

/// A typed snapshot of one provisioned entity as it will exist after apply.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub type_token: String,
    /// Logical resource name, when the snapshot carries one.
    pub name: Option<String>,
    pub urn: Option<String>,
    pub properties: Properties,
}

impl ResourceDescriptor {
    pub fn new(type_token: impl Into<String>, properties: Properties) -> Self {
        let type_token = type_token.into();
        Self {
            kind: ResourceKind::from_type_token(&type_token),
            type_token,
            name: None,
            urn: None,
            properties,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_urn(mut self, urn: impl Into<String>) -> Self {
        self.urn = Some(urn.into());
        self
    }

    /// Name used for allowlist matching: the logical name, else a string `properties.name`.
    pub fn match_name(&self) -> Option<&str> {
        self.name.as_deref().or(match self.properties.get("name") {
            Some(PropertyValue::String(s)) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn to_ref(&self, index: usize) -> ResourceRef {
        ResourceRef {
            index: index as u32,
            type_token: self.type_token.clone(),
            name: self.name.clone(),
            urn: self.urn.clone(),
        }
    }
}

/// The fully-resolved desired infrastructure state for one deployment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceGraph {
    pub resources: Vec<ResourceDescriptor>,
}

impl ResourceGraph {
    pub fn new(resources: Vec<ResourceDescriptor>) -> Self {
        Self { resources }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
