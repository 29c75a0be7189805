use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use stackguard_types::{ResourceId, ids};
use std::collections::BTreeMap;
use std::fmt;

/// Wildcard-all sentinel used by identity policies and CORS origins.
pub const WILDCARD_ALL: &str = "*";

/// Unrestricted IPv4 source sentinel.
pub const ANY_IPV4: &str = "0.0.0.0/0";

/// Unrestricted IPv6 source sentinel.
pub const ANY_IPV6: &str = "::/0";

/// Ports whose exposure to the internet is treated as critical
/// (remote administration and data stores).
pub const SENSITIVE_PORTS: &[u16] = &[22, 3389, 5432, 3306, 1433, 1521, 27017, 6379, 9200, 5439];

/// Ports of protocols that carry data in plaintext.
pub const PLAINTEXT_PORTS: &[u16] = &[80, 21, 23];

/// Values of the `data-classification` tag that mark a resource as holding regulated data.
pub const SENSITIVE_CLASSIFICATIONS: &[&str] = &["phi", "pii", "sensitive", "confidential"];

/// Closed set of resource kinds.
///
/// Declaration order is the fixed kind ordering the engine iterates in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum ResourceKind {
    Network,
    Subnet,
    SecurityGroup,
    Database,
    ObjectStore,
    ComputeFunction,
    VirtualMachine,
    ApiEndpoint,
    LogGroup,
    Key,
    IdentityPolicy,
    Credential,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 12] = [
        ResourceKind::Network,
        ResourceKind::Subnet,
        ResourceKind::SecurityGroup,
        ResourceKind::Database,
        ResourceKind::ObjectStore,
        ResourceKind::ComputeFunction,
        ResourceKind::VirtualMachine,
        ResourceKind::ApiEndpoint,
        ResourceKind::LogGroup,
        ResourceKind::Key,
        ResourceKind::IdentityPolicy,
        ResourceKind::Credential,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Network => "Network",
            ResourceKind::Subnet => "Subnet",
            ResourceKind::SecurityGroup => "SecurityGroup",
            ResourceKind::Database => "Database",
            ResourceKind::ObjectStore => "ObjectStore",
            ResourceKind::ComputeFunction => "ComputeFunction",
            ResourceKind::VirtualMachine => "VirtualMachine",
            ResourceKind::ApiEndpoint => "ApiEndpoint",
            ResourceKind::LogGroup => "LogGroup",
            ResourceKind::Key => "Key",
            ResourceKind::IdentityPolicy => "IdentityPolicy",
            ResourceKind::Credential => "Credential",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed, directed relationship between two resources.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum RelationKind {
    /// subnet -> network, resource -> subnet
    MemberOf,
    /// security group -> resource (or security group it trusts)
    Secures,
    /// principal -> identity policy
    AttachedPolicy,
    /// function -> store
    Reads,
    /// function -> store
    Writes,
    /// endpoint -> function
    Exposes,
    /// resource -> log group receiving its access/audit logs
    LogsTo,
    /// resource -> key
    EncryptedWith,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::MemberOf => "MemberOf",
            RelationKind::Secures => "Secures",
            RelationKind::AttachedPolicy => "AttachedPolicy",
            RelationKind::Reads => "Reads",
            RelationKind::Writes => "Writes",
            RelationKind::Exposes => "Exposes",
            RelationKind::LogsTo => "LogsTo",
            RelationKind::EncryptedWith => "EncryptedWith",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an identity policy's action or resource list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// The wildcard-all sentinel (`*`).
    Any,
    Exact(String),
}

impl Pattern {
    pub fn parse(s: &str) -> Self {
        if s.trim() == WILDCARD_ALL {
            Pattern::Any
        } else {
            Pattern::Exact(s.to_string())
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Pattern::Any)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Any => WILDCARD_ALL,
            Pattern::Exact(s) => s,
        }
    }
}

/// Source of an ingress rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngressSource {
    /// `0.0.0.0/0`
    AnyIpv4,
    /// `::/0`
    AnyIpv6,
    Cidr(String),
}

impl IngressSource {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            ANY_IPV4 => IngressSource::AnyIpv4,
            ANY_IPV6 => IngressSource::AnyIpv6,
            other => IngressSource::Cidr(other.to_string()),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, IngressSource::AnyIpv4 | IngressSource::AnyIpv6)
    }

    pub fn as_str(&self) -> &str {
        match self {
            IngressSource::AnyIpv4 => ANY_IPV4,
            IngressSource::AnyIpv6 => ANY_IPV6,
            IngressSource::Cidr(s) => s,
        }
    }
}

/// A single inbound rule of a security group. Port ranges are inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngressRule {
    pub source: IngressSource,
    pub from_port: u16,
    pub to_port: u16,
}

impl IngressRule {
    pub fn port(source: IngressSource, port: u16) -> Self {
        Self {
            source,
            from_port: port,
            to_port: port,
        }
    }

    pub fn range(source: IngressSource, from_port: u16, to_port: u16) -> Self {
        Self {
            source,
            from_port,
            to_port,
        }
    }

    /// All ports, as produced by "all traffic" rules.
    pub fn all_ports(source: IngressSource) -> Self {
        Self::range(source, 0, u16::MAX)
    }

    pub fn covers(&self, port: u16) -> bool {
        self.from_port <= port && port <= self.to_port
    }
}

/// Log retention. `Days(0)` means logs are discarded immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retention {
    Days(u32),
    Infinite,
}

/// A typed property value. The expected variant per property is fixed by the
/// kind's schema; enum-typed properties are stored as `Text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Text(String),
    TextMap(BTreeMap<String, String>),
    Patterns(Vec<Pattern>),
    Ingress(Vec<IngressRule>),
    Retention(Retention),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Text(_) => "text",
            PropertyValue::TextMap(_) => "map",
            PropertyValue::Patterns(_) => "patterns",
            PropertyValue::Ingress(_) => "ingress",
            PropertyValue::Retention(_) => "retention",
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<Retention> for PropertyValue {
    fn from(v: Retention) -> Self {
        PropertyValue::Retention(v)
    }
}

impl From<Vec<IngressRule>> for PropertyValue {
    fn from(v: Vec<IngressRule>) -> Self {
        PropertyValue::Ingress(v)
    }
}

impl From<Vec<Pattern>> for PropertyValue {
    fn from(v: Vec<Pattern>) -> Self {
        PropertyValue::Patterns(v)
    }
}

impl From<BTreeMap<String, String>> for PropertyValue {
    fn from(v: BTreeMap<String, String>) -> Self {
        PropertyValue::TextMap(v)
    }
}

/// A declared infrastructure object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub properties: BTreeMap<String, PropertyValue>,
    /// Free-form metadata carried into findings. Only `data-classification` is interpreted.
    pub tags: BTreeMap<String, String>,
}

impl Resource {
    pub fn new(id: impl Into<ResourceId>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn bool_prop(&self, name: &str) -> Option<bool> {
        match self.properties.get(name) {
            Some(PropertyValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn int_prop(&self, name: &str) -> Option<i64> {
        match self.properties.get(name) {
            Some(PropertyValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text_prop(&self, name: &str) -> Option<&str> {
        match self.properties.get(name) {
            Some(PropertyValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn map_prop(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match self.properties.get(name) {
            Some(PropertyValue::TextMap(v)) => Some(v),
            _ => None,
        }
    }

    pub fn patterns_prop(&self, name: &str) -> &[Pattern] {
        match self.properties.get(name) {
            Some(PropertyValue::Patterns(v)) => v,
            _ => &[],
        }
    }

    pub fn ingress_prop(&self, name: &str) -> &[IngressRule] {
        match self.properties.get(name) {
            Some(PropertyValue::Ingress(v)) => v,
            _ => &[],
        }
    }

    pub fn retention_prop(&self, name: &str) -> Option<Retention> {
        match self.properties.get(name) {
            Some(PropertyValue::Retention(v)) => Some(*v),
            _ => None,
        }
    }

    /// True when the resource is tagged as holding regulated data.
    pub fn is_sensitive(&self) -> bool {
        self.tags
            .get(ids::TAG_DATA_CLASSIFICATION)
            .map(|v| {
                let v = v.trim().to_ascii_lowercase();
                SENSITIVE_CLASSIFICATIONS.contains(&v.as_str())
            })
            .unwrap_or(false)
    }
}
