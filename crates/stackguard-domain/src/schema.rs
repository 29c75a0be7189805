//! Per-kind property schemas.
//!
//! Every property a resource declares must be listed for its kind and carry the
//! declared type. All properties are optional; rules decide what a missing
//! property means (usually: the unsafe default).

use crate::error::SchemaViolation;
use crate::model::{PropertyValue, Resource, ResourceKind};

pub const SUBNET_TYPES: &[&str] = &["public", "private", "isolated"];
pub const REMOVAL_POLICIES: &[&str] = &["retain", "snapshot", "destroy"];
pub const AUTHORIZATION_TYPES: &[&str] = &["none", "iam", "cognito", "custom"];
pub const POLICY_EFFECTS: &[&str] = &["allow", "deny"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyType {
    Bool,
    /// Non-negative integer (ports, days, limits).
    Int,
    Text,
    /// Text restricted to a fixed set of lowercase values.
    Enum(&'static [&'static str]),
    TextMap,
    Patterns,
    Ingress,
    Retention,
}

impl PropertyType {
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Bool => "bool",
            PropertyType::Int => "int",
            PropertyType::Text => "text",
            PropertyType::Enum(_) => "enum",
            PropertyType::TextMap => "map",
            PropertyType::Patterns => "patterns",
            PropertyType::Ingress => "ingress",
            PropertyType::Retention => "retention",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub ty: PropertyType,
}

const fn spec(name: &'static str, ty: PropertyType) -> PropertySpec {
    PropertySpec { name, ty }
}

const NETWORK: &[PropertySpec] = &[
    spec("cidr", PropertyType::Text),
    spec("flowLogsEnabled", PropertyType::Bool),
];

const SUBNET: &[PropertySpec] = &[
    spec("subnetType", PropertyType::Enum(SUBNET_TYPES)),
    spec("cidr", PropertyType::Text),
];

const SECURITY_GROUP: &[PropertySpec] = &[
    spec("ingress", PropertyType::Ingress),
    spec("allowAllOutbound", PropertyType::Bool),
    spec("description", PropertyType::Text),
];

const DATABASE: &[PropertySpec] = &[
    spec("engine", PropertyType::Text),
    spec("port", PropertyType::Int),
    spec("encrypted", PropertyType::Bool),
    spec("publiclyAccessible", PropertyType::Bool),
    spec("backupRetentionDays", PropertyType::Int),
    spec("deletionProtection", PropertyType::Bool),
    spec("removalPolicy", PropertyType::Enum(REMOVAL_POLICIES)),
    spec("multiAz", PropertyType::Bool),
    spec("masterUsername", PropertyType::Text),
    spec("masterPassword", PropertyType::Text),
];

const OBJECT_STORE: &[PropertySpec] = &[
    spec("encrypted", PropertyType::Bool),
    spec("publiclyAccessible", PropertyType::Bool),
    spec("versioned", PropertyType::Bool),
    spec("removalPolicy", PropertyType::Enum(REMOVAL_POLICIES)),
    spec("autoDeleteObjects", PropertyType::Bool),
    spec("corsAllowedOrigins", PropertyType::Patterns),
    spec("enforceTls", PropertyType::Bool),
];

const COMPUTE_FUNCTION: &[PropertySpec] = &[
    spec("runtime", PropertyType::Text),
    spec("environment", PropertyType::TextMap),
    spec("environmentEncrypted", PropertyType::Bool),
    spec("timeoutSeconds", PropertyType::Int),
];

const VIRTUAL_MACHINE: &[PropertySpec] = &[
    spec("instanceType", PropertyType::Text),
    spec("publiclyAccessible", PropertyType::Bool),
    spec("volumeEncrypted", PropertyType::Bool),
    spec("keyName", PropertyType::Text),
];

const API_ENDPOINT: &[PropertySpec] = &[
    spec("method", PropertyType::Text),
    spec("path", PropertyType::Text),
    spec("authorizationType", PropertyType::Enum(AUTHORIZATION_TYPES)),
    spec("apiKeyRequired", PropertyType::Bool),
    spec("dataTraceEnabled", PropertyType::Bool),
    spec("throttlingRateLimit", PropertyType::Int),
    spec("throttlingBurstLimit", PropertyType::Int),
];

const LOG_GROUP: &[PropertySpec] = &[
    spec("retention", PropertyType::Retention),
    spec("logGroupName", PropertyType::Text),
];

const KEY: &[PropertySpec] = &[
    spec("rotationEnabled", PropertyType::Bool),
    spec("pendingWindowDays", PropertyType::Int),
];

const IDENTITY_POLICY: &[PropertySpec] = &[
    spec("effect", PropertyType::Enum(POLICY_EFFECTS)),
    spec("actions", PropertyType::Patterns),
    spec("resources", PropertyType::Patterns),
];

const CREDENTIAL: &[PropertySpec] = &[
    spec("value", PropertyType::Text),
    spec("exported", PropertyType::Bool),
    spec("description", PropertyType::Text),
];

pub fn schema_for(kind: ResourceKind) -> &'static [PropertySpec] {
    match kind {
        ResourceKind::Network => NETWORK,
        ResourceKind::Subnet => SUBNET,
        ResourceKind::SecurityGroup => SECURITY_GROUP,
        ResourceKind::Database => DATABASE,
        ResourceKind::ObjectStore => OBJECT_STORE,
        ResourceKind::ComputeFunction => COMPUTE_FUNCTION,
        ResourceKind::VirtualMachine => VIRTUAL_MACHINE,
        ResourceKind::ApiEndpoint => API_ENDPOINT,
        ResourceKind::LogGroup => LOG_GROUP,
        ResourceKind::Key => KEY,
        ResourceKind::IdentityPolicy => IDENTITY_POLICY,
        ResourceKind::Credential => CREDENTIAL,
    }
}

pub fn property_spec(kind: ResourceKind, name: &str) -> Option<&'static PropertySpec> {
    schema_for(kind).iter().find(|s| s.name == name)
}

/// Validate every declared property of `resource` against its kind's schema.
///
/// Properties are checked in name order, so the reported violation is stable.
pub fn validate(resource: &Resource) -> Result<(), SchemaViolation> {
    if resource.id.is_empty() {
        return Err(SchemaViolation::EmptyId);
    }

    for (name, value) in &resource.properties {
        let Some(spec) = property_spec(resource.kind, name) else {
            return Err(SchemaViolation::UnknownProperty {
                property: name.clone(),
            });
        };
        check_value(name, spec.ty, value)?;
    }

    Ok(())
}

fn check_value(name: &str, ty: PropertyType, value: &PropertyValue) -> Result<(), SchemaViolation> {
    let mismatch = || SchemaViolation::TypeMismatch {
        property: name.to_string(),
        expected: ty.name(),
        found: value.type_name(),
    };

    match (ty, value) {
        (PropertyType::Bool, PropertyValue::Bool(_)) => Ok(()),
        (PropertyType::Int, PropertyValue::Int(v)) => {
            if *v < 0 {
                Err(SchemaViolation::InvalidValue {
                    property: name.to_string(),
                    reason: format!("{v} is negative"),
                })
            } else {
                Ok(())
            }
        }
        (PropertyType::Text, PropertyValue::Text(_)) => Ok(()),
        (PropertyType::Enum(allowed), PropertyValue::Text(v)) => {
            if allowed.contains(&v.as_str()) {
                Ok(())
            } else {
                Err(SchemaViolation::InvalidEnumValue {
                    property: name.to_string(),
                    value: v.clone(),
                    allowed: allowed.join(", "),
                })
            }
        }
        (PropertyType::TextMap, PropertyValue::TextMap(_)) => Ok(()),
        (PropertyType::Patterns, PropertyValue::Patterns(_)) => Ok(()),
        (PropertyType::Ingress, PropertyValue::Ingress(rules)) => {
            for rule in rules {
                if rule.from_port > rule.to_port {
                    return Err(SchemaViolation::InvalidValue {
                        property: name.to_string(),
                        reason: format!(
                            "port range {}-{} is inverted",
                            rule.from_port, rule.to_port
                        ),
                    });
                }
            }
            Ok(())
        }
        (PropertyType::Retention, PropertyValue::Retention(_)) => Ok(()),
        _ => Err(mismatch()),
    }
}
