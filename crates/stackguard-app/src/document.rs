//! The `stackguard.graph.v1` interchange document and its loader.
//!
//! JSON property values are coerced through the kind's property schema, so a
//! value of the wrong shape is a schema error rather than a silently ignored
//! (and therefore unsafe-by-default) property.

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stackguard_domain::model::{IngressRule, IngressSource, Pattern, Retention};
use stackguard_domain::schema::{self, PropertyType};
use stackguard_domain::{
    GraphBuilder, GraphError, PropertyValue, RelationKind, Resource, ResourceGraph, ResourceKind,
    SchemaViolation,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Stable schema identifier for graph documents.
pub const SCHEMA_GRAPH_V1: &str = "stackguard.graph.v1";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceDoc>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDoc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceDoc {
    pub id: String,
    /// One of the resource kinds, e.g. `Database`.
    pub kind: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RelationshipDoc {
    pub from: String,
    pub to: String,
    /// One of the relationship kinds, e.g. `Secures`.
    pub kind: String,
}

/// JSON shape of one security group ingress entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct IngressDoc {
    cidr: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    from_port: Option<u16>,
    #[serde(default)]
    to_port: Option<u16>,
}

/// What to do with an item the graph builder rejects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Abort on the first rejected item.
    #[default]
    Strict,
    /// Skip rejected items and record them.
    Lenient,
}

#[derive(Clone, Debug)]
pub struct LoadedGraph {
    pub graph: ResourceGraph,
    /// Human-readable reasons for every skipped item (lenient mode only).
    pub rejected: Vec<String>,
}

pub fn parse_graph_json(text: &str) -> anyhow::Result<GraphDocument> {
    let doc: GraphDocument = serde_json::from_str(text).context("parse graph document")?;
    if let Some(schema) = doc.schema.as_deref()
        && schema != SCHEMA_GRAPH_V1
    {
        anyhow::bail!("unsupported graph schema: {schema} (expected {SCHEMA_GRAPH_V1})");
    }
    Ok(doc)
}

/// Build a [`ResourceGraph`] from a parsed document.
///
/// Resources are added before relationships, each in document order.
pub fn load_graph(doc: &GraphDocument, mode: LoadMode) -> anyhow::Result<LoadedGraph> {
    let mut builder = GraphBuilder::new();
    let mut rejected = Vec::new();

    for item in &doc.resources {
        let outcome = to_resource(item).and_then(|r| builder.add_resource(r).map_err(Into::into));
        if let Err(err) = outcome {
            let reason = format!("resource '{}': {err:#}", item.id.trim());
            match mode {
                LoadMode::Strict => return Err(err.context(format!("resource '{}'", item.id))),
                LoadMode::Lenient => {
                    warn!(%reason, "skipping rejected resource");
                    rejected.push(reason);
                }
            }
        }
    }

    for edge in &doc.relationships {
        let outcome = parse_relation_kind(&edge.kind).and_then(|kind| {
            builder
                .add_relationship(&edge.from, &edge.to, kind)
                .map_err(Into::into)
        });
        if let Err(err) = outcome {
            let label = format!("relationship {} -> {} ({})", edge.from, edge.to, edge.kind);
            match mode {
                LoadMode::Strict => return Err(err.context(label)),
                LoadMode::Lenient => {
                    let reason = format!("{label}: {err:#}");
                    warn!(%reason, "skipping rejected relationship");
                    rejected.push(reason);
                }
            }
        }
    }

    let graph = builder.build();
    debug!(
        resources = graph.len(),
        relationships = graph.relationships().len(),
        rejected = rejected.len(),
        "graph loaded"
    );
    Ok(LoadedGraph { graph, rejected })
}

fn parse_resource_kind(v: &str) -> anyhow::Result<ResourceKind> {
    ResourceKind::ALL
        .into_iter()
        .find(|k| k.as_str() == v)
        .with_context(|| format!("unknown resource kind: {v}"))
}

fn parse_relation_kind(v: &str) -> anyhow::Result<RelationKind> {
    const ALL: [RelationKind; 8] = [
        RelationKind::MemberOf,
        RelationKind::Secures,
        RelationKind::AttachedPolicy,
        RelationKind::Reads,
        RelationKind::Writes,
        RelationKind::Exposes,
        RelationKind::LogsTo,
        RelationKind::EncryptedWith,
    ];
    ALL.into_iter()
        .find(|k| k.as_str() == v)
        .with_context(|| format!("unknown relationship kind: {v}"))
}

fn to_resource(doc: &ResourceDoc) -> anyhow::Result<Resource> {
    let kind = parse_resource_kind(&doc.kind)?;
    let mut resource = Resource::new(doc.id.as_str(), kind);
    resource.tags = doc.tags.clone();

    for (name, value) in &doc.properties {
        // `null` is the same as leaving the property out.
        if value.is_null() {
            continue;
        }
        let coerced = coerce(kind, name, value).map_err(|violation| GraphError::SchemaValidation {
            id: resource.id.clone(),
            kind,
            violation,
        })?;
        resource.properties.insert(name.clone(), coerced);
    }

    Ok(resource)
}

fn coerce(kind: ResourceKind, name: &str, value: &Value) -> Result<PropertyValue, SchemaViolation> {
    let Some(spec) = schema::property_spec(kind, name) else {
        return Err(SchemaViolation::UnknownProperty {
            property: name.to_string(),
        });
    };

    let mismatch = || SchemaViolation::TypeMismatch {
        property: name.to_string(),
        expected: spec.ty.name(),
        found: json_type_name(value),
    };

    match spec.ty {
        PropertyType::Bool => value
            .as_bool()
            .map(PropertyValue::Bool)
            .ok_or_else(mismatch),
        PropertyType::Int => value
            .as_i64()
            .map(PropertyValue::Int)
            .ok_or_else(mismatch),
        PropertyType::Text | PropertyType::Enum(_) => value
            .as_str()
            .map(|s| PropertyValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        PropertyType::TextMap => {
            let obj = value.as_object().ok_or_else(mismatch)?;
            obj.iter()
                .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect::<Option<BTreeMap<_, _>>>()
                .map(PropertyValue::TextMap)
                .ok_or_else(mismatch)
        }
        PropertyType::Patterns => match value {
            Value::String(s) => Ok(PropertyValue::Patterns(vec![Pattern::parse(s)])),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(Pattern::parse))
                .collect::<Option<Vec<_>>>()
                .map(PropertyValue::Patterns)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        PropertyType::Ingress => {
            let entries = serde_json::from_value::<Vec<IngressDoc>>(value.clone());
            let entries = entries.map_err(|e| SchemaViolation::InvalidValue {
                property: name.to_string(),
                reason: e.to_string(),
            })?;
            Ok(PropertyValue::Ingress(entries.into_iter().map(ingress_rule).collect()))
        }
        PropertyType::Retention => match value {
            Value::String(s) if s.eq_ignore_ascii_case("infinite") => {
                Ok(PropertyValue::Retention(Retention::Infinite))
            }
            Value::Number(_) => value
                .as_u64()
                .and_then(|d| u32::try_from(d).ok())
                .map(|d| PropertyValue::Retention(Retention::Days(d)))
                .ok_or_else(|| SchemaViolation::InvalidValue {
                    property: name.to_string(),
                    reason: format!("{value} is not a number of days"),
                }),
            _ => Err(mismatch()),
        },
    }
}

fn ingress_rule(doc: IngressDoc) -> IngressRule {
    let source = IngressSource::parse(&doc.cidr);
    match (doc.port, doc.from_port, doc.to_port) {
        (Some(port), _, _) => IngressRule::port(source, port),
        (None, Some(from), Some(to)) => IngressRule::range(source, from, to),
        (None, Some(port), None) | (None, None, Some(port)) => IngressRule::port(source, port),
        (None, None, None) => IngressRule::all_ports(source),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
