use crate::model::{RelationKind, ResourceKind};
use stackguard_types::ResourceId;
use thiserror::Error;

/// Why a resource's declared properties do not fit its kind's schema.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("resource id must not be empty")]
    EmptyId,

    #[error("unknown property '{property}'")]
    UnknownProperty { property: String },

    #[error("property '{property}' expects {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("property '{property}' has value '{value}', expected one of: {allowed}")]
    InvalidEnumValue {
        property: String,
        value: String,
        allowed: String,
    },

    #[error("property '{property}' is invalid: {reason}")]
    InvalidValue { property: String, reason: String },
}

/// Graph construction errors. Each is fatal to the single `add_*` call that raised it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate resource id: {id}")]
    DuplicateResource { id: ResourceId },

    #[error("resource '{id}' ({kind}) failed schema validation: {violation}")]
    SchemaValidation {
        id: ResourceId,
        kind: ResourceKind,
        violation: SchemaViolation,
    },

    #[error("{relation} relationship references unknown resource: {id}")]
    UnknownResource {
        id: ResourceId,
        relation: RelationKind,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate rule id: {id}")]
    DuplicateRuleId { id: String },

    #[error("invalid allow pattern for {rule_id}: {pattern}")]
    InvalidAllowPattern { rule_id: String, pattern: String },
}

/// An unexpected fault raised while a rule evaluates a graph.
///
/// The engine converts these into `engine.rule-failure` findings.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuleError {
    message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
