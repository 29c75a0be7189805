use crate::model::{Resource, ResourceKind};
use crate::rule::RuleMeta;
use serde_json::Value;
use stackguard_types::{Finding, ResourceId, Severity};

/// A finding against `resource` at the rule's default severity.
pub fn finding(meta: &RuleMeta, resource: &Resource, message: impl Into<String>) -> Finding {
    Finding {
        severity: meta.severity,
        rule_id: meta.id.to_string(),
        category: meta.category,
        resource_id: resource.id.clone(),
        related: Vec::new(),
        message: message.into(),
        remediation: meta.remediation.to_string(),
        tags: resource.tags.clone(),
        fingerprint: None,
        data: Value::Null,
    }
}

pub fn ids_of<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Vec<ResourceId> {
    resources.into_iter().map(|r| r.id.clone()).collect()
}

/// `sensitive` for resources holding regulated data, `otherwise` for the rest.
pub fn by_sensitivity(resource: &Resource, sensitive: Severity, otherwise: Severity) -> Severity {
    if resource.is_sensitive() {
        sensitive
    } else {
        otherwise
    }
}

/// Human label used in messages, e.g. `database 'PatientDB'`.
pub fn label(resource: &Resource) -> String {
    let kind = match resource.kind {
        ResourceKind::Network => "network",
        ResourceKind::Subnet => "subnet",
        ResourceKind::SecurityGroup => "security group",
        ResourceKind::Database => "database",
        ResourceKind::ObjectStore => "object store",
        ResourceKind::ComputeFunction => "function",
        ResourceKind::VirtualMachine => "virtual machine",
        ResourceKind::ApiEndpoint => "API endpoint",
        ResourceKind::LogGroup => "log group",
        ResourceKind::Key => "key",
        ResourceKind::IdentityPolicy => "identity policy",
        ResourceKind::Credential => "credential",
    };
    format!("{kind} '{}'", resource.id)
}

pub fn is_data_store(resource: &Resource) -> bool {
    matches!(
        resource.kind,
        ResourceKind::Database | ResourceKind::ObjectStore
    )
}

pub fn join_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
