use super::utils::{by_sensitivity, finding, join_ports, label};
use crate::graph::ResourceGraph;
use crate::model::{PLAINTEXT_PORTS, RelationKind, ResourceKind};
use crate::rule::{FnRule, RuleMeta};
use serde_json::json;
use stackguard_types::{Category, Finding, Severity, ids};

const STORAGE_AT_REST: RuleMeta = RuleMeta {
    id: ids::RULE_ENCRYPTION_STORAGE_AT_REST,
    category: Category::Encryption,
    severity: Severity::High,
    applies_to: &[ResourceKind::Database, ResourceKind::ObjectStore],
    remediation: "Enable encryption at rest, preferably with a customer-managed key.",
};

const VOLUME_AT_REST: RuleMeta = RuleMeta {
    id: ids::RULE_ENCRYPTION_VOLUME_AT_REST,
    category: Category::Encryption,
    severity: Severity::High,
    applies_to: &[ResourceKind::VirtualMachine],
    remediation: "Encrypt every block device attached to the instance.",
};

const LOG_GROUP_KEY: RuleMeta = RuleMeta {
    id: ids::RULE_ENCRYPTION_LOG_GROUP_KEY,
    category: Category::Encryption,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::LogGroup],
    remediation: "Associate the log group with a KMS key.",
};

const FUNCTION_ENVIRONMENT: RuleMeta = RuleMeta {
    id: ids::RULE_ENCRYPTION_FUNCTION_ENVIRONMENT,
    category: Category::Encryption,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::ComputeFunction],
    remediation: "Encrypt environment variables with a customer-managed key.",
};

const KEY_ROTATION: RuleMeta = RuleMeta {
    id: ids::RULE_ENCRYPTION_KEY_ROTATION,
    category: Category::Encryption,
    severity: Severity::Low,
    applies_to: &[ResourceKind::Key],
    remediation: "Enable automatic key rotation.",
};

const PLAINTEXT_INGRESS: RuleMeta = RuleMeta {
    id: ids::RULE_ENCRYPTION_PLAINTEXT_INGRESS,
    category: Category::Encryption,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::SecurityGroup],
    remediation: "Serve traffic over TLS only and remove plaintext listeners from public sources.",
};

const TRANSIT_TLS: RuleMeta = RuleMeta {
    id: ids::RULE_ENCRYPTION_TRANSIT_TLS,
    category: Category::Encryption,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::ObjectStore],
    remediation: "Deny every request that is not made over TLS.",
};

pub fn rules() -> Vec<FnRule> {
    vec![
        FnRule::new(STORAGE_AT_REST, storage_at_rest),
        FnRule::new(VOLUME_AT_REST, volume_at_rest),
        FnRule::new(LOG_GROUP_KEY, log_group_key),
        FnRule::new(FUNCTION_ENVIRONMENT, function_environment),
        FnRule::new(KEY_ROTATION, key_rotation),
        FnRule::new(PLAINTEXT_INGRESS, plaintext_ingress),
        FnRule::new(TRANSIT_TLS, transit_tls),
    ]
}

fn storage_at_rest(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for kind in [ResourceKind::Database, ResourceKind::ObjectStore] {
        for store in graph.resources_of_kind(kind) {
            let encrypted = store.bool_prop("encrypted");
            if encrypted == Some(true) {
                continue;
            }
            let mut f = finding(
                meta,
                store,
                format!("{} stores data unencrypted at rest", label(store)),
            );
            f.severity = by_sensitivity(store, Severity::Critical, meta.severity);
            f.data = json!({
                "kind": store.kind,
                "encrypted": encrypted,
                "sensitive": store.is_sensitive(),
            });
            out.push(f);
        }
    }
}

fn volume_at_rest(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for vm in graph.resources_of_kind(ResourceKind::VirtualMachine) {
        if vm.bool_prop("volumeEncrypted") == Some(true) {
            continue;
        }
        out.push(finding(
            meta,
            vm,
            format!("{} has unencrypted block storage", label(vm)),
        ));
    }
}

fn log_group_key(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for group in graph.resources_of_kind(ResourceKind::LogGroup) {
        let keyed = graph
            .relationships_from(group.id.as_str(), RelationKind::EncryptedWith)
            .iter()
            .any(|k| k.kind == ResourceKind::Key);
        if !keyed {
            out.push(finding(
                meta,
                group,
                format!("{} is not encrypted with a managed key", label(group)),
            ));
        }
    }
}

fn function_environment(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for func in graph.resources_of_kind(ResourceKind::ComputeFunction) {
        let Some(env) = func.map_prop("environment") else {
            continue;
        };
        if env.is_empty() {
            continue;
        }
        let encrypted = func.bool_prop("environmentEncrypted") == Some(true)
            || graph.has_relationship_from(func.id.as_str(), RelationKind::EncryptedWith);
        if encrypted {
            continue;
        }
        let mut f = finding(
            meta,
            func,
            format!(
                "{} keeps {} environment variable(s) without a customer-managed key",
                label(func),
                env.len()
            ),
        );
        f.data = json!({ "variables": env.keys().collect::<Vec<_>>() });
        out.push(f);
    }
}

fn key_rotation(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for key in graph.resources_of_kind(ResourceKind::Key) {
        if key.bool_prop("rotationEnabled") != Some(true) {
            out.push(finding(
                meta,
                key,
                format!("{} does not rotate automatically", label(key)),
            ));
        }
    }
}

fn plaintext_ingress(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for sg in graph.resources_of_kind(ResourceKind::SecurityGroup) {
        let ports: Vec<u16> = PLAINTEXT_PORTS
            .iter()
            .copied()
            .filter(|&port| {
                sg.ingress_prop("ingress")
                    .iter()
                    .any(|rule| rule.source.is_unrestricted() && rule.covers(port))
            })
            .collect();
        if ports.is_empty() {
            continue;
        }
        let mut f = finding(
            meta,
            sg,
            format!(
                "{} accepts plaintext traffic from anywhere on port(s) {}",
                label(sg),
                join_ports(&ports)
            ),
        );
        f.data = json!({ "ports": ports });
        out.push(f);
    }
}

fn transit_tls(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for store in graph.resources_of_kind(ResourceKind::ObjectStore) {
        if store.bool_prop("enforceTls") == Some(true) {
            continue;
        }
        let mut f = finding(
            meta,
            store,
            format!("{} accepts requests without TLS", label(store)),
        );
        f.severity = by_sensitivity(store, Severity::High, meta.severity);
        out.push(f);
    }
}
