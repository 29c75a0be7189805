use super::utils::{by_sensitivity, finding, label};
use crate::graph::ResourceGraph;
use crate::model::{RelationKind, ResourceKind, Retention};
use crate::rule::{FnRule, RuleMeta};
use serde_json::json;
use stackguard_types::{Category, Finding, Severity, ids};

const LOG_RETENTION: RuleMeta = RuleMeta {
    id: ids::RULE_AUDIT_LOG_RETENTION,
    category: Category::Audit,
    severity: Severity::Low,
    applies_to: &[ResourceKind::LogGroup],
    remediation: "Set a finite retention period that matches your records-retention policy.",
};

const MISSING_ACCESS_LOG: RuleMeta = RuleMeta {
    id: ids::RULE_AUDIT_MISSING_ACCESS_LOG,
    category: Category::Audit,
    severity: Severity::Medium,
    applies_to: &[
        ResourceKind::Database,
        ResourceKind::ObjectStore,
        ResourceKind::ApiEndpoint,
    ],
    remediation: "Send access logs to a dedicated, protected log destination.",
};

const OBJECT_VERSIONING: RuleMeta = RuleMeta {
    id: ids::RULE_AUDIT_OBJECT_VERSIONING,
    category: Category::Audit,
    severity: Severity::Low,
    applies_to: &[ResourceKind::ObjectStore],
    remediation: "Enable object versioning to keep an audit trail of changes.",
};

const ENDPOINT_DATA_TRACE: RuleMeta = RuleMeta {
    id: ids::RULE_AUDIT_ENDPOINT_DATA_TRACE,
    category: Category::Audit,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::ApiEndpoint],
    remediation: "Disable full request/response logging; log metadata only.",
};

const NETWORK_FLOW_LOGS: RuleMeta = RuleMeta {
    id: ids::RULE_AUDIT_NETWORK_FLOW_LOGS,
    category: Category::Audit,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::Network],
    remediation: "Enable flow logs on the network and deliver them to a protected log group.",
};

pub fn rules() -> Vec<FnRule> {
    vec![
        FnRule::new(LOG_RETENTION, log_retention),
        FnRule::new(MISSING_ACCESS_LOG, missing_access_log),
        FnRule::new(OBJECT_VERSIONING, object_versioning),
        FnRule::new(ENDPOINT_DATA_TRACE, endpoint_data_trace),
        FnRule::new(NETWORK_FLOW_LOGS, network_flow_logs),
    ]
}

fn log_retention(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for group in graph.resources_of_kind(ResourceKind::LogGroup) {
        // Log groups without a retention setting never expire.
        let retention = group
            .retention_prop("retention")
            .unwrap_or(Retention::Infinite);
        let problem = match retention {
            Retention::Infinite => "never expires",
            Retention::Days(0) => "discards logs immediately",
            Retention::Days(_) => continue,
        };
        let mut f = finding(meta, group, format!("{} {problem}", label(group)));
        f.data = json!({
            "retention_days": match retention {
                Retention::Days(d) => json!(d),
                Retention::Infinite => json!("infinite"),
            },
        });
        out.push(f);
    }
}

fn missing_access_log(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for kind in meta.applies_to {
        for resource in graph.resources_of_kind(*kind) {
            let logged = graph
                .relationships_from(resource.id.as_str(), RelationKind::LogsTo)
                .iter()
                .any(|r| r.kind == ResourceKind::LogGroup);
            if logged {
                continue;
            }
            let mut f = finding(
                meta,
                resource,
                format!("{} has no access logging", label(resource)),
            );
            f.severity = by_sensitivity(resource, Severity::High, meta.severity);
            out.push(f);
        }
    }
}

fn object_versioning(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for store in graph.resources_of_kind(ResourceKind::ObjectStore) {
        if store.bool_prop("versioned") != Some(true) {
            out.push(finding(
                meta,
                store,
                format!("{} does not keep object versions", label(store)),
            ));
        }
    }
}

fn endpoint_data_trace(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for endpoint in graph.resources_of_kind(ResourceKind::ApiEndpoint) {
        if endpoint.bool_prop("dataTraceEnabled") == Some(true) {
            out.push(finding(
                meta,
                endpoint,
                format!(
                    "{} logs full request and response payloads",
                    label(endpoint)
                ),
            ));
        }
    }
}

fn network_flow_logs(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for network in graph.resources_of_kind(ResourceKind::Network) {
        if network.bool_prop("flowLogsEnabled") != Some(true) {
            out.push(finding(
                meta,
                network,
                format!("{} has no flow logs", label(network)),
            ));
        }
    }
}
