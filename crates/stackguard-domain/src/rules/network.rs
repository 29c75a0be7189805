use super::utils::{by_sensitivity, finding, ids_of, is_data_store, join_ports, label};
use crate::graph::ResourceGraph;
use crate::model::{RelationKind, Resource, ResourceKind, SENSITIVE_PORTS};
use crate::rule::{FnRule, RuleMeta};
use serde_json::json;
use stackguard_types::{Category, Finding, Severity, ids};

const PUBLICLY_ACCESSIBLE: RuleMeta = RuleMeta {
    id: ids::RULE_NETWORK_PUBLICLY_ACCESSIBLE,
    category: Category::Network,
    severity: Severity::High,
    applies_to: &[
        ResourceKind::Database,
        ResourceKind::ObjectStore,
        ResourceKind::VirtualMachine,
    ],
    remediation: "Disable public access and reach the resource through private networking.",
};

const OPEN_INGRESS: RuleMeta = RuleMeta {
    id: ids::RULE_NETWORK_OPEN_INGRESS,
    category: Category::Network,
    severity: Severity::Critical,
    applies_to: &[ResourceKind::Database, ResourceKind::VirtualMachine],
    remediation: "Restrict ingress to known CIDR ranges or security groups; use a bastion or session manager for administration.",
};

const PUBLIC_SUBNET: RuleMeta = RuleMeta {
    id: ids::RULE_NETWORK_PUBLIC_SUBNET,
    category: Category::Network,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::Database, ResourceKind::VirtualMachine],
    remediation: "Place the resource in a private or isolated subnet.",
};

const NO_PRIVATE_SUBNET: RuleMeta = RuleMeta {
    id: ids::RULE_NETWORK_NO_PRIVATE_SUBNET,
    category: Category::Network,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::Network],
    remediation: "Add private or isolated subnets for workloads that handle regulated data.",
};

const FUNCTION_OUTSIDE_VPC: RuleMeta = RuleMeta {
    id: ids::RULE_NETWORK_FUNCTION_OUTSIDE_VPC,
    category: Category::Network,
    severity: Severity::Low,
    applies_to: &[ResourceKind::ComputeFunction],
    remediation: "Attach the function to private subnets of the network that hosts the data.",
};

const OPEN_CORS: RuleMeta = RuleMeta {
    id: ids::RULE_NETWORK_OPEN_CORS,
    category: Category::Network,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::ObjectStore],
    remediation: "List the exact origins allowed to make cross-origin requests.",
};

pub fn rules() -> Vec<FnRule> {
    vec![
        FnRule::new(PUBLICLY_ACCESSIBLE, publicly_accessible),
        FnRule::new(OPEN_INGRESS, open_ingress),
        FnRule::new(PUBLIC_SUBNET, public_subnet),
        FnRule::new(NO_PRIVATE_SUBNET, no_private_subnet),
        FnRule::new(FUNCTION_OUTSIDE_VPC, function_outside_vpc),
        FnRule::new(OPEN_CORS, open_cors),
    ]
}

fn publicly_accessible(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for kind in meta.applies_to {
        for resource in graph.resources_of_kind(*kind) {
            if resource.bool_prop("publiclyAccessible") != Some(true) {
                continue;
            }
            let mut f = finding(
                meta,
                resource,
                format!("{} is publicly accessible", label(resource)),
            );
            f.severity = by_sensitivity(resource, Severity::Critical, meta.severity);
            out.push(f);
        }
    }
}

/// Sensitive ports an unrestricted ingress rule of `sg` opens, in list order.
fn open_sensitive_ports(sg: &Resource) -> Vec<u16> {
    let ingress = sg.ingress_prop("ingress");
    SENSITIVE_PORTS
        .iter()
        .copied()
        .filter(|&port| {
            ingress
                .iter()
                .any(|rule| rule.source.is_unrestricted() && rule.covers(port))
        })
        .collect()
}

fn open_ingress(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for kind in meta.applies_to {
        for target in graph.resources_of_kind(*kind) {
            let exposing = graph.reachable_from(target.id.as_str(), RelationKind::Secures, |r| {
                r.kind == ResourceKind::SecurityGroup && !open_sensitive_ports(r).is_empty()
            });
            let Some(sg) = exposing else {
                continue;
            };
            let ports = open_sensitive_ports(sg);
            let mut f = finding(
                meta,
                target,
                format!(
                    "{} is reachable from the internet through {} on port(s) {}",
                    label(target),
                    label(sg),
                    join_ports(&ports)
                ),
            );
            f.related = vec![sg.id.clone()];
            f.data = json!({ "security_group": sg.id, "ports": ports });
            out.push(f);
        }
    }
}

fn public_subnet(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for kind in meta.applies_to {
        for resource in graph.resources_of_kind(*kind) {
            let public: Vec<&Resource> = graph
                .relationships_from(resource.id.as_str(), RelationKind::MemberOf)
                .into_iter()
                .filter(|s| {
                    s.kind == ResourceKind::Subnet && s.text_prop("subnetType") == Some("public")
                })
                .collect();
            if public.is_empty() {
                continue;
            }
            let mut f = finding(
                meta,
                resource,
                format!("{} is placed in a public subnet", label(resource)),
            );
            f.severity = by_sensitivity(resource, Severity::High, meta.severity);
            f.related = ids_of(public);
            out.push(f);
        }
    }
}

fn no_private_subnet(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for network in graph.resources_of_kind(ResourceKind::Network) {
        let subnets: Vec<&Resource> = graph
            .relationships_to(network.id.as_str(), RelationKind::MemberOf)
            .into_iter()
            .filter(|s| s.kind == ResourceKind::Subnet)
            .collect();
        let segmented = subnets
            .iter()
            .any(|s| matches!(s.text_prop("subnetType"), Some("private" | "isolated")));
        if segmented {
            continue;
        }
        let mut f = finding(
            meta,
            network,
            format!(
                "{} has no private or isolated subnet ({} subnet(s) declared)",
                label(network),
                subnets.len()
            ),
        );
        f.related = ids_of(subnets);
        out.push(f);
    }
}

fn function_outside_vpc(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for func in graph.resources_of_kind(ResourceKind::ComputeFunction) {
        let in_subnet = graph
            .relationships_from(func.id.as_str(), RelationKind::MemberOf)
            .iter()
            .any(|s| s.kind == ResourceKind::Subnet);
        if in_subnet {
            continue;
        }
        let mut stores: Vec<&Resource> = Vec::new();
        for relation in [RelationKind::Reads, RelationKind::Writes] {
            for store in graph.relationships_from(func.id.as_str(), relation) {
                if is_data_store(store) && store.is_sensitive() && !stores.contains(&store) {
                    stores.push(store);
                }
            }
        }
        if stores.is_empty() {
            continue;
        }
        let mut f = finding(
            meta,
            func,
            format!(
                "{} accesses sensitive data but runs outside any private network",
                label(func)
            ),
        );
        f.related = ids_of(stores);
        out.push(f);
    }
}

fn open_cors(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for store in graph.resources_of_kind(ResourceKind::ObjectStore) {
        if store.patterns_prop("corsAllowedOrigins").iter().any(|p| p.is_any()) {
            out.push(finding(
                meta,
                store,
                format!(
                    "{} allows cross-origin requests from any origin",
                    label(store)
                ),
            ));
        }
    }
}
