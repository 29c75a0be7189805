use super::secrets::{literal_secret, redact};
use super::utils::{finding, ids_of, is_data_store, label};
use crate::graph::ResourceGraph;
use crate::model::{RelationKind, Resource, ResourceKind};
use crate::rule::{FnRule, RuleMeta};
use serde_json::json;
use stackguard_types::{Category, Finding, Severity, ids};

const WILDCARD_POLICY: RuleMeta = RuleMeta {
    id: ids::RULE_IDENTITY_WILDCARD_POLICY,
    category: Category::Identity,
    severity: Severity::High,
    applies_to: &[ResourceKind::IdentityPolicy],
    remediation: "Grant only the specific actions on the specific resources the principal needs.",
};

const HARDCODED_SECRET: RuleMeta = RuleMeta {
    id: ids::RULE_IDENTITY_HARDCODED_SECRET,
    category: Category::Identity,
    severity: Severity::Critical,
    applies_to: &[
        ResourceKind::ComputeFunction,
        ResourceKind::Database,
        ResourceKind::Credential,
    ],
    remediation: "Store the value in a secrets manager and reference it instead of embedding it.",
};

const UNAUTHENTICATED_ENDPOINT: RuleMeta = RuleMeta {
    id: ids::RULE_IDENTITY_UNAUTHENTICATED_ENDPOINT,
    category: Category::Identity,
    severity: Severity::Critical,
    applies_to: &[ResourceKind::ApiEndpoint],
    remediation: "Require IAM, Cognito or a custom authorizer on every method that reaches regulated data.",
};

const EXPORTED_CREDENTIAL: RuleMeta = RuleMeta {
    id: ids::RULE_IDENTITY_EXPORTED_CREDENTIAL,
    category: Category::Identity,
    severity: Severity::High,
    applies_to: &[ResourceKind::Credential],
    remediation: "Do not publish credentials as stack outputs; share a secret reference instead.",
};

const ENDPOINT_API_KEY: RuleMeta = RuleMeta {
    id: ids::RULE_IDENTITY_ENDPOINT_API_KEY,
    category: Category::Identity,
    severity: Severity::Medium,
    applies_to: &[ResourceKind::ApiEndpoint],
    remediation: "Attach an authorizer, or require an API key with a usage plan.",
};

pub fn rules() -> Vec<FnRule> {
    vec![
        FnRule::new(WILDCARD_POLICY, wildcard_policy),
        FnRule::new(HARDCODED_SECRET, hardcoded_secret),
        FnRule::new(UNAUTHENTICATED_ENDPOINT, unauthenticated_endpoint),
        FnRule::new(EXPORTED_CREDENTIAL, exported_credential),
        FnRule::new(ENDPOINT_API_KEY, endpoint_api_key),
    ]
}

fn wildcard_policy(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for policy in graph.resources_of_kind(ResourceKind::IdentityPolicy) {
        // Statements default to allow when no effect is declared.
        if policy.text_prop("effect") == Some("deny") {
            continue;
        }
        let any_action = policy.patterns_prop("actions").iter().any(|p| p.is_any());
        let any_resource = policy.patterns_prop("resources").iter().any(|p| p.is_any());
        if !any_action && !any_resource {
            continue;
        }

        let principals = graph.relationships_to(policy.id.as_str(), RelationKind::AttachedPolicy);
        let scope = match (any_action, any_resource) {
            (true, true) => "every action on every resource",
            (true, false) => "every action",
            _ => "access to every resource",
        };
        let mut f = finding(meta, policy, format!("{} allows {scope}", label(policy)));
        if !principals.is_empty() {
            f.severity = Severity::Critical;
        }
        f.data = json!({
            "wildcard_actions": any_action,
            "wildcard_resources": any_resource,
            "attached": !principals.is_empty(),
        });
        f.related = ids_of(principals);
        out.push(f);
    }
}

/// Names of the literal secrets declared by `resource`, paired with the reason.
fn literal_secrets(resource: &Resource) -> Vec<(String, &'static str)> {
    let mut found = Vec::new();
    match resource.kind {
        ResourceKind::ComputeFunction => {
            if let Some(env) = resource.map_prop("environment") {
                for (name, value) in env {
                    if let Some(kind) = literal_secret(name, value) {
                        found.push((name.clone(), kind.as_str()));
                    }
                }
            }
        }
        ResourceKind::Database => {
            if let Some(value) = resource.text_prop("masterPassword")
                && let Some(kind) = literal_secret("masterPassword", value)
            {
                found.push(("masterPassword".to_string(), kind.as_str()));
            }
        }
        ResourceKind::Credential => {
            // A credential resource holds a secret by definition, so any
            // non-reference literal counts regardless of its shape.
            if let Some(value) = resource.text_prop("value")
                && let Some(kind) = literal_secret("password", value)
            {
                found.push(("value".to_string(), kind.as_str()));
            }
        }
        _ => {}
    }
    found
}

fn hardcoded_secret(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for kind in meta.applies_to {
        for resource in graph.resources_of_kind(*kind) {
            let secrets = literal_secrets(resource);
            if secrets.is_empty() {
                continue;
            }
            let names: Vec<&str> = secrets.iter().map(|(n, _)| n.as_str()).collect();
            let mut f = finding(
                meta,
                resource,
                format!(
                    "{} embeds literal credential(s) in {}",
                    label(resource),
                    names.join(", ")
                ),
            );
            f.data = json!({
                "secrets": secrets
                    .iter()
                    .map(|(name, reason)| json!({
                        "name": name,
                        "reason": reason,
                        "value": redact(secret_value(resource, name)),
                    }))
                    .collect::<Vec<_>>(),
            });
            out.push(f);
        }
    }
}

fn secret_value<'a>(resource: &'a Resource, name: &str) -> &'a str {
    match resource.kind {
        ResourceKind::ComputeFunction => resource
            .map_prop("environment")
            .and_then(|env| env.get(name))
            .map(String::as_str)
            .unwrap_or_default(),
        _ => resource.text_prop(name).unwrap_or_default(),
    }
}

/// First sensitive store reachable through an exposed function: `(function, store)`.
fn exposed_sensitive_store<'g>(
    graph: &'g ResourceGraph,
    endpoint: &Resource,
) -> Option<(&'g Resource, &'g Resource)> {
    for func in graph.relationships_from(endpoint.id.as_str(), RelationKind::Exposes) {
        if func.kind != ResourceKind::ComputeFunction {
            continue;
        }
        for relation in [RelationKind::Reads, RelationKind::Writes] {
            let store = graph
                .relationships_from(func.id.as_str(), relation)
                .into_iter()
                .find(|s| is_data_store(s) && s.is_sensitive());
            if let Some(store) = store {
                return Some((func, store));
            }
        }
    }
    None
}

fn unauthenticated_endpoint(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for endpoint in graph.resources_of_kind(ResourceKind::ApiEndpoint) {
        let authorization = endpoint.text_prop("authorizationType");
        if !matches!(authorization, None | Some("none")) {
            continue;
        }
        let Some((func, store)) = exposed_sensitive_store(graph, endpoint) else {
            continue;
        };
        let mut f = finding(
            meta,
            endpoint,
            format!(
                "{} has no authorization but reaches sensitive {} through {}",
                label(endpoint),
                label(store),
                label(func)
            ),
        );
        f.related = vec![func.id.clone(), store.id.clone()];
        f.data = json!({
            "authorization_type": authorization.unwrap_or("none"),
            "function": func.id,
            "store": store.id,
        });
        out.push(f);
    }
}

fn exported_credential(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for credential in graph.resources_of_kind(ResourceKind::Credential) {
        if credential.bool_prop("exported") == Some(true) {
            out.push(finding(
                meta,
                credential,
                format!("{} is exported as a stack output", label(credential)),
            ));
        }
    }
}

fn endpoint_api_key(meta: &RuleMeta, graph: &ResourceGraph, out: &mut Vec<Finding>) {
    for endpoint in graph.resources_of_kind(ResourceKind::ApiEndpoint) {
        let authorization = endpoint.text_prop("authorizationType");
        if !matches!(authorization, None | Some("none")) {
            continue;
        }
        if endpoint.bool_prop("apiKeyRequired") == Some(true) {
            continue;
        }
        out.push(finding(
            meta,
            endpoint,
            format!(
                "{} accepts anonymous callers without an API key",
                label(endpoint)
            ),
        ));
    }
}
