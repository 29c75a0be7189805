use crate::graph::ResourceGraph;
use crate::model::{
    IngressRule, IngressSource, Pattern, RelationKind, Resource, ResourceKind, Retention,
};
use crate::rule::RuleMeta;
use stackguard_types::Finding;
use std::collections::BTreeMap;

pub type Edge = (&'static str, &'static str, RelationKind);

/// Resources and edges kept apart so tests can reorder insertion.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub resources: Vec<Resource>,
    pub edges: Vec<Edge>,
}

impl Fixture {
    pub fn build(&self) -> ResourceGraph {
        graph(self.resources.clone(), &self.edges)
    }
}

pub fn graph(resources: Vec<Resource>, edges: &[Edge]) -> ResourceGraph {
    let mut b = ResourceGraph::builder();
    for r in resources {
        let id = r.id.clone();
        b.add_resource(r)
            .unwrap_or_else(|e| panic!("fixture resource {id}: {e}"));
    }
    for &(from, to, kind) in edges {
        b.add_relationship(from, to, kind)
            .unwrap_or_else(|e| panic!("fixture edge {from} -{kind}-> {to}: {e}"));
    }
    b.build()
}

pub fn finding_for(meta: &RuleMeta, resource: &Resource, message: &str) -> Finding {
    crate::rules::utils::finding(meta, resource, message)
}

pub fn any_ipv4(port: u16) -> IngressRule {
    IngressRule::port(IngressSource::AnyIpv4, port)
}

pub fn from_cidr(cidr: &str, port: u16) -> IngressRule {
    IngressRule::port(IngressSource::parse(cidr), port)
}

pub fn patterns(values: &[&str]) -> Vec<Pattern> {
    values.iter().map(|v| Pattern::parse(v)).collect()
}

pub fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn phi(resource: Resource) -> Resource {
    resource.tag("data-classification", "phi")
}

/// The annotated healthcare stack: a public-only network, an exposed
/// unencrypted patient database and bucket, an unauthenticated API in front of
/// a function with literal credentials, and a processing server open to SSH.
pub fn healthcare_fixture() -> Fixture {
    let resources = vec![
        Resource::new("HealthcareVPC", ResourceKind::Network)
            .with("cidr", "10.0.0.0/16")
            .with("flowLogsEnabled", false),
        Resource::new("PublicSubnet1", ResourceKind::Subnet)
            .with("subnetType", "public")
            .with("cidr", "10.0.0.0/24"),
        Resource::new("PublicSubnet2", ResourceKind::Subnet)
            .with("subnetType", "public")
            .with("cidr", "10.0.1.0/24"),
        Resource::new("DBSecurityGroup", ResourceKind::SecurityGroup)
            .with("ingress", vec![any_ipv4(5432)])
            .with("allowAllOutbound", true)
            .with("description", "Security group for patient database"),
        phi(Resource::new("PatientDB", ResourceKind::Database))
            .with("engine", "postgres")
            .with("port", 5432)
            .with("encrypted", false)
            .with("publiclyAccessible", true)
            .with("backupRetentionDays", 0)
            .with("deletionProtection", false)
            .with("removalPolicy", "destroy")
            .with("multiAz", false)
            .with("masterUsername", "admin")
            .with("masterPassword", "Hospital123!"),
        phi(Resource::new("PatientDataBucket", ResourceKind::ObjectStore))
            .with("encrypted", false)
            .with("publiclyAccessible", true)
            .with("versioned", false)
            .with("removalPolicy", "destroy")
            .with("autoDeleteObjects", true)
            .with("corsAllowedOrigins", patterns(&["*"])),
        Resource::new("PatientAPIFunction", ResourceKind::ComputeFunction)
            .with("runtime", "python3.9")
            .with(
                "environment",
                env(&[
                    ("DB_HOST", "${PatientDB.Endpoint.Address}"),
                    ("DB_USER", "admin"),
                    ("DB_PASSWORD", "Hospital123!"),
                    ("DB_NAME", "patients"),
                    ("EXTERNAL_API_KEY", "sk_live_1234567890abcdef"),
                ]),
            )
            .with("timeoutSeconds", 900),
        Resource::new("PatientAPIFunctionLogs", ResourceKind::LogGroup)
            .with("retention", Retention::Infinite),
        Resource::new("PatientAPIFunctionPolicy", ResourceKind::IdentityPolicy)
            .with("effect", "allow")
            .with("actions", patterns(&["*"]))
            .with("resources", patterns(&["*"])),
        Resource::new("PatientAPI/patients/GET", ResourceKind::ApiEndpoint)
            .with("method", "GET")
            .with("path", "/patients")
            .with("authorizationType", "none")
            .with("apiKeyRequired", false)
            .with("dataTraceEnabled", true),
        Resource::new("PatientAPI/patients/POST", ResourceKind::ApiEndpoint)
            .with("method", "POST")
            .with("path", "/patients")
            .with("authorizationType", "none")
            .with("dataTraceEnabled", true),
        Resource::new("APILogs", ResourceKind::LogGroup)
            .with("logGroupName", "/aws/apigateway/patient-api")
            .with("retention", Retention::Infinite),
        Resource::new("ProcessingServerSecurityGroup", ResourceKind::SecurityGroup)
            .with("ingress", vec![any_ipv4(22), any_ipv4(80)])
            .with("allowAllOutbound", true),
        phi(Resource::new("ProcessingServer", ResourceKind::VirtualMachine))
            .with("instanceType", "t3.medium")
            .with("publiclyAccessible", true)
            .with("volumeEncrypted", false)
            .with("keyName", "my-key-pair"),
        Resource::new("DatabasePassword", ResourceKind::Credential)
            .with("value", "Hospital123!")
            .with("exported", true)
            .with("description", "Database password"),
    ];

    let edges = vec![
        ("PublicSubnet1", "HealthcareVPC", RelationKind::MemberOf),
        ("PublicSubnet2", "HealthcareVPC", RelationKind::MemberOf),
        ("PatientDB", "PublicSubnet1", RelationKind::MemberOf),
        ("DBSecurityGroup", "PatientDB", RelationKind::Secures),
        ("PatientAPIFunction", "PatientDB", RelationKind::Reads),
        ("PatientAPIFunction", "PatientDB", RelationKind::Writes),
        ("PatientAPIFunction", "PatientAPIFunctionLogs", RelationKind::LogsTo),
        (
            "PatientAPIFunction",
            "PatientAPIFunctionPolicy",
            RelationKind::AttachedPolicy,
        ),
        ("PatientAPI/patients/GET", "PatientAPIFunction", RelationKind::Exposes),
        ("PatientAPI/patients/POST", "PatientAPIFunction", RelationKind::Exposes),
        ("ProcessingServer", "PublicSubnet1", RelationKind::MemberOf),
        (
            "ProcessingServerSecurityGroup",
            "ProcessingServer",
            RelationKind::Secures,
        ),
    ];

    Fixture { resources, edges }
}

pub fn healthcare_stack() -> ResourceGraph {
    healthcare_fixture().build()
}

/// The same workload with every safeguard in place.
pub fn hardened_fixture() -> Fixture {
    let resources = vec![
        Resource::new("CareVPC", ResourceKind::Network)
            .with("cidr", "10.0.0.0/16")
            .with("flowLogsEnabled", true),
        Resource::new("PublicSubnetA", ResourceKind::Subnet).with("subnetType", "public"),
        Resource::new("PrivateSubnetA", ResourceKind::Subnet).with("subnetType", "private"),
        Resource::new("IsolatedSubnetA", ResourceKind::Subnet).with("subnetType", "isolated"),
        Resource::new("LoadBalancerSecurityGroup", ResourceKind::SecurityGroup)
            .with("ingress", vec![any_ipv4(443)])
            .with("allowAllOutbound", false),
        Resource::new("AppSecurityGroup", ResourceKind::SecurityGroup)
            .with("ingress", vec![from_cidr("10.0.0.0/16", 5432)])
            .with("allowAllOutbound", false),
        Resource::new("DataKey", ResourceKind::Key)
            .with("rotationEnabled", true)
            .with("pendingWindowDays", 30),
        phi(Resource::new("PatientDB", ResourceKind::Database))
            .with("engine", "postgres")
            .with("port", 5432)
            .with("encrypted", true)
            .with("publiclyAccessible", false)
            .with("backupRetentionDays", 35)
            .with("deletionProtection", true)
            .with("removalPolicy", "snapshot")
            .with("multiAz", true)
            .with("masterUsername", "clinician_admin")
            .with(
                "masterPassword",
                "{{resolve:secretsmanager:PatientDbSecret:SecretString:password}}",
            ),
        phi(Resource::new("PatientDataBucket", ResourceKind::ObjectStore))
            .with("encrypted", true)
            .with("publiclyAccessible", false)
            .with("versioned", true)
            .with("removalPolicy", "retain")
            .with("autoDeleteObjects", false)
            .with(
                "corsAllowedOrigins",
                patterns(&["https://portal.example-health.org"]),
            )
            .with("enforceTls", true),
        Resource::new("PatientAPIFunction", ResourceKind::ComputeFunction)
            .with("runtime", "python3.12")
            .with(
                "environment",
                env(&[
                    ("DB_HOST", "${PatientDB.Endpoint.Address}"),
                    (
                        "DB_SECRET_ARN",
                        "arn:aws:secretsmanager:us-east-1:123456789012:secret:PatientDbSecret",
                    ),
                ]),
            )
            .with("environmentEncrypted", true)
            .with("timeoutSeconds", 30),
        Resource::new("PatientAPIFunctionPolicy", ResourceKind::IdentityPolicy)
            .with("effect", "allow")
            .with("actions", patterns(&["rds-data:ExecuteStatement"]))
            .with(
                "resources",
                patterns(&["arn:aws:rds:us-east-1:123456789012:db:patientdb"]),
            ),
        Resource::new("PatientAPI/patients/GET", ResourceKind::ApiEndpoint)
            .with("method", "GET")
            .with("path", "/patients")
            .with("authorizationType", "cognito")
            .with("apiKeyRequired", true)
            .with("dataTraceEnabled", false)
            .with("throttlingRateLimit", 100)
            .with("throttlingBurstLimit", 200),
        phi(Resource::new("ProcessingServer", ResourceKind::VirtualMachine))
            .with("instanceType", "t3.medium")
            .with("publiclyAccessible", false)
            .with("volumeEncrypted", true),
        Resource::new("AuditLogs", ResourceKind::LogGroup)
            .with("logGroupName", "/audit/patient-platform")
            .with("retention", Retention::Days(2557)),
        Resource::new("PatientAPIFunctionLogs", ResourceKind::LogGroup)
            .with("retention", Retention::Days(400)),
        Resource::new("DatabaseSecretRef", ResourceKind::Credential)
            .with(
                "value",
                "arn:aws:secretsmanager:us-east-1:123456789012:secret:PatientDbSecret",
            )
            .with("exported", false),
    ];

    let edges = vec![
        ("PublicSubnetA", "CareVPC", RelationKind::MemberOf),
        ("PrivateSubnetA", "CareVPC", RelationKind::MemberOf),
        ("IsolatedSubnetA", "CareVPC", RelationKind::MemberOf),
        ("PatientDB", "IsolatedSubnetA", RelationKind::MemberOf),
        ("AppSecurityGroup", "PatientDB", RelationKind::Secures),
        ("LoadBalancerSecurityGroup", "AppSecurityGroup", RelationKind::Secures),
        ("PatientDB", "DataKey", RelationKind::EncryptedWith),
        ("PatientDB", "AuditLogs", RelationKind::LogsTo),
        ("PatientDataBucket", "DataKey", RelationKind::EncryptedWith),
        ("PatientDataBucket", "AuditLogs", RelationKind::LogsTo),
        ("PatientAPIFunction", "PrivateSubnetA", RelationKind::MemberOf),
        ("PatientAPIFunction", "DataKey", RelationKind::EncryptedWith),
        ("PatientAPIFunction", "PatientDB", RelationKind::Reads),
        ("PatientAPIFunction", "PatientDataBucket", RelationKind::Writes),
        ("PatientAPIFunction", "PatientAPIFunctionLogs", RelationKind::LogsTo),
        (
            "PatientAPIFunction",
            "PatientAPIFunctionPolicy",
            RelationKind::AttachedPolicy,
        ),
        ("PatientAPI/patients/GET", "PatientAPIFunction", RelationKind::Exposes),
        ("PatientAPI/patients/GET", "AuditLogs", RelationKind::LogsTo),
        ("ProcessingServer", "PrivateSubnetA", RelationKind::MemberOf),
        ("AppSecurityGroup", "ProcessingServer", RelationKind::Secures),
        ("AuditLogs", "DataKey", RelationKind::EncryptedWith),
        ("PatientAPIFunctionLogs", "DataKey", RelationKind::EncryptedWith),
    ];

    Fixture { resources, edges }
}

pub fn hardened_stack() -> ResourceGraph {
    hardened_fixture().build()
}
