//! Explain registry for rules.
//!
//! Maps rule IDs to human-readable explanations with remediation guidance.
//! Examples are written as CDK (TypeScript) snippets because that is the most
//! common source of the graphs stackguard evaluates; the guidance applies to
//! any toolchain that produces the same resources.

use crate::ids;

/// Explanation entry for a rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule detects and why it matters for regulated data.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after declaration examples.
    pub examples: ExamplePair,
}

/// Before and after declaration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Declaration that would trigger a finding.
    pub before: &'static str,
    /// Declaration that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule id.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_ENCRYPTION_STORAGE_AT_REST => Some(explain_storage_at_rest()),
        ids::RULE_ENCRYPTION_VOLUME_AT_REST => Some(explain_volume_at_rest()),
        ids::RULE_ENCRYPTION_LOG_GROUP_KEY => Some(explain_log_group_key()),
        ids::RULE_ENCRYPTION_FUNCTION_ENVIRONMENT => Some(explain_function_environment()),
        ids::RULE_ENCRYPTION_KEY_ROTATION => Some(explain_key_rotation()),
        ids::RULE_ENCRYPTION_PLAINTEXT_INGRESS => Some(explain_plaintext_ingress()),
        ids::RULE_ENCRYPTION_TRANSIT_TLS => Some(explain_transit_tls()),

        ids::RULE_NETWORK_PUBLICLY_ACCESSIBLE => Some(explain_publicly_accessible()),
        ids::RULE_NETWORK_OPEN_INGRESS => Some(explain_open_ingress()),
        ids::RULE_NETWORK_PUBLIC_SUBNET => Some(explain_public_subnet()),
        ids::RULE_NETWORK_NO_PRIVATE_SUBNET => Some(explain_no_private_subnet()),
        ids::RULE_NETWORK_FUNCTION_OUTSIDE_VPC => Some(explain_function_outside_vpc()),
        ids::RULE_NETWORK_OPEN_CORS => Some(explain_open_cors()),

        ids::RULE_IDENTITY_WILDCARD_POLICY => Some(explain_wildcard_policy()),
        ids::RULE_IDENTITY_HARDCODED_SECRET => Some(explain_hardcoded_secret()),
        ids::RULE_IDENTITY_UNAUTHENTICATED_ENDPOINT => Some(explain_unauthenticated_endpoint()),
        ids::RULE_IDENTITY_EXPORTED_CREDENTIAL => Some(explain_exported_credential()),
        ids::RULE_IDENTITY_ENDPOINT_API_KEY => Some(explain_endpoint_api_key()),

        ids::RULE_AUDIT_LOG_RETENTION => Some(explain_log_retention()),
        ids::RULE_AUDIT_MISSING_ACCESS_LOG => Some(explain_missing_access_log()),
        ids::RULE_AUDIT_OBJECT_VERSIONING => Some(explain_object_versioning()),
        ids::RULE_AUDIT_ENDPOINT_DATA_TRACE => Some(explain_endpoint_data_trace()),
        ids::RULE_AUDIT_NETWORK_FLOW_LOGS => Some(explain_network_flow_logs()),

        ids::RULE_RESILIENCE_BACKUP_RETENTION => Some(explain_backup_retention()),
        ids::RULE_RESILIENCE_DELETION_PROTECTION => Some(explain_deletion_protection()),
        ids::RULE_RESILIENCE_MULTI_AZ => Some(explain_multi_az()),
        ids::RULE_RESILIENCE_ENDPOINT_THROTTLING => Some(explain_endpoint_throttling()),
        ids::RULE_RESILIENCE_FUNCTION_TIMEOUT => Some(explain_function_timeout()),

        ids::RULE_ENGINE_RULE_FAILURE => Some(explain_rule_failure()),

        _ => None,
    }
}

/// List all known rule IDs (engine-level IDs excluded).
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_ENCRYPTION_STORAGE_AT_REST,
        ids::RULE_ENCRYPTION_VOLUME_AT_REST,
        ids::RULE_ENCRYPTION_LOG_GROUP_KEY,
        ids::RULE_ENCRYPTION_FUNCTION_ENVIRONMENT,
        ids::RULE_ENCRYPTION_KEY_ROTATION,
        ids::RULE_ENCRYPTION_PLAINTEXT_INGRESS,
        ids::RULE_ENCRYPTION_TRANSIT_TLS,
        ids::RULE_NETWORK_PUBLICLY_ACCESSIBLE,
        ids::RULE_NETWORK_OPEN_INGRESS,
        ids::RULE_NETWORK_PUBLIC_SUBNET,
        ids::RULE_NETWORK_NO_PRIVATE_SUBNET,
        ids::RULE_NETWORK_FUNCTION_OUTSIDE_VPC,
        ids::RULE_NETWORK_OPEN_CORS,
        ids::RULE_IDENTITY_WILDCARD_POLICY,
        ids::RULE_IDENTITY_HARDCODED_SECRET,
        ids::RULE_IDENTITY_UNAUTHENTICATED_ENDPOINT,
        ids::RULE_IDENTITY_EXPORTED_CREDENTIAL,
        ids::RULE_IDENTITY_ENDPOINT_API_KEY,
        ids::RULE_AUDIT_LOG_RETENTION,
        ids::RULE_AUDIT_MISSING_ACCESS_LOG,
        ids::RULE_AUDIT_OBJECT_VERSIONING,
        ids::RULE_AUDIT_ENDPOINT_DATA_TRACE,
        ids::RULE_AUDIT_NETWORK_FLOW_LOGS,
        ids::RULE_RESILIENCE_BACKUP_RETENTION,
        ids::RULE_RESILIENCE_DELETION_PROTECTION,
        ids::RULE_RESILIENCE_MULTI_AZ,
        ids::RULE_RESILIENCE_ENDPOINT_THROTTLING,
        ids::RULE_RESILIENCE_FUNCTION_TIMEOUT,
    ]
}

// --- Encryption ---

fn explain_storage_at_rest() -> Explanation {
    Explanation {
        title: "Storage Encrypted at Rest",
        description: "\
Detects databases and object stores whose `encrypted` property is false or was never set.

Unencrypted storage exposes every record to anyone who obtains a snapshot, a backup,
or the underlying disks. For health records this is a direct breach of the
encryption-at-rest safeguard. A store tagged with a sensitive data classification is
reported as critical; other stores as high.",
        remediation: "\
Enable storage encryption, preferably with a customer-managed key:
- RDS: `storageEncrypted: true` and `storageEncryptionKey`
- S3: `encryption: BucketEncryption.KMS` with an `encryptionKey`",
        examples: ExamplePair {
            before: r#"new rds.DatabaseInstance(this, 'PatientDB', {
  storageEncrypted: false,
});"#,
            after: r#"new rds.DatabaseInstance(this, 'PatientDB', {
  storageEncrypted: true,
  storageEncryptionKey: phiKey,
});"#,
        },
    }
}

fn explain_volume_at_rest() -> Explanation {
    Explanation {
        title: "Instance Volumes Encrypted at Rest",
        description: "\
Detects virtual machines whose block volumes are not encrypted.

Instances that process regulated data write it to local volumes (swap, temp files,
caches). Unencrypted volumes and their snapshots leak that data.",
        remediation: "\
Set `encrypted: true` on every block device, or enable account-level EBS encryption by default.",
        examples: ExamplePair {
            before: r#"volume: ec2.BlockDeviceVolume.ebs(20, { encrypted: false })"#,
            after: r#"volume: ec2.BlockDeviceVolume.ebs(20, { encrypted: true, kmsKey: phiKey })"#,
        },
    }
}

fn explain_log_group_key() -> Explanation {
    Explanation {
        title: "Log Groups Encrypted with a Managed Key",
        description: "\
Detects log groups that are not linked to an encryption key.

Application and access logs routinely capture identifiers, request payloads and error
details. Without a customer-managed key there is no way to restrict or audit who can
decrypt them.",
        remediation: "\
Pass an `encryptionKey` to the log group and grant the logs service principal use of the key.",
        examples: ExamplePair {
            before: r#"new logs.LogGroup(this, 'APILogs', { encryptionKey: undefined });"#,
            after: r#"new logs.LogGroup(this, 'APILogs', { encryptionKey: logsKey });"#,
        },
    }
}

fn explain_function_environment() -> Explanation {
    Explanation {
        title: "Function Environment Encrypted",
        description: "\
Detects compute functions that declare environment variables without encrypting them
with a customer-managed key.

Environment variables are visible to anyone with read access to the function
configuration. They frequently carry connection details for data stores.",
        remediation: "\
Set `environmentEncryption` to a customer-managed key, and move secrets out of the
environment entirely (see `identity.hardcoded-secret`).",
        examples: ExamplePair {
            before: r#"new lambda.Function(this, 'PatientAPI', { environment: { DB_HOST: host } });"#,
            after: r#"new lambda.Function(this, 'PatientAPI', {
  environment: { DB_HOST: host },
  environmentEncryption: fnKey,
});"#,
        },
    }
}

fn explain_key_rotation() -> Explanation {
    Explanation {
        title: "Key Rotation Enabled",
        description: "\
Detects encryption keys without automatic rotation.

Long-lived key material widens the impact of a key compromise.",
        remediation: "Set `enableKeyRotation: true` on the key.",
        examples: ExamplePair {
            before: r#"new kms.Key(this, 'PhiKey');"#,
            after: r#"new kms.Key(this, 'PhiKey', { enableKeyRotation: true });"#,
        },
    }
}

fn explain_plaintext_ingress() -> Explanation {
    Explanation {
        title: "No Plaintext Protocols from the Internet",
        description: "\
Detects security groups that accept traffic from any address on plaintext protocol
ports (HTTP 80, FTP 21, Telnet 23).

Data sent over these protocols travels unencrypted across the public internet.",
        remediation: "\
Serve HTTPS (443) only, terminate TLS at a load balancer, and remove plaintext ingress rules.",
        examples: ExamplePair {
            before: r#"instance.connections.allowFromAnyIpv4(ec2.Port.tcp(80));"#,
            after: r#"alb.connections.allowFromAnyIpv4(ec2.Port.tcp(443));"#,
        },
    }
}

fn explain_transit_tls() -> Explanation {
    Explanation {
        title: "Object Stores Require TLS",
        description: "\
Detects object stores that do not deny requests made over plain HTTP.

Without a TLS-only bucket policy, clients and misconfigured integrations can read or
upload objects in cleartext.",
        remediation: "Set `enforceSSL: true` so the bucket policy denies non-TLS requests.",
        examples: ExamplePair {
            before: r#"new s3.Bucket(this, 'PatientDataBucket', { enforceSSL: false });"#,
            after: r#"new s3.Bucket(this, 'PatientDataBucket', { enforceSSL: true });"#,
        },
    }
}

// --- Network ---

fn explain_publicly_accessible() -> Explanation {
    Explanation {
        title: "No Publicly Accessible Data Resources",
        description: "\
Detects databases, object stores and virtual machines flagged as publicly accessible.

A publicly accessible resource gets an internet-routable endpoint (or public read
access for stores). Any weakness in its authentication is then exploitable from anywhere.",
        remediation: "\
Set `publiclyAccessible: false` (databases), remove `publicReadAccess` and enable
`blockPublicAccess` (buckets), and reach instances through a bastion or session manager.",
        examples: ExamplePair {
            before: r#"new rds.DatabaseInstance(this, 'PatientDB', { publiclyAccessible: true });"#,
            after: r#"new rds.DatabaseInstance(this, 'PatientDB', { publiclyAccessible: false });"#,
        },
    }
}

fn explain_open_ingress() -> Explanation {
    Explanation {
        title: "No Sensitive Ports Open to the Internet",
        description: "\
Detects databases and virtual machines reachable, through one or more security groups,
from an ingress rule that accepts any source address (`0.0.0.0/0` or `::/0`) on a
sensitive port such as SSH (22), RDP (3389), PostgreSQL (5432) or MySQL (3306).

The rule follows chains of security groups, so a database secured by a group that
trusts an internet-facing group is reported too.",
        remediation: "\
Restrict ingress to known CIDR ranges or to other security groups, and use a
session manager instead of SSH from the internet.",
        examples: ExamplePair {
            before: r#"dbSecurityGroup.addIngressRule(ec2.Peer.anyIpv4(), ec2.Port.tcp(5432));"#,
            after: r#"dbSecurityGroup.addIngressRule(appSecurityGroup, ec2.Port.tcp(5432));"#,
        },
    }
}

fn explain_public_subnet() -> Explanation {
    Explanation {
        title: "Data Resources in Private Subnets",
        description: "\
Detects databases and virtual machines placed in public subnets.

Public subnets route directly to an internet gateway, removing a layer of network
isolation between regulated data and the internet.",
        remediation: "\
Place the resource in `PRIVATE_WITH_EGRESS` or `PRIVATE_ISOLATED` subnets.",
        examples: ExamplePair {
            before: r#"vpcSubnets: { subnetType: ec2.SubnetType.PUBLIC }"#,
            after: r#"vpcSubnets: { subnetType: ec2.SubnetType.PRIVATE_ISOLATED }"#,
        },
    }
}

fn explain_no_private_subnet() -> Explanation {
    Explanation {
        title: "Networks Provide Private Subnets",
        description: "\
Detects networks that have no private or isolated subnet.

Without a private tier every workload in the network is placed in a public subnet,
so segmentation of regulated data is impossible.",
        remediation: "Add private and isolated subnet configurations to the network.",
        examples: ExamplePair {
            before: r#"subnetConfiguration: [{ name: 'Public', subnetType: ec2.SubnetType.PUBLIC }]"#,
            after: r#"subnetConfiguration: [
  { name: 'Public', subnetType: ec2.SubnetType.PUBLIC },
  { name: 'Data', subnetType: ec2.SubnetType.PRIVATE_ISOLATED },
]"#,
        },
    }
}

fn explain_function_outside_vpc() -> Explanation {
    Explanation {
        title: "Functions Handling Sensitive Data Run in a Network",
        description: "\
Detects compute functions that read or write a sensitive store but are not attached to
any subnet.

Such functions reach the store over public endpoints and cannot be constrained by
security groups or network flow logging.",
        remediation: "Attach the function to private subnets with `vpc` and `vpcSubnets`.",
        examples: ExamplePair {
            before: r#"new lambda.Function(this, 'PatientAPI', { /* no vpc */ });"#,
            after: r#"new lambda.Function(this, 'PatientAPI', {
  vpc,
  vpcSubnets: { subnetType: ec2.SubnetType.PRIVATE_WITH_EGRESS },
});"#,
        },
    }
}

fn explain_open_cors() -> Explanation {
    Explanation {
        title: "No Wildcard CORS Origins",
        description: "\
Detects object stores whose CORS configuration allows every origin.

Any website can then issue browser requests against the store with a user's
credentials or presigned URLs.",
        remediation: "List the exact application origins in `allowedOrigins`.",
        examples: ExamplePair {
            before: r#"cors: [{ allowedOrigins: ['*'], allowedMethods: [s3.HttpMethods.GET] }]"#,
            after: r#"cors: [{ allowedOrigins: ['https://portal.example.org'], allowedMethods: [s3.HttpMethods.GET] }]"#,
        },
    }
}

// --- Identity ---

fn explain_wildcard_policy() -> Explanation {
    Explanation {
        title: "No Wildcard Identity Policies",
        description: "\
Detects allow policies whose actions or resources contain the wildcard `*`.

Wildcard grants violate least privilege: a compromised function holding one can read,
modify or delete every resource in the account. Policies attached to a principal are
reported as critical.",
        remediation: "\
Grant the specific actions on the specific resources the principal needs, e.g. with
`bucket.grantRead(fn)` or explicit ARNs.",
        examples: ExamplePair {
            before: r#"new iam.PolicyStatement({ actions: ['*'], resources: ['*'] })"#,
            after: r#"new iam.PolicyStatement({
  actions: ['s3:GetObject'],
  resources: [bucket.arnForObjects('records/*')],
})"#,
        },
    }
}

fn explain_hardcoded_secret() -> Explanation {
    Explanation {
        title: "No Hardcoded Credentials",
        description: "\
Detects literal credential values (passwords, API keys, tokens) in function environment
variables, database master passwords and credential outputs.

Literal credentials end up in templates, version control and deployment logs. A value is
accepted when it is a reference to a secret store instead of the secret itself.",
        remediation: "\
Store the secret in a secret manager and pass a reference:
- `rds.Credentials.fromGeneratedSecret('admin')`
- `secret.secretValueFromJson('password')` or an SSM parameter reference",
        examples: ExamplePair {
            before: r#"environment: { DB_PASSWORD: 'Hospital123!' }"#,
            after: r#"environment: { DB_SECRET_ARN: dbSecret.secretArn }"#,
        },
    }
}

fn explain_unauthenticated_endpoint() -> Explanation {
    Explanation {
        title: "Endpoints to Sensitive Data Require Authentication",
        description: "\
Detects API endpoints with no authorization that expose a function which reads or
writes a sensitive database or object store.

The finding is reported on the endpoint, because that is where authentication must
be added; the function and store are listed as related resources.",
        remediation: "\
Set an authorizer (`AuthorizationType.COGNITO`, `IAM` or a custom authorizer) on every
method that reaches regulated data.",
        examples: ExamplePair {
            before: r#"patients.addMethod('GET', integration, { authorizationType: apigateway.AuthorizationType.NONE });"#,
            after: r#"patients.addMethod('GET', integration, {
  authorizationType: apigateway.AuthorizationType.COGNITO,
  authorizer,
});"#,
        },
    }
}

fn explain_exported_credential() -> Explanation {
    Explanation {
        title: "No Exported Credentials",
        description: "\
Detects credentials published as stack outputs or exports.

Outputs are readable by anyone who can describe the stack and are often copied into
CI logs.",
        remediation: "Remove the output; consumers should read the secret from the secret store.",
        examples: ExamplePair {
            before: r#"new cdk.CfnOutput(this, 'DatabasePassword', { value: 'Hospital123!' });"#,
            after: r#"// no output; grant consumers secret.grantRead(role) instead"#,
        },
    }
}

fn explain_endpoint_api_key() -> Explanation {
    Explanation {
        title: "Anonymous Endpoints Require an API Key",
        description: "\
Detects API endpoints that have neither an authorizer nor an API key requirement.

Such endpoints accept calls from anyone, with no way to attribute, meter or revoke a
caller. This applies whether or not the endpoint reaches regulated data; endpoints
that do are additionally reported by `identity.unauthenticated-endpoint`.",
        remediation: "Add an authorizer, or at least set `apiKeyRequired: true` with a usage plan.",
        examples: ExamplePair {
            before: r#"patients.addMethod('GET', integration, { apiKeyRequired: false });"#,
            after: r#"patients.addMethod('GET', integration, { apiKeyRequired: true });"#,
        },
    }
}

// --- Audit ---

fn explain_log_retention() -> Explanation {
    Explanation {
        title: "Bounded Log Retention",
        description: "\
Detects log groups that keep data forever or not at all.

Infinite retention keeps any sensitive data that leaked into logs indefinitely; zero
retention destroys the audit trail. This is partly an operational concern, so the
default severity is low.",
        remediation: "Choose a finite retention period that matches your records policy.",
        examples: ExamplePair {
            before: r#"retention: logs.RetentionDays.INFINITE"#,
            after: r#"retention: logs.RetentionDays.SIX_YEARS"#,
        },
    }
}

fn explain_missing_access_log() -> Explanation {
    Explanation {
        title: "Access Logging Enabled",
        description: "\
Detects databases, object stores and API endpoints that do not ship access logs to a
log group.

Without access logs there is no audit trail of who read or changed regulated data.",
        remediation: "\
Enable access logging: `serverAccessLogsBucket` for buckets, `cloudwatchLogsExports`
for databases, `accessLogDestination` for API stages.",
        examples: ExamplePair {
            before: r#"deployOptions: { accessLogDestination: undefined }"#,
            after: r#"deployOptions: { accessLogDestination: new apigateway.LogGroupLogDestination(apiLogs) }"#,
        },
    }
}

fn explain_object_versioning() -> Explanation {
    Explanation {
        title: "Object Versioning Enabled",
        description: "\
Detects object stores without versioning.

Versioning keeps a history of every change and protects against accidental or
malicious overwrites.",
        remediation: "Set `versioned: true`.",
        examples: ExamplePair {
            before: r#"new s3.Bucket(this, 'PatientDataBucket', { versioned: false });"#,
            after: r#"new s3.Bucket(this, 'PatientDataBucket', { versioned: true });"#,
        },
    }
}

fn explain_endpoint_data_trace() -> Explanation {
    Explanation {
        title: "No Full Payload Tracing",
        description: "\
Detects API endpoints with data tracing enabled.

Data tracing writes complete request and response bodies to logs, copying regulated
data into a store that was never meant to hold it.",
        remediation: "Set `dataTraceEnabled: false` and log metadata only.",
        examples: ExamplePair {
            before: r#"deployOptions: { dataTraceEnabled: true }"#,
            after: r#"deployOptions: { dataTraceEnabled: false, loggingLevel: apigateway.MethodLoggingLevel.ERROR }"#,
        },
    }
}

fn explain_network_flow_logs() -> Explanation {
    Explanation {
        title: "Network Flow Logs Enabled",
        description: "\
Detects networks without flow logs.

Flow logs record which addresses talked to which resources. Without them there is no
network-level trail for investigating access to regulated systems.",
        remediation: "Add a flow log to the network that delivers to a protected log group.",
        examples: ExamplePair {
            before: r#"new ec2.Vpc(this, 'HealthcareVPC', { maxAzs: 2 });"#,
            after: r#"new ec2.Vpc(this, 'HealthcareVPC', {
  maxAzs: 2,
  flowLogs: { all: { destination: ec2.FlowLogDestination.toCloudWatchLogs(flowLogs) } },
});"#,
        },
    }
}

// --- Resilience ---

fn explain_backup_retention() -> Explanation {
    Explanation {
        title: "Automated Backups Enabled",
        description: "\
Detects databases without automated backups (retention of zero days or unset).

Contingency planning requires retrievable exact copies of regulated data.",
        remediation: "Set `backupRetention` to at least seven days.",
        examples: ExamplePair {
            before: r#"backupRetention: cdk.Duration.days(0)"#,
            after: r#"backupRetention: cdk.Duration.days(35)"#,
        },
    }
}

fn explain_deletion_protection() -> Explanation {
    Explanation {
        title: "Deletion Protection",
        description: "\
Detects databases and object stores that are destroyed together with the stack, that
lack deletion protection, or that auto-delete their objects.

A mistaken stack deletion then destroys regulated data irrecoverably.",
        remediation: "\
Use `removalPolicy: RETAIN` (or `SNAPSHOT`), set `deletionProtection: true` on
databases and drop `autoDeleteObjects` on buckets.",
        examples: ExamplePair {
            before: r#"removalPolicy: cdk.RemovalPolicy.DESTROY, deletionProtection: false"#,
            after: r#"removalPolicy: cdk.RemovalPolicy.RETAIN, deletionProtection: true"#,
        },
    }
}

fn explain_multi_az() -> Explanation {
    Explanation {
        title: "Multi-AZ Databases",
        description: "\
Detects databases deployed to a single availability zone.

A zone outage makes the data unavailable until the instance is restored.",
        remediation: "Set `multiAz: true`.",
        examples: ExamplePair {
            before: r#"multiAz: false"#,
            after: r#"multiAz: true"#,
        },
    }
}

fn explain_endpoint_throttling() -> Explanation {
    Explanation {
        title: "Endpoint Throttling",
        description: "\
Detects API endpoints with no throttling rate limit.

Unthrottled endpoints allow bulk extraction and make denial of service trivial.",
        remediation: "Set `throttlingRateLimit` and `throttlingBurstLimit` on the stage or method.",
        examples: ExamplePair {
            before: r#"deployOptions: { throttlingRateLimit: undefined }"#,
            after: r#"deployOptions: { throttlingRateLimit: 100, throttlingBurstLimit: 200 }"#,
        },
    }
}

fn explain_function_timeout() -> Explanation {
    Explanation {
        title: "Bounded Function Timeouts",
        description: "\
Detects compute functions with a timeout above five minutes.

Long timeouts let a stuck or abused invocation hold connections to data stores and
run up cost, and usually hide work that belongs in a queue or batch job.",
        remediation: "Keep request-serving functions at five minutes or less.",
        examples: ExamplePair {
            before: r#"timeout: cdk.Duration.minutes(15)"#,
            after: r#"timeout: cdk.Duration.seconds(30)"#,
        },
    }
}

// --- Engine ---

fn explain_rule_failure() -> Explanation {
    Explanation {
        title: "Rule Failed to Evaluate",
        description: "\
Reported by the engine, not by a rule: the named rule raised an error or panicked
while evaluating the graph. Its findings are missing from the report, so the analysis
is partial even if no other finding is present.",
        remediation: "\
Inspect the message for the failing rule, fix the rule or the graph input, and re-run.
Exclude the rule explicitly if it cannot be fixed right away.",
        examples: ExamplePair {
            before: "engine.rule-failure on network.open-ingress",
            after: "no engine findings",
        },
    }
}
