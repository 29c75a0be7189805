//! Stable identifiers for rules.
//!
//! `rule_id` is a dotted namespace: `<category>.<kebab-case-name>`.

// Rules: encryption
pub const RULE_ENCRYPTION_STORAGE_AT_REST: &str = "encryption.storage-at-rest";
pub const RULE_ENCRYPTION_VOLUME_AT_REST: &str = "encryption.volume-at-rest";
pub const RULE_ENCRYPTION_LOG_GROUP_KEY: &str = "encryption.log-group-key";
pub const RULE_ENCRYPTION_FUNCTION_ENVIRONMENT: &str = "encryption.function-environment";
pub const RULE_ENCRYPTION_KEY_ROTATION: &str = "encryption.key-rotation";
pub const RULE_ENCRYPTION_PLAINTEXT_INGRESS: &str = "encryption.plaintext-ingress";
pub const RULE_ENCRYPTION_TRANSIT_TLS: &str = "encryption.transit-tls";

// Rules: network
pub const RULE_NETWORK_PUBLICLY_ACCESSIBLE: &str = "network.publicly-accessible";
pub const RULE_NETWORK_OPEN_INGRESS: &str = "network.open-ingress";
pub const RULE_NETWORK_PUBLIC_SUBNET: &str = "network.public-subnet";
pub const RULE_NETWORK_NO_PRIVATE_SUBNET: &str = "network.no-private-subnet";
pub const RULE_NETWORK_FUNCTION_OUTSIDE_VPC: &str = "network.function-outside-vpc";
pub const RULE_NETWORK_OPEN_CORS: &str = "network.open-cors";

// Rules: identity
pub const RULE_IDENTITY_WILDCARD_POLICY: &str = "identity.wildcard-policy";
pub const RULE_IDENTITY_HARDCODED_SECRET: &str = "identity.hardcoded-secret";
pub const RULE_IDENTITY_UNAUTHENTICATED_ENDPOINT: &str = "identity.unauthenticated-endpoint";
pub const RULE_IDENTITY_EXPORTED_CREDENTIAL: &str = "identity.exported-credential";
pub const RULE_IDENTITY_ENDPOINT_API_KEY: &str = "identity.endpoint-api-key";

// Rules: audit
pub const RULE_AUDIT_LOG_RETENTION: &str = "audit.log-retention";
pub const RULE_AUDIT_MISSING_ACCESS_LOG: &str = "audit.missing-access-log";
pub const RULE_AUDIT_OBJECT_VERSIONING: &str = "audit.object-versioning";
pub const RULE_AUDIT_ENDPOINT_DATA_TRACE: &str = "audit.endpoint-data-trace";
pub const RULE_AUDIT_NETWORK_FLOW_LOGS: &str = "audit.network-flow-logs";

// Rules: resilience
pub const RULE_RESILIENCE_BACKUP_RETENTION: &str = "resilience.backup-retention";
pub const RULE_RESILIENCE_DELETION_PROTECTION: &str = "resilience.deletion-protection";
pub const RULE_RESILIENCE_MULTI_AZ: &str = "resilience.multi-az";
pub const RULE_RESILIENCE_ENDPOINT_THROTTLING: &str = "resilience.endpoint-throttling";
pub const RULE_RESILIENCE_FUNCTION_TIMEOUT: &str = "resilience.function-timeout";

// Engine-level
pub const RULE_ENGINE_RULE_FAILURE: &str = "engine.rule-failure";

// Tags
pub const TAG_DATA_CLASSIFICATION: &str = "data-classification";
