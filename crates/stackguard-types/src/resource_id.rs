use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier of a resource within one graph.
///
/// Identifiers are compared byte-wise; surrounding whitespace is trimmed so
/// that `" PatientDB"` and `"PatientDB"` cannot coexist as distinct resources.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ResourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::new(value)
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId::new(value)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(value: &ResourceId) -> Self {
        value.clone()
    }
}
