//! Capability catalog records and the session user's capability references.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier of a capability record.
///
/// The permission-administration API is free to use numeric or string ids;
/// both deserialize into the same textual form so references compare equal
/// regardless of how either side encoded them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityId(String);

impl CapabilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CapabilityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for CapabilityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for CapabilityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CapabilityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(number) => Self(number.to_string()),
            RawId::Unsigned(number) => Self(number.to_string()),
        })
    }
}

fn default_active() -> bool {
    true
}

/// One entry of the capability catalog.
///
/// `active` is carried for the administration screens only; gating ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub id: CapabilityId,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl CapabilityRecord {
    pub fn new(id: impl Into<CapabilityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// The signed-in user as supplied by the session provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Display name, if the provider supplies one.
    #[serde(default)]
    pub name: Option<String>,
    /// Ids of the capabilities granted to this user. Absent means none.
    #[serde(default, alias = "permissions")]
    pub capability_refs: Vec<CapabilityId>,
}

impl SessionUser {
    pub fn with_refs<I, T>(refs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CapabilityId>,
    {
        Self {
            name: None,
            capability_refs: refs.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_deserialize_from_strings_and_numbers() {
        let records: Vec<CapabilityRecord> = serde_json::from_str(
            r#"[
                { "id": 7, "name": "reports", "active": false },
                { "id": "a1b2", "name": "logistics" }
            ]"#,
        )
        .expect("parse records");

        assert_eq!(records[0].id, CapabilityId::from(7u64));
        assert!(!records[0].active);
        assert_eq!(records[1].id.as_str(), "a1b2");
        assert!(records[1].active, "active defaults to true when absent");
    }

    #[test]
    fn user_without_refs_holds_nothing() {
        let user: SessionUser = serde_json::from_str(r#"{ "name": "ops" }"#).expect("parse user");
        assert!(user.capability_refs.is_empty());
    }
}
