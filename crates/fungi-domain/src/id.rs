//! Record identifiers and timestamp decoding shared by all records.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque identifier of a stored record.
///
/// New records get a UUID v4 string. Snapshots may carry any other non-empty
/// string, which is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier; blank values are rejected.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, as shown in listings.
    pub fn short(&self) -> &str {
        self.0
            .char_indices()
            .nth(8)
            .map_or(self.0.as_str(), |(end, _)| &self.0[..end])
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        EntityId::parse(raw).ok_or_else(|| de::Error::custom("identifier must not be empty"))
    }
}

const NAIVE_TIMESTAMP_PATTERNS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Reads RFC 3339, or `YYYY-MM-DDTHH:MM[:SS]` without an offset taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` helper for timestamps that may lack an offset.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_foreign_identifiers_verbatim() {
        let id: EntityId = serde_json::from_str(r#""_k3j2h1g0f""#).unwrap();
        assert_eq!(id.as_str(), "_k3j2h1g0f");
        assert_eq!(id.short(), "_k3j2h1g");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""_k3j2h1g0f""#);
        assert!(serde_json::from_str::<EntityId>(r#""  ""#).is_err());
    }

    #[test]
    fn generated_identifiers_are_uuid_strings() {
        let id = EntityId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_eq!(id.short().len(), 8);
        assert_ne!(id, EntityId::generate());
    }

    #[test]
    fn timestamps_without_offset_read_as_utc() {
        let seconds = parse_timestamp("2024-03-01T10:00:00").unwrap();
        assert_eq!(seconds.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        let minutes = parse_timestamp("2024-03-01T10:00").unwrap();
        assert_eq!(minutes, seconds);
        let offset = parse_timestamp("2024-03-01T11:00:00+01:00").unwrap();
        assert_eq!(offset, seconds);
        assert!(parse_timestamp("01/03/2024").is_none());
    }
}
