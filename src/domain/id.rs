use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a company, location or asset record.
///
/// The upstream API is inconsistent about whether identifiers are strings or
/// integers, so both are accepted when deserializing. Integers are stored as
/// their decimal text, which means `7` and `"7"` name the same record.
///
/// Identifiers share a single namespace across locations and assets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(NonEmptyString);

impl RecordId {
    /// Creates a new `RecordId`.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdError`] if the string is empty or only whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, EmptyIdError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(EmptyIdError);
        }
        NonEmptyString::new(s).map(Self).map_err(|_| EmptyIdError)
    }

    /// The identifier of the synthetic root node.
    #[must_use]
    pub fn root() -> Self {
        Self(NonEmptyString::new(ROOT_ID.to_string()).unwrap_or_else(|_| unreachable!()))
    }

    /// Whether this is the id reserved for the synthetic root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.as_str() == ROOT_ID
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

pub(crate) const ROOT_ID: &str = "root";

/// Error returned when an identifier is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("record identifiers must not be empty")]
pub struct EmptyIdError;

impl TryFrom<String> for RecordId {
    type Error = EmptyIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RecordId {
    type Error = EmptyIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(NonEmptyString::new(value.to_string()).unwrap_or_else(|_| unreachable!()))
    }
}

impl FromStr for RecordId {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl Deref for RecordId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw wire shape of an identifier.
///
/// Anything that is neither text nor an integer is kept as `Invalid` so that
/// one malformed record does not fail the whole document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Invalid(serde::de::IgnoredAny),
}

impl RawId {
    fn into_id(self) -> Option<RecordId> {
        match self {
            Self::Text(text) => RecordId::new(text).ok(),
            Self::Unsigned(number) => Some(RecordId::from(number)),
            Self::Signed(number) => RecordId::new(number.to_string()).ok(),
            Self::Invalid(_) => None,
        }
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer)?
            .into_id()
            .ok_or_else(|| serde::de::Error::custom(EmptyIdError))
    }
}

/// Deserializes an optional identifier, mapping `null`, a missing field, the
/// empty string and values that are neither text nor integers to `None`.
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.and_then(RawId::into_id))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_optional")]
        id: Option<RecordId>,
    }

    #[test_case(r#"{"id": "60fd4f"}"#, Some("60fd4f"); "string id")]
    #[test_case(r#"{"id": 42}"#, Some("42"); "integer id")]
    #[test_case(r#"{"id": ""}"#, None; "empty string")]
    #[test_case(r#"{"id": "   "}"#, None; "whitespace only")]
    #[test_case(r#"{"id": null}"#, None; "null")]
    #[test_case(r"{}", None; "missing field")]
    #[test_case(r#"{"id": -3}"#, Some("-3"); "negative integer")]
    #[test_case(r#"{"id": 1.5}"#, None; "fractional number")]
    #[test_case(r#"{"id": true}"#, None; "boolean")]
    #[test_case(r#"{"id": {"oid": "x"}}"#, None; "object")]
    fn optional_id_from_json(json: &str, expected: Option<&str>) {
        let holder: Holder = serde_json::from_str(json).unwrap();
        assert_eq!(holder.id.as_deref(), expected);
    }

    #[test]
    fn integer_and_string_ids_are_equal() {
        let from_int: RecordId = serde_json::from_str("7").unwrap();
        let from_str: RecordId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_int, from_str);
    }

    #[test]
    fn required_id_rejects_empty_string() {
        assert!(serde_json::from_str::<RecordId>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let id = RecordId::from(12_u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"12\"");
    }

    #[test]
    fn required_id_rejects_fractional_number() {
        assert!(serde_json::from_str::<RecordId>("2.5").is_err());
    }

    #[test]
    fn new_rejects_empty() {
        assert_eq!(RecordId::new(""), Err(EmptyIdError));
        assert_eq!(RecordId::root().as_str(), "root");
    }
}
