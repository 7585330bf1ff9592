//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are opaque strings: the loan backend owns their format, so the
//! client never interprets them. On the wire they may arrive as JSON strings
//! or integers; both decode to the same textual id and always encode back as
//! strings.

use core::str::FromStr;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a loan record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LoanId(String);

/// Identifier of a portal user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor($name)).map(Self)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

/// Accepts a string or an integer id.
struct IdVisitor(&'static str);

impl<'de> Visitor<'de> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "a {} as a string or integer", self.0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

impl_string_newtype!(LoanId, "LoanId");
impl_string_newtype!(UserId, "UserId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_empty() {
        let id: LoanId = "  loan-1 ".parse().unwrap();
        assert_eq!(id.as_str(), "loan-1");

        let err = "   ".parse::<LoanId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn ids_are_transparent_on_the_wire() {
        let id: UserId = "u-42".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-42\"");
    }

    #[test]
    fn integer_ids_decode_as_text() {
        let id: LoanId = serde_json::from_str("1").unwrap();
        assert_eq!(id.as_str(), "1");
        assert_eq!(id, "1".parse::<LoanId>().unwrap());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1\"");

        let id: UserId = serde_json::from_str("-7").unwrap();
        assert_eq!(id.as_str(), "-7");
    }

    #[test]
    fn non_scalar_ids_are_rejected() {
        assert!(serde_json::from_str::<LoanId>("1.5").is_err());
        assert!(serde_json::from_str::<LoanId>("null").is_err());
        assert!(serde_json::from_str::<UserId>("{\"id\":1}").is_err());
    }
}
