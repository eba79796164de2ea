//! Core type definitions with validation.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types and session input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The session does not end after it starts.
    #[error("time out must be after time in (in {time_in}, out {time_out})")]
    TimeOutNotAfterTimeIn {
        time_in: NaiveTime,
        time_out: NaiveTime,
    },

    /// A setting value could not be interpreted for its key.
    #[error("invalid value for setting {key}: {value}")]
    InvalidSettingValue { key: String, value: String },
}

/// Defines a non-blank string identifier. Surrounding whitespace is dropped
/// so IDs typed on the command line match the stored form.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl AsRef<str>) -> Result<Self, ValidationError> {
                match id.as_ref().trim() {
                    "" => Err(ValidationError::Empty { field: $field_name }),
                    id => Ok(Self(id.to_owned())),
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_string_id!(
    /// A validated user identifier.
    ///
    /// Resolved by the caller before any accounting happens; every stored
    /// entry is scoped to exactly one user.
    UserId, "user ID"
);

define_string_id!(
    /// A validated time log entry identifier.
    ///
    /// Entry IDs are assigned by the storage layer when an entry is saved.
    EntryId, "entry ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert!(UserId::new("intern-1").is_ok());
    }

    #[test]
    fn entry_id_rejects_empty() {
        let err = EntryId::new("").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "entry ID" });
        assert_eq!(err.to_string(), "entry ID cannot be empty");
    }

    #[test]
    fn entry_id_serde_roundtrip() {
        let id = EntryId::new("log-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"log-123\"");
        let parsed: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn user_id_serde_rejects_empty() {
        let result: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn time_order_error_mentions_both_times() {
        let err = ValidationError::TimeOutNotAfterTimeIn {
            time_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            time_out: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        };
        let message = err.to_string();
        assert!(message.contains("time out must be after time in"));
        assert!(message.contains("09:00:00"));
        assert!(message.contains("08:30:00"));
    }

    #[test]
    fn ids_drop_surrounding_whitespace() {
        let id = EntryId::new("  log-123\n").unwrap();
        assert_eq!(id.as_str(), "log-123");
        assert_eq!(id.to_string(), "log-123");
        let parsed: UserId = serde_json::from_str("\" intern \"").unwrap();
        assert_eq!(parsed, UserId::new("intern").unwrap());
    }
}
