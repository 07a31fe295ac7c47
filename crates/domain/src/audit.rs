//! Audit trail domain types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use userdeck_core::AppError;

/// Unique identifier for an audit log entry, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogEntryId(i64);

impl LogEntryId {
    /// Creates a log entry identifier from a store-assigned value.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for LogEntryId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Action recorded by an audit log entry.
///
/// Entries are append-only: once written they are never updated or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// A user record was created.
    Created,
    /// A user record was viewed.
    Viewed,
    /// A user record was updated.
    Updated,
    /// A user record was deleted.
    Deleted,
    /// A user authenticated successfully.
    LoggedIn,
}

impl UserAction {
    /// Returns the storage string for this action. Always lowercase, which is
    /// what the log search matches the query term against.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Viewed => "viewed",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::LoggedIn => "logged_in",
        }
    }
}

impl FromStr for UserAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created" => Ok(Self::Created),
            "viewed" => Ok(Self::Viewed),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            "logged_in" => Ok(Self::LoggedIn),
            _ => Err(AppError::Validation(format!(
                "unknown user action '{value}'"
            ))),
        }
    }
}
