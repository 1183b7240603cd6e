//! Chore error types.

use hearth_shared::types::MemberId;
use thiserror::Error;

/// Chore-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChoreError {
    /// Chore name is blank.
    #[error("Chore name cannot be empty")]
    EmptyName,

    /// Frequency string not recognised.
    #[error("Unknown chore frequency: {0}")]
    UnknownFrequency(String),

    /// Assignee is neither a member nor the owner of the household.
    #[error("Assigned member {0} must be a member or owner of the household")]
    AssigneeNotInHousehold(MemberId),

    /// Completing member is outside the household.
    #[error("Member {0} does not belong to this household")]
    CompleterNotInHousehold(MemberId),
}

impl ChoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "EMPTY_NAME",
            Self::UnknownFrequency(_) => "UNKNOWN_FREQUENCY",
            Self::AssigneeNotInHousehold(_) => "ASSIGNEE_NOT_IN_HOUSEHOLD",
            Self::CompleterNotInHousehold(_) => "COMPLETER_NOT_IN_HOUSEHOLD",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyName | Self::UnknownFrequency(_) | Self::AssigneeNotInHousehold(_) => 400,
            Self::CompleterNotInHousehold(_) => 403,
        }
    }
}
