//! Error types for the roster engine
//!
//! Every failure the engine, the stores, and the service can produce is a value
//! of [`RosterError`]. Nothing in the library aborts the process.

use std::fmt;
use thiserror::Error;

/// Result type alias for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

/// Which kind of identity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Teacher,
    Student,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Teacher => "Teacher",
            EntityKind::Student => "Student",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum RosterError {
    /// Malformed or empty required input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required identity does not exist in the store
    #[error("{kind} not found: {email}")]
    NotFound { kind: EntityKind, email: String },

    /// Creation of an identity that already exists
    #[error("{kind} with this email already exists: {email}")]
    Conflict { kind: EntityKind, email: String },

    /// SQLite database errors
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A lock guarding the in-memory tables was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

impl RosterError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        RosterError::InvalidArgument(msg.into())
    }

    pub fn teacher_not_found(email: impl Into<String>) -> Self {
        RosterError::NotFound {
            kind: EntityKind::Teacher,
            email: email.into(),
        }
    }

    pub fn student_not_found(email: impl Into<String>) -> Self {
        RosterError::NotFound {
            kind: EntityKind::Student,
            email: email.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RosterError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_email() {
        let err = RosterError::student_not_found("x@s.com");
        assert_eq!(err.to_string(), "Student not found: x@s.com");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_conflict_message() {
        let err = RosterError::Conflict {
            kind: EntityKind::Teacher,
            email: "t@s.com".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Teacher with this email already exists: t@s.com"
        );
        assert!(!err.is_not_found());
    }
}
