// 📝 Request records - explicit inputs, validated before any engine runs
//
// Transports deserialize into these structs (missing fields are rejected by
// serde) and call `validate()` for the rules serde cannot express.

use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};

fn require_email(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RosterError::invalid(format!("{} is required", field)));
    }
    Ok(())
}

/// Body of teacher/student creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIdentityRequest {
    pub email: String,
}

impl CreateIdentityRequest {
    pub fn validate(&self) -> Result<()> {
        require_email("email", &self.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub teacher: String,
    pub students: Vec<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        require_email("teacher", &self.teacher)?;

        if self.students.is_empty() {
            return Err(RosterError::invalid("at least one student is required"));
        }
        for student in &self.students {
            require_email("students[]", student)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonStudentsRequest {
    pub teachers: Vec<String>,
}

impl CommonStudentsRequest {
    /// An empty teacher list is left to the engine, which rejects it itself.
    pub fn validate(&self) -> Result<()> {
        for teacher in &self.teachers {
            require_email("teacher", teacher)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspendRequest {
    pub student: String,
}

impl SuspendRequest {
    pub fn validate(&self) -> Result<()> {
        require_email("student", &self.student)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub teacher: String,
    pub notification: String,
}

impl NotificationRequest {
    /// Notification text may be empty; it just mentions nobody.
    pub fn validate(&self) -> Result<()> {
        require_email("teacher", &self.teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_requires_teacher() {
        let req = RegisterRequest {
            teacher: " ".to_string(),
            students: vec!["a@s.com".to_string()],
        };
        assert!(matches!(req.validate(), Err(RosterError::InvalidArgument(_))));
    }

    #[test]
    fn test_register_requires_students() {
        let req = RegisterRequest {
            teacher: "t@s.com".to_string(),
            students: vec![],
        };
        assert!(matches!(req.validate(), Err(RosterError::InvalidArgument(_))));
    }

    #[test]
    fn test_missing_field_rejected_by_serde() {
        let parsed: std::result::Result<RegisterRequest, _> =
            serde_json::from_str(r#"{"teacher": "t@s.com"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_notification_allows_empty_text() {
        let req: NotificationRequest =
            serde_json::from_str(r#"{"teacher": "t@s.com", "notification": ""}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_identity_requires_email() {
        let req = CreateIdentityRequest {
            email: String::new(),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: email is required");
    }
}
