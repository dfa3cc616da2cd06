// 🎒 Student Entity - identity is the email address, plus suspension state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student record.
///
/// `suspended` is a plain boolean so it can be toggled either way; readers only
/// ever look at its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique, case-sensitive identity
    pub email: String,

    /// Suspended students never receive notifications
    #[serde(default)]
    pub suspended: bool,

    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(email: impl Into<String>) -> Self {
        Student {
            email: email.into(),
            suspended: false,
            created_at: Utc::now(),
        }
    }

    /// Can this student receive a notification right now?
    pub fn is_reachable(&self) -> bool {
        !self.suspended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_student_is_not_suspended() {
        let student = Student::new("a@s.com");
        assert!(!student.suspended);
        assert!(student.is_reachable());
    }

    #[test]
    fn test_suspension_flag_can_be_toggled() {
        let mut student = Student::new("a@s.com");
        student.suspended = true;
        assert!(!student.is_reachable());
        student.suspended = false;
        assert!(student.is_reachable());
    }
}
