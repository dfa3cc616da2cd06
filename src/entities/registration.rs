// 🔗 Registration - the edge between a teacher and a student

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub teacher_email: String,
    pub student_email: String,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(teacher_email: impl Into<String>, student_email: impl Into<String>) -> Self {
        Registration {
            teacher_email: teacher_email.into(),
            student_email: student_email.into(),
            created_at: Utc::now(),
        }
    }
}
