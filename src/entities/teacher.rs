// 🧑‍🏫 Teacher Entity - identity is the email address

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A teacher record. Immutable once created except for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique, case-sensitive identity
    pub email: String,

    /// When this record was created in our system
    pub created_at: DateTime<Utc>,
}

impl Teacher {
    pub fn new(email: impl Into<String>) -> Self {
        Teacher {
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}
