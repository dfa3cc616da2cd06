// Class Roster - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod error;
pub mod entities;
pub mod sets;           // Set algebra over identity sets
pub mod mentions;       // @student@domain.tld mention parser
pub mod store;          // RosterStore trait + SQLite / in-memory stores
pub mod roster;         // Roster Query Engine - common students, registration
pub mod recipients;     // Recipient Resolution Engine - notification addressees
pub mod suspension;
pub mod requests;       // Validated request records
pub mod service;        // RosterService facade over an injected store
pub mod import;         // CSV bulk import
pub mod logging;

#[cfg(feature = "server")]
pub mod api;            // axum REST API

// Re-export commonly used types
pub use error::{EntityKind, Result, RosterError};
pub use entities::{Registration, Student, Teacher};
pub use mentions::parse_mentions;
pub use store::{setup_database, MemoryStore, RosterStore, SqliteStore};
pub use roster::{RegistrationSummary, RosterQueryEngine};
pub use recipients::RecipientResolutionEngine;
pub use suspension::{suspend_student, unsuspend_student};
pub use requests::{
    CommonStudentsRequest, CreateIdentityRequest, NotificationRequest, RegisterRequest,
    SuspendRequest,
};
pub use service::RosterService;
pub use import::{import_csv, ImportSummary, RegistrationRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
