// Roster Store - where teachers, students and registrations live
//
// The engines only ever talk to a `RosterStore`; they never know whether rows
// sit in SQLite or in memory. Implementations:
// - SqliteStore: rusqlite-backed, used by the server and the CLI
// - MemoryStore: RwLock-guarded tables, used by tests and `--in-memory`

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{setup_database, SqliteStore};

use crate::entities::{Registration, Student, Teacher};
use crate::error::Result;
use std::collections::BTreeSet;

pub trait RosterStore {
    /// Run `f` against one point-in-time view of the store.
    ///
    /// Every lookup made through the `&Self` handed to `f` sees the same
    /// committed state, even if another process writes meanwhile. Not
    /// re-entrant: `f` must not call `read_snapshot` again.
    fn read_snapshot<R, F>(&self, f: F) -> Result<R>
    where
        Self: Sized,
        F: FnOnce(&Self) -> Result<R>;

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    fn find_teacher_by_email(&self, email: &str) -> Result<Option<Teacher>>;

    fn find_student_by_email(&self, email: &str) -> Result<Option<Student>>;

    /// Students matching any of `emails`. Unknown emails are simply absent from
    /// the result; order of the result is by email.
    fn find_students_by_emails(&self, emails: &[String]) -> Result<Vec<Student>>;

    /// Emails of every student with an edge to `teacher_email`.
    ///
    /// May contain a dangling student email if the store ever leaves one
    /// behind; callers resolve students before trusting membership.
    fn roster_of(&self, teacher_email: &str) -> Result<BTreeSet<String>>;

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Insert the (teacher, student) edge unless it already exists.
    /// Returns true when a new edge was written.
    fn create_registration_if_absent(&self, teacher_email: &str, student_email: &str)
        -> Result<bool>;

    /// Set the suspension flag. Returns false when no such student exists.
    fn set_suspended(&self, student_email: &str, suspended: bool) -> Result<bool>;

    // ========================================================================
    // RECORD MANAGEMENT
    // ========================================================================

    /// Fails with `Conflict` when the email is taken.
    fn create_teacher(&self, email: &str) -> Result<Teacher>;

    /// Fails with `Conflict` when the email is taken.
    fn create_student(&self, email: &str) -> Result<Student>;

    /// Removes the teacher and every edge touching it. Returns false when absent.
    fn delete_teacher(&self, email: &str) -> Result<bool>;

    /// Removes the student and every edge touching it. Returns false when absent.
    fn delete_student(&self, email: &str) -> Result<bool>;

    fn list_teachers(&self) -> Result<Vec<Teacher>>;

    fn list_students(&self) -> Result<Vec<Student>>;

    /// All edges, ordered by teacher then student.
    fn list_registrations(&self) -> Result<Vec<Registration>>;
}

/// Behaviour every `RosterStore` must share, run against each implementation.
#[cfg(test)]
pub(crate) mod contract {
    use super::RosterStore;
    use crate::error::RosterError;

    pub fn registration_is_idempotent<S: RosterStore>(store: &S) {
        store.create_teacher("t@s.com").unwrap();
        store.create_student("a@s.com").unwrap();

        assert!(store.create_registration_if_absent("t@s.com", "a@s.com").unwrap());
        assert!(!store.create_registration_if_absent("t@s.com", "a@s.com").unwrap());

        assert_eq!(store.list_registrations().unwrap().len(), 1);
        assert_eq!(store.roster_of("t@s.com").unwrap().len(), 1);
    }

    pub fn duplicate_identity_conflicts<S: RosterStore>(store: &S) {
        store.create_teacher("t@s.com").unwrap();
        store.create_student("a@s.com").unwrap();

        assert!(matches!(
            store.create_teacher("t@s.com"),
            Err(RosterError::Conflict { .. })
        ));
        assert!(matches!(
            store.create_student("a@s.com"),
            Err(RosterError::Conflict { .. })
        ));
    }

    pub fn delete_cascades_to_rosters<S: RosterStore>(store: &S) {
        store.create_teacher("t1@s.com").unwrap();
        store.create_teacher("t2@s.com").unwrap();
        store.create_student("a@s.com").unwrap();
        store.create_student("b@s.com").unwrap();
        store.create_registration_if_absent("t1@s.com", "a@s.com").unwrap();
        store.create_registration_if_absent("t1@s.com", "b@s.com").unwrap();
        store.create_registration_if_absent("t2@s.com", "a@s.com").unwrap();

        assert!(store.delete_student("a@s.com").unwrap());
        assert!(!store.delete_student("a@s.com").unwrap());

        let roster = store.roster_of("t1@s.com").unwrap();
        assert_eq!(roster.into_iter().collect::<Vec<_>>(), vec!["b@s.com"]);
        assert!(store.roster_of("t2@s.com").unwrap().is_empty());

        assert!(store.delete_teacher("t1@s.com").unwrap());
        assert!(store.list_registrations().unwrap().is_empty());
    }

    pub fn suspension_toggles<S: RosterStore>(store: &S) {
        store.create_student("a@s.com").unwrap();

        assert!(store.set_suspended("a@s.com", true).unwrap());
        assert!(store.set_suspended("a@s.com", true).unwrap());
        assert!(store.find_student_by_email("a@s.com").unwrap().unwrap().suspended);

        assert!(store.set_suspended("a@s.com", false).unwrap());
        assert!(!store.find_student_by_email("a@s.com").unwrap().unwrap().suspended);

        assert!(!store.set_suspended("ghost@s.com", true).unwrap());
    }

    pub fn batch_lookup_skips_unknown<S: RosterStore>(store: &S) {
        store.create_student("a@s.com").unwrap();
        store.create_student("b@s.com").unwrap();

        let found = store
            .find_students_by_emails(&[
                "b@s.com".to_string(),
                "ghost@s.com".to_string(),
                "a@s.com".to_string(),
            ])
            .unwrap();
        let emails: Vec<_> = found.into_iter().map(|s| s.email).collect();
        assert_eq!(emails, vec!["a@s.com", "b@s.com"]);

        assert!(store.find_students_by_emails(&[]).unwrap().is_empty());
    }

    pub fn snapshot_sees_committed_state<S: RosterStore>(store: &S) {
        store.create_teacher("t@s.com").unwrap();
        store.create_student("a@s.com").unwrap();
        store.create_registration_if_absent("t@s.com", "a@s.com").unwrap();

        let roster = store
            .read_snapshot(|view| {
                assert!(view.find_teacher_by_email("t@s.com")?.is_some());
                view.roster_of("t@s.com")
            })
            .unwrap();
        assert_eq!(roster.into_iter().collect::<Vec<_>>(), vec!["a@s.com"]);

        let err = store
            .read_snapshot(|view| -> crate::Result<()> {
                view.find_student_by_email("a@s.com")?;
                Err(RosterError::invalid("stop"))
            })
            .unwrap_err();
        assert!(matches!(err, RosterError::InvalidArgument(_)));

        // The store is still usable after a failed snapshot
        assert!(store.find_teacher_by_email("t@s.com").unwrap().is_some());
    }

    pub fn emails_are_case_sensitive<S: RosterStore>(store: &S) {
        store.create_teacher("T@s.com").unwrap();
        assert!(store.find_teacher_by_email("t@s.com").unwrap().is_none());
        assert!(store.create_teacher("t@s.com").is_ok());
    }
}
