// 🗄️ SQLite roster store
//
// Tables:
//   teachers(email PK)
//   students(email PK, suspended)
//   registrations(teacher_email, student_email) UNIQUE per pair, cascading deletes
//
// Timestamps are stored as RFC 3339 text. Batch lookups bind at most
// LOOKUP_CHUNK_SIZE emails per statement, well under SQLite's bound-variable cap.

use super::RosterStore;
use crate::entities::{Registration, Student, Teacher};
use crate::error::{EntityKind, Result, RosterError};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;

const LOOKUP_CHUNK_SIZE: usize = 500;

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery (in-memory databases report "memory")
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS teachers (
            email TEXT PRIMARY KEY NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            email TEXT PRIMARY KEY NOT NULL,
            suspended INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS registrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            teacher_email TEXT NOT NULL
                REFERENCES teachers(email) ON DELETE CASCADE,
            student_email TEXT NOT NULL
                REFERENCES students(email) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            UNIQUE (teacher_email, student_email)
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_registrations_teacher ON registrations(teacher_email)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_registrations_student ON registrations(student_email)",
        [],
    )?;

    Ok(())
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn teacher_from_row(row: &Row<'_>) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        email: row.get(0)?,
        created_at: parse_timestamp(row, 1)?,
    })
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        email: row.get(0)?,
        suspended: row.get(1)?,
        created_at: parse_timestamp(row, 2)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Roster store backed by a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn insert_identity(&self, sql: &str, kind: EntityKind, email: &str, now: &str) -> Result<()> {
        match self.conn.execute(sql, params![email, now]) {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(RosterError::Conflict {
                kind,
                email: email.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl RosterStore for SqliteStore {
    /// Deferred transaction: in WAL mode the first read pins the snapshot, and
    /// commits from other connections stay invisible until it ends.
    fn read_snapshot<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Self) -> Result<R>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(self)?;
        tx.commit()?;
        Ok(out)
    }

    fn find_teacher_by_email(&self, email: &str) -> Result<Option<Teacher>> {
        let teacher = self
            .conn
            .query_row(
                "SELECT email, created_at FROM teachers WHERE email = ?1",
                [email],
                teacher_from_row,
            )
            .optional()?;

        Ok(teacher)
    }

    fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        let student = self
            .conn
            .query_row(
                "SELECT email, suspended, created_at FROM students WHERE email = ?1",
                [email],
                student_from_row,
            )
            .optional()?;

        Ok(student)
    }

    fn find_students_by_emails(&self, emails: &[String]) -> Result<Vec<Student>> {
        let wanted: BTreeSet<&str> = emails.iter().map(String::as_str).collect();
        let wanted: Vec<&str> = wanted.into_iter().collect();

        let mut students = Vec::with_capacity(wanted.len());
        for chunk in wanted.chunks(LOOKUP_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT email, suspended, created_at FROM students
                 WHERE email IN ({})",
                placeholders
            );

            let mut stmt = self.conn.prepare(&sql)?;
            let found = stmt
                .query_map(params_from_iter(chunk.iter()), student_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            students.extend(found);
        }

        // Row order within a chunk is unspecified
        students.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(students)
    }

    fn roster_of(&self, teacher_email: &str) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT student_email FROM registrations
             WHERE teacher_email = ?1",
        )?;

        let roster = stmt
            .query_map([teacher_email], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<BTreeSet<_>>>()?;

        Ok(roster)
    }

    fn create_registration_if_absent(
        &self,
        teacher_email: &str,
        student_email: &str,
    ) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO registrations (teacher_email, student_email, created_at)
             VALUES (?1, ?2, ?3)",
            params![teacher_email, student_email, Utc::now().to_rfc3339()],
        )?;

        Ok(inserted > 0)
    }

    fn set_suspended(&self, student_email: &str, suspended: bool) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE students SET suspended = ?1 WHERE email = ?2",
            params![suspended, student_email],
        )?;

        Ok(updated > 0)
    }

    fn create_teacher(&self, email: &str) -> Result<Teacher> {
        let teacher = Teacher::new(email);
        self.insert_identity(
            "INSERT INTO teachers (email, created_at) VALUES (?1, ?2)",
            EntityKind::Teacher,
            email,
            &teacher.created_at.to_rfc3339(),
        )?;
        Ok(teacher)
    }

    fn create_student(&self, email: &str) -> Result<Student> {
        let student = Student::new(email);
        self.insert_identity(
            "INSERT INTO students (email, created_at) VALUES (?1, ?2)",
            EntityKind::Student,
            email,
            &student.created_at.to_rfc3339(),
        )?;
        Ok(student)
    }

    fn delete_teacher(&self, email: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM teachers WHERE email = ?1", [email])?;
        Ok(deleted > 0)
    }

    fn delete_student(&self, email: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM students WHERE email = ?1", [email])?;
        Ok(deleted > 0)
    }

    fn list_teachers(&self) -> Result<Vec<Teacher>> {
        let mut stmt = self
            .conn
            .prepare("SELECT email, created_at FROM teachers ORDER BY email")?;

        let teachers = stmt
            .query_map([], teacher_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(teachers)
    }

    fn list_students(&self) -> Result<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare("SELECT email, suspended, created_at FROM students ORDER BY email")?;

        let students = stmt
            .query_map([], student_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(students)
    }

    fn list_registrations(&self) -> Result<Vec<Registration>> {
        let mut stmt = self.conn.prepare(
            "SELECT teacher_email, student_email, created_at
             FROM registrations
             ORDER BY teacher_email, student_email",
        )?;

        let registrations = stmt
            .query_map([], |row| {
                Ok(Registration {
                    teacher_email: row.get(0)?,
                    student_email: row.get(1)?,
                    created_at: parse_timestamp(row, 2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(registrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_setup_database_is_repeatable() {
        let store = store();
        setup_database(store.connection()).unwrap();
        setup_database(store.connection()).unwrap();
    }

    #[test]
    fn test_registration_is_idempotent() {
        contract::registration_is_idempotent(&store());
    }

    #[test]
    fn test_duplicate_identity_conflicts() {
        contract::duplicate_identity_conflicts(&store());
    }

    #[test]
    fn test_delete_cascades_to_rosters() {
        contract::delete_cascades_to_rosters(&store());
    }

    #[test]
    fn test_suspension_toggles() {
        contract::suspension_toggles(&store());
    }

    #[test]
    fn test_batch_lookup_skips_unknown() {
        contract::batch_lookup_skips_unknown(&store());
    }

    #[test]
    fn test_emails_are_case_sensitive() {
        contract::emails_are_case_sensitive(&store());
    }

    #[test]
    fn test_snapshot_sees_committed_state() {
        contract::snapshot_sees_committed_state(&store());
    }

    #[test]
    fn test_snapshot_isolated_from_other_connection() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roster.db");

        let reader = SqliteStore::open(&path).unwrap();
        reader.create_teacher("t@s.com").unwrap();
        reader.create_student("a@s.com").unwrap();
        reader.create_registration_if_absent("t@s.com", "a@s.com").unwrap();

        let writer = SqliteStore::open(&path).unwrap();

        let seen = reader
            .read_snapshot(|view| {
                let roster = view.roster_of("t@s.com")?;

                // Another process commits between the roster read and the student read
                assert!(writer.delete_student("a@s.com").unwrap());

                let emails: Vec<String> = roster.into_iter().collect();
                view.find_students_by_emails(&emails)
            })
            .unwrap();

        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].email, "a@s.com");

        // Once the snapshot ends the deletion is visible
        assert!(reader.roster_of("t@s.com").unwrap().is_empty());
    }

    #[test]
    fn test_batch_lookup_beyond_variable_limit() {
        let store = store();
        {
            let tx = store.connection().unchecked_transaction().unwrap();
            let now = Utc::now().to_rfc3339();
            for i in 0..33_000 {
                tx.execute(
                    "INSERT INTO students (email, created_at) VALUES (?1, ?2)",
                    params![format!("s{:05}@s.com", i), now],
                )
                .unwrap();
            }
            tx.commit().unwrap();
        }

        let mut emails: Vec<String> = (0..33_000).map(|i| format!("s{:05}@s.com", i)).collect();
        emails.push("ghost@s.com".to_string());
        emails.push("s00000@s.com".to_string());

        let found = store.find_students_by_emails(&emails).unwrap();
        assert_eq!(found.len(), 33_000);
        assert_eq!(found[0].email, "s00000@s.com");
        assert_eq!(found[32_999].email, "s32999@s.com");
    }

    #[test]
    fn test_timestamps_round_trip_through_text() {
        let store = store();
        let created = store.create_student("a@s.com").unwrap();
        let loaded = store.find_student_by_email("a@s.com").unwrap().unwrap();

        assert_eq!(loaded.email, created.email);
        assert_eq!(loaded.created_at, created.created_at);
    }

    #[test]
    fn test_data_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roster.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.create_teacher("t@s.com").unwrap();
            store.create_student("a@s.com").unwrap();
            store.create_registration_if_absent("t@s.com", "a@s.com").unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        let roster = reopened.roster_of("t@s.com").unwrap();
        assert!(roster.contains("a@s.com"));
    }
}
