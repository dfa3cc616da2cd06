// 🧠 In-memory roster store
//
// All three tables sit behind one RwLock, so a single lookup always sees a
// consistent view of teachers, students and edges. Snapshots copy the tables
// under one read guard and run against the detached copy.

use super::RosterStore;
use crate::entities::{Registration, Student, Teacher};
use crate::error::{EntityKind, Result, RosterError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
struct Tables {
    teachers: BTreeMap<String, Teacher>,
    students: BTreeMap<String, Student>,
    /// Keyed by (teacher_email, student_email), which also gives the listing order
    registrations: BTreeMap<(String, String), Registration>,
}

/// Roster store that keeps everything in process memory.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| RosterError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| RosterError::Poisoned)
    }
}

impl RosterStore for MemoryStore {
    fn read_snapshot<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Self) -> Result<R>,
    {
        let frozen = self.read()?.clone();
        let snapshot = MemoryStore {
            tables: Arc::new(RwLock::new(frozen)),
        };
        f(&snapshot)
    }

    fn find_teacher_by_email(&self, email: &str) -> Result<Option<Teacher>> {
        Ok(self.read()?.teachers.get(email).cloned())
    }

    fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        Ok(self.read()?.students.get(email).cloned())
    }

    fn find_students_by_emails(&self, emails: &[String]) -> Result<Vec<Student>> {
        let tables = self.read()?;
        let wanted: BTreeSet<&str> = emails.iter().map(String::as_str).collect();

        Ok(wanted
            .into_iter()
            .filter_map(|email| tables.students.get(email).cloned())
            .collect())
    }

    fn roster_of(&self, teacher_email: &str) -> Result<BTreeSet<String>> {
        let tables = self.read()?;

        Ok(tables
            .registrations
            .keys()
            .filter(|(teacher, _)| teacher == teacher_email)
            .map(|(_, student)| student.clone())
            .collect())
    }

    fn create_registration_if_absent(
        &self,
        teacher_email: &str,
        student_email: &str,
    ) -> Result<bool> {
        let mut tables = self.write()?;
        let key = (teacher_email.to_string(), student_email.to_string());

        if tables.registrations.contains_key(&key) {
            return Ok(false);
        }

        tables
            .registrations
            .insert(key, Registration::new(teacher_email, student_email));
        Ok(true)
    }

    fn set_suspended(&self, student_email: &str, suspended: bool) -> Result<bool> {
        let mut tables = self.write()?;

        match tables.students.get_mut(student_email) {
            Some(student) => {
                student.suspended = suspended;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn create_teacher(&self, email: &str) -> Result<Teacher> {
        let mut tables = self.write()?;

        if tables.teachers.contains_key(email) {
            return Err(RosterError::Conflict {
                kind: EntityKind::Teacher,
                email: email.to_string(),
            });
        }

        let teacher = Teacher::new(email);
        tables.teachers.insert(email.to_string(), teacher.clone());
        Ok(teacher)
    }

    fn create_student(&self, email: &str) -> Result<Student> {
        let mut tables = self.write()?;

        if tables.students.contains_key(email) {
            return Err(RosterError::Conflict {
                kind: EntityKind::Student,
                email: email.to_string(),
            });
        }

        let student = Student::new(email);
        tables.students.insert(email.to_string(), student.clone());
        Ok(student)
    }

    fn delete_teacher(&self, email: &str) -> Result<bool> {
        let mut tables = self.write()?;

        if tables.teachers.remove(email).is_none() {
            return Ok(false);
        }
        tables.registrations.retain(|(teacher, _), _| teacher != email);
        Ok(true)
    }

    fn delete_student(&self, email: &str) -> Result<bool> {
        let mut tables = self.write()?;

        if tables.students.remove(email).is_none() {
            return Ok(false);
        }
        tables.registrations.retain(|(_, student), _| student != email);
        Ok(true)
    }

    fn list_teachers(&self) -> Result<Vec<Teacher>> {
        Ok(self.read()?.teachers.values().cloned().collect())
    }

    fn list_students(&self) -> Result<Vec<Student>> {
        Ok(self.read()?.students.values().cloned().collect())
    }

    fn list_registrations(&self) -> Result<Vec<Registration>> {
        Ok(self.read()?.registrations.values().cloned().collect())
    }
}
