// 🏫 Roster Service - one entry point per operation, over an injected store
//
// The service validates request records, runs the engines against the store it
// owns, and logs what happened. Transports (HTTP, CLI) only ever call this.

use crate::entities::{Registration, Student, Teacher};
use crate::error::{Result, RosterError};
use crate::recipients::RecipientResolutionEngine;
use crate::requests::{
    CommonStudentsRequest, CreateIdentityRequest, NotificationRequest, RegisterRequest,
    SuspendRequest,
};
use crate::roster::{RegistrationSummary, RosterQueryEngine};
use crate::store::RosterStore;
use crate::suspension;
use std::collections::BTreeSet;

pub struct RosterService<S: RosterStore> {
    store: S,
}

impl<S: RosterStore> RosterService<S> {
    pub fn new(store: S) -> Self {
        RosterService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // TEACHERS & STUDENTS
    // ========================================================================

    pub fn create_teacher(&self, req: &CreateIdentityRequest) -> Result<Teacher> {
        req.validate()?;
        let teacher = self.store.create_teacher(&req.email)?;
        tracing::info!(email = %teacher.email, "Teacher created");
        Ok(teacher)
    }

    pub fn create_student(&self, req: &CreateIdentityRequest) -> Result<Student> {
        req.validate()?;
        let student = self.store.create_student(&req.email)?;
        tracing::info!(email = %student.email, "Student created");
        Ok(student)
    }

    pub fn delete_teacher(&self, email: &str) -> Result<()> {
        if !self.store.delete_teacher(email)? {
            return Err(RosterError::teacher_not_found(email));
        }
        tracing::info!(email = email, "Teacher deleted");
        Ok(())
    }

    pub fn delete_student(&self, email: &str) -> Result<()> {
        if !self.store.delete_student(email)? {
            return Err(RosterError::student_not_found(email));
        }
        tracing::info!(email = email, "Student deleted");
        Ok(())
    }

    pub fn list_teachers(&self) -> Result<Vec<Teacher>> {
        self.store.list_teachers()
    }

    pub fn list_students(&self) -> Result<Vec<Student>> {
        self.store.list_students()
    }

    pub fn list_registrations(&self) -> Result<Vec<Registration>> {
        self.store.list_registrations()
    }

    // ========================================================================
    // ROSTER OPERATIONS
    // ========================================================================

    pub fn register_students(&self, req: &RegisterRequest) -> Result<RegistrationSummary> {
        req.validate()?;

        let result =
            RosterQueryEngine::new(&self.store).register_students(&req.teacher, &req.students);
        match &result {
            Ok(summary) => tracing::info!(
                teacher = %req.teacher,
                created = summary.created,
                already_registered = summary.already_registered,
                "Students registered"
            ),
            Err(e) => tracing::warn!(teacher = %req.teacher, error = %e, "Registration aborted"),
        }
        result
    }

    pub fn common_students(&self, req: &CommonStudentsRequest) -> Result<BTreeSet<String>> {
        req.validate()?;
        let students = RosterQueryEngine::new(&self.store).common_students(&req.teachers)?;
        tracing::debug!(
            teachers = req.teachers.len(),
            students = students.len(),
            "Common students computed"
        );
        Ok(students)
    }

    pub fn suspend_student(&self, req: &SuspendRequest) -> Result<()> {
        req.validate()?;
        suspension::suspend_student(&self.store, &req.student)?;
        tracing::info!(student = %req.student, "Student suspended");
        Ok(())
    }

    pub fn unsuspend_student(&self, req: &SuspendRequest) -> Result<()> {
        req.validate()?;
        suspension::unsuspend_student(&self.store, &req.student)?;
        tracing::info!(student = %req.student, "Student unsuspended");
        Ok(())
    }

    pub fn resolve_recipients(&self, req: &NotificationRequest) -> Result<BTreeSet<String>> {
        req.validate()?;
        let recipients = RecipientResolutionEngine::new(&self.store)
            .resolve_recipients(&req.teacher, &req.notification)?;
        tracing::debug!(
            teacher = %req.teacher,
            recipients = recipients.len(),
            "Notification recipients resolved"
        );
        Ok(recipients)
    }
}
