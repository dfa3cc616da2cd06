// 📋 Roster Query Engine - common students and batch registration
//
// "Common students" is a true intersection: rosters are grouped per teacher and
// intersected. Filtering edges by "teacher in {given teachers}" would give the
// union instead.

use crate::error::{Result, RosterError};
use crate::sets;
use crate::store::RosterStore;
use std::collections::BTreeSet;

/// Outcome of a batch registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// Edges written by this call
    pub created: usize,

    /// Pairs that were already registered
    pub already_registered: usize,
}

/// Roster of one teacher. Unknown teachers have an empty roster.
fn roster_or_empty<S: RosterStore>(store: &S, teacher_email: &str) -> Result<BTreeSet<String>> {
    if store.find_teacher_by_email(teacher_email)?.is_none() {
        return Ok(BTreeSet::new());
    }
    store.roster_of(teacher_email)
}

/// Keep only identities that still resolve to a Student record.
fn drop_dangling<S: RosterStore>(store: &S, candidates: BTreeSet<String>) -> Result<BTreeSet<String>> {
    if candidates.is_empty() {
        return Ok(candidates);
    }

    let emails: Vec<String> = candidates.into_iter().collect();
    Ok(store
        .find_students_by_emails(&emails)?
        .into_iter()
        .map(|student| student.email)
        .collect())
}

pub struct RosterQueryEngine<'a, S: RosterStore> {
    store: &'a S,
}

impl<'a, S: RosterStore> RosterQueryEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        RosterQueryEngine { store }
    }

    /// Students registered with every one of `teacher_emails`, sorted.
    ///
    /// An empty teacher list is `InvalidArgument`. A teacher email with no
    /// record contributes an empty roster, which empties the result. All
    /// rosters are read from one snapshot of the store.
    pub fn common_students(&self, teacher_emails: &[String]) -> Result<BTreeSet<String>> {
        if teacher_emails.is_empty() {
            return Err(RosterError::invalid("at least one teacher email is required"));
        }

        self.store.read_snapshot(|store| {
            let mut rosters = Vec::with_capacity(teacher_emails.len());
            for teacher_email in teacher_emails {
                let roster = roster_or_empty(store, teacher_email)?;
                let empty = roster.is_empty();
                rosters.push(roster);

                // Nothing can survive an intersection with the empty set
                if empty {
                    break;
                }
            }

            let common = sets::intersect_all(&rosters)?;
            drop_dangling(store, common)
        })
    }

    /// Register each student with the teacher, in order.
    ///
    /// The teacher must exist. The first unknown student aborts the batch with
    /// `NotFound` naming that email; edges written for earlier students stay.
    /// Already-registered pairs are no-ops.
    pub fn register_students(
        &self,
        teacher_email: &str,
        student_emails: &[String],
    ) -> Result<RegistrationSummary> {
        if self.store.find_teacher_by_email(teacher_email)?.is_none() {
            return Err(RosterError::teacher_not_found(teacher_email));
        }

        let mut summary = RegistrationSummary::default();

        for student_email in student_emails {
            if self.store.find_student_by_email(student_email)?.is_none() {
                return Err(RosterError::student_not_found(student_email.as_str()));
            }

            if self
                .store
                .create_registration_if_absent(teacher_email, student_email)?
            {
                summary.created += 1;
            } else {
                summary.already_registered += 1;
            }
        }

        Ok(summary)
    }
}
