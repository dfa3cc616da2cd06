// ⛔ Suspension - flip a student's suspended flag

use crate::error::{Result, RosterError};
use crate::store::RosterStore;

/// Mark the student as suspended. Suspending twice succeeds both times.
pub fn suspend_student<S: RosterStore + ?Sized>(store: &S, student_email: &str) -> Result<()> {
    set_suspension(store, student_email, true)
}

/// Clear the suspended flag.
pub fn unsuspend_student<S: RosterStore + ?Sized>(store: &S, student_email: &str) -> Result<()> {
    set_suspension(store, student_email, false)
}

fn set_suspension<S: RosterStore + ?Sized>(
    store: &S,
    student_email: &str,
    suspended: bool,
) -> Result<()> {
    if store.set_suspended(student_email, suspended)? {
        Ok(())
    } else {
        Err(RosterError::student_not_found(student_email))
    }
}
