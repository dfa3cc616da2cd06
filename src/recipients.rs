// 📬 Recipient Resolution Engine - who receives a teacher's notification
//
//   candidates = registered ∪ (mentioned ∩ known students)
//   recipients = candidates where suspended == false
//
// Suspension is applied last so it overrides every way a student qualified.

use crate::error::{Result, RosterError};
use crate::mentions::parse_mentions;
use crate::sets;
use crate::store::RosterStore;
use std::collections::BTreeSet;

pub struct RecipientResolutionEngine<'a, S: RosterStore> {
    store: &'a S,
}

impl<'a, S: RosterStore> RecipientResolutionEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        RecipientResolutionEngine { store }
    }

    /// Students eligible to receive `notification_text` from `teacher_email`,
    /// sorted.
    ///
    /// The teacher must exist (`NotFound` otherwise). Mentioned identities with
    /// no Student record are dropped, since their suspension state is unknown.
    /// Roster and suspension state come from one snapshot of the store.
    pub fn resolve_recipients(
        &self,
        teacher_email: &str,
        notification_text: &str,
    ) -> Result<BTreeSet<String>> {
        let mentioned = parse_mentions(notification_text);

        self.store
            .read_snapshot(|store| resolve_in(store, teacher_email, &mentioned))
    }
}

fn resolve_in<S: RosterStore>(
    store: &S,
    teacher_email: &str,
    mentioned: &BTreeSet<String>,
) -> Result<BTreeSet<String>> {
    if store.find_teacher_by_email(teacher_email)?.is_none() {
        return Err(RosterError::teacher_not_found(teacher_email));
    }

    let registered = store.roster_of(teacher_email)?;

    // One batch lookup for everyone who could possibly qualify
    let lookup: Vec<String> = sets::union(&registered, mentioned).into_iter().collect();
    let known = store.find_students_by_emails(&lookup)?;

    let known_emails: BTreeSet<String> = known.iter().map(|s| s.email.clone()).collect();
    let reachable: BTreeSet<String> = known
        .iter()
        .filter(|s| s.is_reachable())
        .map(|s| s.email.clone())
        .collect();

    // Dangling roster edges and unknown mentions both fall out here
    let registered = sets::intersect(&registered, &known_emails);
    let mentioned = sets::intersect(mentioned, &known_emails);

    let candidates = sets::union(&registered, &mentioned);
    Ok(sets::intersect(&candidates, &reachable))
}
