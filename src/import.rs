// 📥 Bulk import - teacher,student rows from CSV
//
// Expected header: teacher,student
// Missing teachers and students are created on the fly; every row becomes a
// registration (existing pairs are no-ops).

use crate::error::RosterError;
use crate::requests::{CreateIdentityRequest, RegisterRequest};
use crate::service::RosterService;
use crate::store::RosterStore;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRow {
    pub teacher: String,
    pub student: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub teachers_created: usize,
    pub students_created: usize,
    pub registrations_created: usize,
}

pub fn load_rows<R: Read>(reader: R) -> Result<Vec<RegistrationRow>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let row: RegistrationRow =
            result.with_context(|| format!("Failed to deserialize row {}", line + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Create the identity unless it already exists. Returns true when created.
fn ensure<T>(outcome: crate::Result<T>) -> crate::Result<bool> {
    match outcome {
        Ok(_) => Ok(true),
        Err(RosterError::Conflict { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn import_rows<S: RosterStore>(
    service: &RosterService<S>,
    rows: &[RegistrationRow],
) -> Result<ImportSummary> {
    let mut summary = ImportSummary {
        rows: rows.len(),
        ..Default::default()
    };

    // Group per teacher so each teacher gets one batch registration
    let mut by_teacher: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for row in rows {
        by_teacher
            .entry(row.teacher.as_str())
            .or_default()
            .push(row.student.clone());
    }

    for (teacher, students) in &by_teacher {
        let created = ensure(service.create_teacher(&CreateIdentityRequest {
            email: teacher.to_string(),
        }))
        .with_context(|| format!("Failed to create teacher {}", teacher))?;
        if created {
            summary.teachers_created += 1;
        }

        for student in students {
            if service.store().find_student_by_email(student)?.is_some() {
                continue;
            }
            let created = ensure(service.create_student(&CreateIdentityRequest {
                email: student.clone(),
            }))
            .with_context(|| format!("Failed to create student {}", student))?;
            if created {
                summary.students_created += 1;
            }
        }

        let registered = service
            .register_students(&RegisterRequest {
                teacher: teacher.to_string(),
                students: students.clone(),
            })
            .with_context(|| format!("Failed to register students with {}", teacher))?;
        summary.registrations_created += registered.created;
    }

    Ok(summary)
}

pub fn import_csv<S: RosterStore>(service: &RosterService<S>, csv_path: &Path) -> Result<ImportSummary> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    let rows = load_rows(file)?;
    import_rows(service, &rows)
}
