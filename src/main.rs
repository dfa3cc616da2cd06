use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use class_roster::{
    import_csv, logging, CommonStudentsRequest, NotificationRequest, RosterService, SqliteStore,
    SuspendRequest,
};

#[derive(Parser, Debug)]
#[command(name = "class-roster", version, about = "Teacher/student rosters and notification recipients")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "ROSTER_DATABASE", default_value = "roster.db", global = true)]
    database: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import teacher,student rows from a CSV file
    Import { csv: PathBuf },

    /// Students registered with every given teacher
    Common {
        #[arg(required = true)]
        teachers: Vec<String>,
    },

    /// Students who would receive a notification from a teacher
    Notify { teacher: String, text: String },

    /// Suspend a student
    Suspend { student: String },

    /// Show all teachers, students and registrations
    List,
}

fn main() -> Result<()> {
    logging::init("warn")?;

    let cli = Cli::parse();
    let store = SqliteStore::open(&cli.database)
        .with_context(|| format!("Failed to open database {}", cli.database.display()))?;
    let service = RosterService::new(store);

    match cli.command {
        Command::Import { csv } => run_import(&service, &csv)?,
        Command::Common { teachers } => {
            let students = service.common_students(&CommonStudentsRequest { teachers })?;
            print_emails(students);
        }
        Command::Notify { teacher, text } => {
            let recipients = service.resolve_recipients(&NotificationRequest {
                teacher,
                notification: text,
            })?;
            print_emails(recipients);
        }
        Command::Suspend { student } => {
            service.suspend_student(&SuspendRequest {
                student: student.clone(),
            })?;
            println!("✓ Suspended {}", student);
        }
        Command::List => run_list(&service)?,
    }

    Ok(())
}

fn run_import(service: &RosterService<SqliteStore>, csv: &Path) -> Result<()> {
    println!("📂 Importing registrations from {}", csv.display());

    let summary = import_csv(service, csv)?;

    println!("✓ Rows read:             {}", summary.rows);
    println!("✓ Teachers created:      {}", summary.teachers_created);
    println!("✓ Students created:      {}", summary.students_created);
    println!("✓ Registrations created: {}", summary.registrations_created);

    Ok(())
}

fn run_list(service: &RosterService<SqliteStore>) -> Result<()> {
    println!("Teachers:");
    for teacher in service.list_teachers()? {
        println!("  {}", teacher.email);
    }

    println!("Students:");
    for student in service.list_students()? {
        let marker = if student.suspended { " (suspended)" } else { "" };
        println!("  {}{}", student.email, marker);
    }

    println!("Registrations:");
    for registration in service.list_registrations()? {
        println!("  {} → {}", registration.teacher_email, registration.student_email);
    }

    Ok(())
}

fn print_emails(emails: impl IntoIterator<Item = String>) {
    for email in emails {
        println!("{}", email);
    }
}
