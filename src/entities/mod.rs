// Entity Models - teachers, students and the registrations between them
//
// Each entity is identified by its email address:
// - Teacher and Student emails are unique, case-sensitive exact strings
// - A Registration is an edge (teacher_email, student_email), at most one per pair
// - Rosters are never stored; they are recomputed from edges on every call

pub mod teacher;
pub mod student;
pub mod registration;

pub use teacher::Teacher;
pub use student::Student;
pub use registration::Registration;
