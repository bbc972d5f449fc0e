//! Storage collaborator for the prerequisite engine.
//!
//! All graph and enrollment state lives behind [`CatalogStore`]; the engine
//! never caches it across calls. A handle is passed into each operation
//! explicitly so concurrent calls stay independently testable.

pub mod memory;

pub use memory::MemoryStore;

use crate::core::{Course, CourseChangeset, EnrollmentRecord, EnrollmentStatus, NewCourse};
use crate::error::Result;

/// Read/write operations the engine requires from storage.
///
/// Graph operations fail with `CourseNotFound` / `PrerequisiteNotFound` when
/// a referenced id does not exist; `add_edge` additionally fails with
/// `SelfReference` and `DuplicateEdge`. Callers must not assume any iteration
/// order over `prerequisites` / `dependents` beyond "set of ids".
pub trait CatalogStore {
    // Courses
    fn course_exists(&self, id: i64) -> Result<bool>;
    fn course(&self, id: i64) -> Result<Option<Course>>;
    fn course_name(&self, id: i64) -> Result<Option<String>>;
    fn courses(&self) -> Result<Vec<Course>>;
    fn insert_course(&mut self, new: &NewCourse) -> Result<i64>;
    fn update_course(&mut self, id: i64, changeset: &CourseChangeset) -> Result<()>;
    fn delete_course(&mut self, id: i64) -> Result<()>;

    // Students
    fn student_exists(&self, id: i64) -> Result<bool>;
    fn insert_student(&mut self, name: &str) -> Result<i64>;

    // Prerequisite edges
    fn has_edge(&self, course: i64, prerequisite: i64) -> Result<bool>;
    /// Direct prerequisites of `course` (edge targets).
    fn prerequisites(&self, course: i64) -> Result<Vec<i64>>;
    /// Courses that list `course` as a direct prerequisite (edge sources).
    fn dependents(&self, course: i64) -> Result<Vec<i64>>;
    fn add_edge(&mut self, course: i64, prerequisite: i64) -> Result<()>;
    fn remove_edge(&mut self, course: i64, prerequisite: i64) -> Result<()>;
    /// Drop every outgoing edge of `course`.
    fn remove_edges_from(&mut self, course: i64) -> Result<()>;
    /// Retarget the edge `(course, old)` to `(course, new)`.
    fn redirect_edge(&mut self, course: i64, old: i64, new: i64) -> Result<()>;

    // Enrollment records
    fn enrollment(&self, student: i64, course: i64) -> Result<Option<EnrollmentRecord>>;
    fn student_enrollments(&self, student: i64) -> Result<Vec<EnrollmentRecord>>;
    /// Insert a fresh `Pending` record. The no-record check and the insert
    /// must be atomic (unique-constraint-equivalent).
    fn insert_enrollment(&mut self, student: i64, course: i64) -> Result<EnrollmentRecord>;
    fn update_enrollment(
        &mut self,
        student: i64,
        course: i64,
        score: Option<f64>,
        status: EnrollmentStatus,
    ) -> Result<()>;
}
