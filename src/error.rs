//! Error types for the coursecat engine.

use std::io;

/// Result type alias for coursecat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the coursecat engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error.
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Course not found.
    #[error("Course #{0} not found")]
    CourseNotFound(i64),

    /// Student not found.
    #[error("Student #{0} not found")]
    StudentNotFound(i64),

    /// A referenced prerequisite course does not exist.
    #[error("Prerequisite course #{0} not found")]
    PrerequisiteNotFound(i64),

    /// A course cannot be its own prerequisite.
    #[error("Course #{0} cannot require itself")]
    SelfReference(i64),

    /// The prerequisite edge already exists.
    #[error("Course #{0} already requires #{1}")]
    DuplicateEdge(i64, i64),

    /// Adding the edge would close a directed cycle.
    #[error(
        "Making #{prerequisite} a prerequisite of #{course} would create a circular dependency"
    )]
    CircularDependency { course: i64, prerequisite: i64 },

    /// Deletion blocked: other courses list this one as prerequisite.
    #[error("Cannot delete course #{course}: it is a prerequisite for {dependents}. Use force deletion to proceed.")]
    BlockedByDependents { course: i64, dependents: String },

    /// Student already has a record for this course.
    #[error("Student #{student} is already enrolled in course #{course}")]
    AlreadyEnrolled { student: i64, course: i64 },

    /// A direct prerequisite has not been completed.
    #[error("Prerequisite not completed: {name} (#{prerequisite})")]
    PrerequisiteNotMet { prerequisite: i64, name: String },

    /// Student has no enrollment record for this course.
    #[error("Student #{student} is not enrolled in course #{course}")]
    NotEnrolled { student: i64, course: i64 },

    /// Invalid enrollment status string.
    #[error("Invalid enrollment status: {0}")]
    InvalidStatus(String),

    /// Invalid course type string.
    #[error("Invalid course type: {0}")]
    InvalidCourseType(String),

    /// Invalid difficulty level string.
    #[error("Invalid difficulty level: {0}")]
    InvalidDifficulty(String),

    /// Price must be non-negative.
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    /// Duration must be positive.
    #[error("Invalid duration: {0} weeks")]
    InvalidDuration(i64),

    /// Score must be within 0..=100.
    #[error("Invalid score: {0}")]
    InvalidScore(f64),

    /// Already initialized.
    #[error("Already initialized in this directory")]
    AlreadyInitialized,

    /// Not initialized.
    #[error("Not initialized. Run `coursecat init` first")]
    NotInitialized,
}

impl Error {
    /// Whether the caller may safely retry the operation unmodified.
    ///
    /// Only storage hiccups (busy or locked database) qualify; every other
    /// error is permanent for the given input. No partial mutation is ever
    /// left visible, so a retry starts from a clean state either way.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Db(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Format a list of course names as a comma-separated string.
pub fn format_course_names(names: &[String]) -> String {
    names.join(", ")
}
