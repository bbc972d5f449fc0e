//! Enrollment record model.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Status of an enrollment.
///
/// The Enrollment Gate only ever writes `Pending`; the evaluation path is the
/// sole writer of `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Pending,
    Completed,
}

impl EnrollmentStatus {
    /// Parse a string into an EnrollmentStatus.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(EnrollmentStatus::Pending),
            "completed" => Ok(EnrollmentStatus::Completed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }

    /// Convert to string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One student's record for one course.
///
/// At most one record exists per `(student_id, course_id)` pair; its
/// existence is the only evidence the student ever took the course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub student_id: i64,
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub score: Option<f64>,
    pub enrolled_at: String,
}

impl EnrollmentRecord {
    /// Whether this record satisfies a prerequisite check.
    pub fn is_completed(&self) -> bool {
        self.status == EnrollmentStatus::Completed
    }
}

/// A student, as far as this engine needs to know one.
///
/// Account management lives with an external collaborator; this is the
/// minimal surface for existence checks and fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
}
