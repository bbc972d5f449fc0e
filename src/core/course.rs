//! Course model and changeset.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Kind of credential a course leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Diploma,
    Degree,
    Certificate,
}

impl CourseType {
    /// Parse a string into a CourseType.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "diploma" => Ok(CourseType::Diploma),
            "degree" => Ok(CourseType::Degree),
            "certificate" => Ok(CourseType::Certificate),
            _ => Err(Error::InvalidCourseType(s.to_string())),
        }
    }

    /// Convert to string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::Diploma => "diploma",
            CourseType::Degree => "degree",
            CourseType::Certificate => "certificate",
        }
    }
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Difficulty level of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// Parse a string into a DifficultyLevel.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "beginner" => Ok(DifficultyLevel::Beginner),
            "intermediate" => Ok(DifficultyLevel::Intermediate),
            "advanced" => Ok(DifficultyLevel::Advanced),
            _ => Err(Error::InvalidDifficulty(s.to_string())),
        }
    }

    /// Convert to string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A course in the catalog.
///
/// The graph engine only cares about `id`; the remaining attributes are owned
/// by catalog management.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Duration in weeks.
    pub duration: i64,
    pub course_type: CourseType,
    pub difficulty: DifficultyLevel,
    pub notes_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: String,
}

/// Attributes for a course about to be created.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub price: f64,
    pub duration: i64,
    pub course_type: CourseType,
    pub difficulty: DifficultyLevel,
    pub notes_url: Option<String>,
    pub video_url: Option<String>,
}

impl NewCourse {
    /// Validate catalog-level constraints before insertion.
    pub fn validate(&self) -> Result<()> {
        if self.price < 0.0 {
            return Err(Error::InvalidPrice(self.price));
        }
        if self.duration <= 0 {
            return Err(Error::InvalidDuration(self.duration));
        }
        Ok(())
    }
}

/// Partial update for a course: only the fields that are `Some` change.
///
/// The store applies this as one UPDATE; the engine never builds SQL
/// conditionally.
#[derive(Debug, Clone, Default)]
pub struct CourseChangeset {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<i64>,
    pub course_type: Option<CourseType>,
    pub difficulty: Option<DifficultyLevel>,
    pub notes_url: Option<String>,
    pub video_url: Option<String>,
}

impl CourseChangeset {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.duration.is_none()
            && self.course_type.is_none()
            && self.difficulty.is_none()
            && self.notes_url.is_none()
            && self.video_url.is_none()
    }

    /// Validate the fields that carry value constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(Error::InvalidPrice(price));
            }
        }
        if let Some(duration) = self.duration {
            if duration <= 0 {
                return Err(Error::InvalidDuration(duration));
            }
        }
        Ok(())
    }
}
