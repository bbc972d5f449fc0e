//! Core domain types and the catalog facade.

pub mod catalog;
pub mod course;
pub mod enrollment;

pub use catalog::Catalog;
pub use course::{Course, CourseChangeset, CourseType, DifficultyLevel, NewCourse};
pub use enrollment::{EnrollmentRecord, EnrollmentStatus, Student};
