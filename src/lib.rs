//! coursecat — a course catalog built around a prerequisite DAG.
//!
//! Courses form the nodes of a directed acyclic graph whose edges point from
//! a course to each course it requires. The graph engine keeps that DAG
//! acyclic across edits and deletions, and gates enrollment on completed
//! prerequisites. Storage goes through the [`store::CatalogStore`] trait with
//! a SQLite implementation for the CLI and an in-memory one for tests.

pub mod cli;
pub mod core;
pub mod db;
pub mod enroll;
pub mod error;
pub mod graph;
pub mod store;

pub use crate::core::{
    Catalog, Course, CourseChangeset, CourseType, DifficultyLevel, EnrollmentRecord,
    EnrollmentStatus, NewCourse, Student,
};
pub use error::{Error, Result};
pub use graph::DeletionOutcome;
pub use store::{CatalogStore, MemoryStore};
