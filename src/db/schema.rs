//! Database schema and row types.

use rusqlite::Row;

use crate::db::Connection as DbConnection;
use crate::error::{Error, Result};

/// Schema version and management.
pub struct Schema;

impl Schema {
    /// Current schema version.
    pub const VERSION: i32 = 1;

    /// Initialize the database schema.
    ///
    /// Creates all tables, indexes, and constraints. Returns an error if the
    /// database is already initialized.
    pub fn init(conn: &mut DbConnection) -> Result<()> {
        if Self::is_initialized(conn) {
            return Err(Error::AlreadyInitialized);
        }

        conn.as_conn().pragma_update(None, "foreign_keys", "ON")?;
        conn.as_conn().pragma_update(None, "journal_mode", "WAL")?;

        conn.as_conn().execute_batch(
            "CREATE TABLE courses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL NOT NULL CHECK(price >= 0),
                duration INTEGER NOT NULL CHECK(duration > 0),
                course_type TEXT NOT NULL
                    CHECK(course_type IN ('diploma', 'degree', 'certificate')),
                difficulty TEXT NOT NULL
                    CHECK(difficulty IN ('beginner', 'intermediate', 'advanced')),
                notes_url TEXT,
                video_url TEXT,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now'))
            );

            CREATE TABLE students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now'))
            );

            CREATE TABLE prerequisites (
                course_id INTEGER NOT NULL,
                prerequisite_id INTEGER NOT NULL,
                PRIMARY KEY (course_id, prerequisite_id),
                FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE,
                FOREIGN KEY (prerequisite_id) REFERENCES courses(id),
                CHECK(course_id != prerequisite_id)
            );

            CREATE TABLE enrollments (
                student_id INTEGER NOT NULL,
                course_id INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK(status IN ('pending', 'completed')),
                score REAL CHECK(score IS NULL OR (score >= 0 AND score <= 100)),
                enrolled_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now')),
                PRIMARY KEY (student_id, course_id),
                FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE,
                FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
            );

            CREATE INDEX idx_prerequisites_course_id ON prerequisites(course_id);
            CREATE INDEX idx_prerequisites_prerequisite_id ON prerequisites(prerequisite_id);
            CREATE INDEX idx_enrollments_course_id ON enrollments(course_id);",
        )?;

        Ok(())
    }

    /// Check if the database schema is already initialized.
    pub fn is_initialized(conn: &mut DbConnection) -> bool {
        conn.as_conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='courses'")
            .and_then(|mut stmt| stmt.exists(()))
            .unwrap_or(false)
    }
}

/// Row representation of a course from the database.
#[derive(Debug, Clone)]
pub struct CourseRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub duration: i64,
    pub course_type: String,
    pub difficulty: String,
    pub notes_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: String,
}

impl CourseRow {
    /// Create a CourseRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            price: row.get("price")?,
            duration: row.get("duration")?,
            course_type: row.get("course_type")?,
            difficulty: row.get("difficulty")?,
            notes_url: row.get("notes_url")?,
            video_url: row.get("video_url")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Row representation of an enrollment from the database.
#[derive(Debug, Clone)]
pub struct EnrollmentRow {
    pub student_id: i64,
    pub course_id: i64,
    pub status: String,
    pub score: Option<f64>,
    pub enrolled_at: String,
}

impl EnrollmentRow {
    /// Create an EnrollmentRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            student_id: row.get("student_id")?,
            course_id: row.get("course_id")?,
            status: row.get("status")?,
            score: row.get("score")?,
            enrolled_at: row.get("enrolled_at")?,
        })
    }
}
