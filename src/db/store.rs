//! SQLite implementation of the catalog store.

use rusqlite::{params, Connection as SqliteConnection, OptionalExtension};

use crate::core::{
    Course, CourseChangeset, CourseType, DifficultyLevel, EnrollmentRecord, EnrollmentStatus,
    NewCourse,
};
use crate::db::schema::{CourseRow, EnrollmentRow};
use crate::error::{Error, Result};
use crate::store::CatalogStore;

/// Catalog store over a borrowed SQLite connection.
///
/// Borrowing (rather than owning) the connection lets the same impl run
/// against a plain connection or inside a `rusqlite::Transaction`, which
/// derefs to one. The facade uses that to make each engine call
/// all-or-nothing.
pub struct SqliteStore<'a> {
    conn: &'a SqliteConnection,
}

impl<'a> SqliteStore<'a> {
    /// Wrap a connection (or transaction, via deref).
    pub fn new(conn: &'a SqliteConnection) -> Self {
        Self { conn }
    }

    fn course_from_row(row: CourseRow) -> Result<Course> {
        Ok(Course {
            id: row.id,
            name: row.name,
            price: row.price,
            duration: row.duration,
            course_type: CourseType::parse(&row.course_type)?,
            difficulty: DifficultyLevel::parse(&row.difficulty)?,
            notes_url: row.notes_url,
            video_url: row.video_url,
            created_at: row.created_at,
        })
    }

    fn record_from_row(row: EnrollmentRow) -> Result<EnrollmentRecord> {
        Ok(EnrollmentRecord {
            student_id: row.student_id,
            course_id: row.course_id,
            status: EnrollmentStatus::parse(&row.status)?,
            score: row.score,
            enrolled_at: row.enrolled_at,
        })
    }
}

impl CatalogStore for SqliteStore<'_> {
    fn course_exists(&self, id: i64) -> Result<bool> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM courses WHERE id = ?")?;
        Ok(stmt.exists([id])?)
    }

    fn course(&self, id: i64) -> Result<Option<Course>> {
        let row = self
            .conn
            .query_row("SELECT * FROM courses WHERE id = ?", [id], |r| {
                CourseRow::from_row(r)
            })
            .optional()?;
        row.map(Self::course_from_row).transpose()
    }

    fn course_name(&self, id: i64) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT name FROM courses WHERE id = ?", [id], |r| r.get(0))
            .optional()?)
    }

    fn courses(&self) -> Result<Vec<Course>> {
        let mut stmt = self.conn.prepare("SELECT * FROM courses ORDER BY id")?;
        let rows = stmt
            .query_map([], |r| CourseRow::from_row(r))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(Self::course_from_row).collect()
    }

    fn insert_course(&mut self, new: &NewCourse) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO courses (name, price, duration, course_type, difficulty, notes_url, video_url)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                new.name,
                new.price,
                new.duration,
                new.course_type.as_str(),
                new.difficulty.as_str(),
                new.notes_url,
                new.video_url,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_course(&mut self, id: i64, changeset: &CourseChangeset) -> Result<()> {
        if !self.course_exists(id)? {
            return Err(Error::CourseNotFound(id));
        }
        if let Some(name) = &changeset.name {
            self.conn
                .execute("UPDATE courses SET name = ? WHERE id = ?", params![name, id])?;
        }
        if let Some(price) = changeset.price {
            self.conn.execute(
                "UPDATE courses SET price = ? WHERE id = ?",
                params![price, id],
            )?;
        }
        if let Some(duration) = changeset.duration {
            self.conn.execute(
                "UPDATE courses SET duration = ? WHERE id = ?",
                params![duration, id],
            )?;
        }
        if let Some(course_type) = changeset.course_type {
            self.conn.execute(
                "UPDATE courses SET course_type = ? WHERE id = ?",
                params![course_type.as_str(), id],
            )?;
        }
        if let Some(difficulty) = changeset.difficulty {
            self.conn.execute(
                "UPDATE courses SET difficulty = ? WHERE id = ?",
                params![difficulty.as_str(), id],
            )?;
        }
        if let Some(notes_url) = &changeset.notes_url {
            self.conn.execute(
                "UPDATE courses SET notes_url = ? WHERE id = ?",
                params![notes_url, id],
            )?;
        }
        if let Some(video_url) = &changeset.video_url {
            self.conn.execute(
                "UPDATE courses SET video_url = ? WHERE id = ?",
                params![video_url, id],
            )?;
        }
        Ok(())
    }

    fn delete_course(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM courses WHERE id = ?", [id])?;
        if affected == 0 {
            return Err(Error::CourseNotFound(id));
        }
        Ok(())
    }

    fn student_exists(&self, id: i64) -> Result<bool> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM students WHERE id = ?")?;
        Ok(stmt.exists([id])?)
    }

    fn insert_student(&mut self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO students (name) VALUES (?)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn has_edge(&self, course: i64, prerequisite: i64) -> Result<bool> {
        if !self.course_exists(course)? {
            return Err(Error::CourseNotFound(course));
        }
        if !self.course_exists(prerequisite)? {
            return Err(Error::CourseNotFound(prerequisite));
        }
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM prerequisites WHERE course_id = ? AND prerequisite_id = ?")?;
        Ok(stmt.exists([course, prerequisite])?)
    }

    fn prerequisites(&self, course: i64) -> Result<Vec<i64>> {
        if !self.course_exists(course)? {
            return Err(Error::CourseNotFound(course));
        }
        let mut stmt = self
            .conn
            .prepare("SELECT prerequisite_id FROM prerequisites WHERE course_id = ?")?;
        let ids = stmt
            .query_map([course], |r| r.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn dependents(&self, course: i64) -> Result<Vec<i64>> {
        if !self.course_exists(course)? {
            return Err(Error::CourseNotFound(course));
        }
        let mut stmt = self
            .conn
            .prepare("SELECT course_id FROM prerequisites WHERE prerequisite_id = ?")?;
        let ids = stmt
            .query_map([course], |r| r.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn add_edge(&mut self, course: i64, prerequisite: i64) -> Result<()> {
        if course == prerequisite {
            return Err(Error::SelfReference(course));
        }
        if !self.course_exists(course)? {
            return Err(Error::CourseNotFound(course));
        }
        if !self.course_exists(prerequisite)? {
            return Err(Error::PrerequisiteNotFound(prerequisite));
        }
        if self.has_edge(course, prerequisite)? {
            return Err(Error::DuplicateEdge(course, prerequisite));
        }
        self.conn.execute(
            "INSERT INTO prerequisites (course_id, prerequisite_id) VALUES (?, ?)",
            [course, prerequisite],
        )?;
        Ok(())
    }

    fn remove_edge(&mut self, course: i64, prerequisite: i64) -> Result<()> {
        if !self.course_exists(course)? {
            return Err(Error::CourseNotFound(course));
        }
        if !self.course_exists(prerequisite)? {
            return Err(Error::CourseNotFound(prerequisite));
        }
        self.conn.execute(
            "DELETE FROM prerequisites WHERE course_id = ? AND prerequisite_id = ?",
            [course, prerequisite],
        )?;
        Ok(())
    }

    fn remove_edges_from(&mut self, course: i64) -> Result<()> {
        if !self.course_exists(course)? {
            return Err(Error::CourseNotFound(course));
        }
        self.conn
            .execute("DELETE FROM prerequisites WHERE course_id = ?", [course])?;
        Ok(())
    }

    fn redirect_edge(&mut self, course: i64, old: i64, new: i64) -> Result<()> {
        if !self.course_exists(course)? {
            return Err(Error::CourseNotFound(course));
        }
        if !self.course_exists(old)? {
            return Err(Error::CourseNotFound(old));
        }
        if !self.course_exists(new)? {
            return Err(Error::PrerequisiteNotFound(new));
        }
        self.conn.execute(
            "UPDATE prerequisites SET prerequisite_id = ?
             WHERE course_id = ? AND prerequisite_id = ?",
            [new, course, old],
        )?;
        Ok(())
    }

    fn enrollment(&self, student: i64, course: i64) -> Result<Option<EnrollmentRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT * FROM enrollments WHERE student_id = ? AND course_id = ?",
                [student, course],
                |r| EnrollmentRow::from_row(r),
            )
            .optional()?;
        row.map(Self::record_from_row).transpose()
    }

    fn student_enrollments(&self, student: i64) -> Result<Vec<EnrollmentRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM enrollments WHERE student_id = ? ORDER BY course_id")?;
        let rows = stmt
            .query_map([student], |r| EnrollmentRow::from_row(r))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(Self::record_from_row).collect()
    }

    fn insert_enrollment(&mut self, student: i64, course: i64) -> Result<EnrollmentRecord> {
        // The primary key on (student_id, course_id) makes the existence
        // check and the insert atomic under concurrent identical requests.
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO enrollments (student_id, course_id, status)
             VALUES (?, ?, 'pending')",
            [student, course],
        )?;
        if inserted == 0 {
            return Err(Error::AlreadyEnrolled { student, course });
        }
        self.enrollment(student, course)?
            .ok_or(Error::NotEnrolled { student, course })
    }

    fn update_enrollment(
        &mut self,
        student: i64,
        course: i64,
        score: Option<f64>,
        status: EnrollmentStatus,
    ) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE enrollments SET score = ?, status = ?
             WHERE student_id = ? AND course_id = ?",
            params![score, status.as_str(), student, course],
        )?;
        if affected == 0 {
            return Err(Error::NotEnrolled { student, course });
        }
        Ok(())
    }
}
