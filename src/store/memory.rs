//! In-memory catalog store.
//!
//! Backs the engine unit tests and doubles as a lightweight store for
//! library users who do not want SQLite. Mutations are infallible once
//! validated, so the engine's validate-before-mutate discipline alone gives
//! all-or-nothing behavior here.

use std::collections::{BTreeSet, HashMap};

use crate::core::{
    Course, CourseChangeset, EnrollmentRecord, EnrollmentStatus, NewCourse, Student,
};
use crate::error::{Error, Result};
use crate::store::CatalogStore;

/// HashMap-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    courses: HashMap<i64, Course>,
    students: HashMap<i64, Student>,
    /// Edge set as ordered pairs `(course, prerequisite)`.
    edges: BTreeSet<(i64, i64)>,
    enrollments: HashMap<(i64, i64), EnrollmentRecord>,
    next_course_id: i64,
    next_student_id: i64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            next_course_id: 1,
            next_student_id: 1,
            ..Default::default()
        }
    }

    fn require_course(&self, id: i64) -> Result<()> {
        if self.courses.contains_key(&id) {
            Ok(())
        } else {
            Err(Error::CourseNotFound(id))
        }
    }
}

impl CatalogStore for MemoryStore {
    fn course_exists(&self, id: i64) -> Result<bool> {
        Ok(self.courses.contains_key(&id))
    }

    fn course(&self, id: i64) -> Result<Option<Course>> {
        Ok(self.courses.get(&id).cloned())
    }

    fn course_name(&self, id: i64) -> Result<Option<String>> {
        Ok(self.courses.get(&id).map(|c| c.name.clone()))
    }

    fn courses(&self) -> Result<Vec<Course>> {
        let mut all: Vec<Course> = self.courses.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    fn insert_course(&mut self, new: &NewCourse) -> Result<i64> {
        let id = self.next_course_id;
        self.next_course_id += 1;
        self.courses.insert(
            id,
            Course {
                id,
                name: new.name.clone(),
                price: new.price,
                duration: new.duration,
                course_type: new.course_type,
                difficulty: new.difficulty,
                notes_url: new.notes_url.clone(),
                video_url: new.video_url.clone(),
                created_at: String::new(),
            },
        );
        Ok(id)
    }

    fn update_course(&mut self, id: i64, changeset: &CourseChangeset) -> Result<()> {
        let course = self
            .courses
            .get_mut(&id)
            .ok_or(Error::CourseNotFound(id))?;
        if let Some(name) = &changeset.name {
            course.name = name.clone();
        }
        if let Some(price) = changeset.price {
            course.price = price;
        }
        if let Some(duration) = changeset.duration {
            course.duration = duration;
        }
        if let Some(course_type) = changeset.course_type {
            course.course_type = course_type;
        }
        if let Some(difficulty) = changeset.difficulty {
            course.difficulty = difficulty;
        }
        if let Some(notes_url) = &changeset.notes_url {
            course.notes_url = Some(notes_url.clone());
        }
        if let Some(video_url) = &changeset.video_url {
            course.video_url = Some(video_url.clone());
        }
        Ok(())
    }

    fn delete_course(&mut self, id: i64) -> Result<()> {
        self.courses
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::CourseNotFound(id))
    }

    fn student_exists(&self, id: i64) -> Result<bool> {
        Ok(self.students.contains_key(&id))
    }

    fn insert_student(&mut self, name: &str) -> Result<i64> {
        let id = self.next_student_id;
        self.next_student_id += 1;
        self.students.insert(
            id,
            Student {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    fn has_edge(&self, course: i64, prerequisite: i64) -> Result<bool> {
        self.require_course(course)?;
        self.require_course(prerequisite)?;
        Ok(self.edges.contains(&(course, prerequisite)))
    }

    fn prerequisites(&self, course: i64) -> Result<Vec<i64>> {
        self.require_course(course)?;
        Ok(self
            .edges
            .iter()
            .filter(|(c, _)| *c == course)
            .map(|(_, p)| *p)
            .collect())
    }

    fn dependents(&self, course: i64) -> Result<Vec<i64>> {
        self.require_course(course)?;
        Ok(self
            .edges
            .iter()
            .filter(|(_, p)| *p == course)
            .map(|(c, _)| *c)
            .collect())
    }

    fn add_edge(&mut self, course: i64, prerequisite: i64) -> Result<()> {
        if course == prerequisite {
            return Err(Error::SelfReference(course));
        }
        self.require_course(course)?;
        if !self.courses.contains_key(&prerequisite) {
            return Err(Error::PrerequisiteNotFound(prerequisite));
        }
        if !self.edges.insert((course, prerequisite)) {
            return Err(Error::DuplicateEdge(course, prerequisite));
        }
        Ok(())
    }

    fn remove_edge(&mut self, course: i64, prerequisite: i64) -> Result<()> {
        self.require_course(course)?;
        self.require_course(prerequisite)?;
        self.edges.remove(&(course, prerequisite));
        Ok(())
    }

    fn remove_edges_from(&mut self, course: i64) -> Result<()> {
        self.require_course(course)?;
        self.edges.retain(|(c, _)| *c != course);
        Ok(())
    }

    fn redirect_edge(&mut self, course: i64, old: i64, new: i64) -> Result<()> {
        self.require_course(course)?;
        self.require_course(old)?;
        if !self.courses.contains_key(&new) {
            return Err(Error::PrerequisiteNotFound(new));
        }
        if self.edges.remove(&(course, old)) {
            self.edges.insert((course, new));
        }
        Ok(())
    }

    fn enrollment(&self, student: i64, course: i64) -> Result<Option<EnrollmentRecord>> {
        Ok(self.enrollments.get(&(student, course)).cloned())
    }

    fn student_enrollments(&self, student: i64) -> Result<Vec<EnrollmentRecord>> {
        let mut records: Vec<EnrollmentRecord> = self
            .enrollments
            .values()
            .filter(|r| r.student_id == student)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.course_id);
        Ok(records)
    }

    fn insert_enrollment(&mut self, student: i64, course: i64) -> Result<EnrollmentRecord> {
        if self.enrollments.contains_key(&(student, course)) {
            return Err(Error::AlreadyEnrolled { student, course });
        }
        let record = EnrollmentRecord {
            student_id: student,
            course_id: course,
            status: EnrollmentStatus::Pending,
            score: None,
            enrolled_at: String::new(),
        };
        self.enrollments.insert((student, course), record.clone());
        Ok(record)
    }

    fn update_enrollment(
        &mut self,
        student: i64,
        course: i64,
        score: Option<f64>,
        status: EnrollmentStatus,
    ) -> Result<()> {
        let record = self
            .enrollments
            .get_mut(&(student, course))
            .ok_or(Error::NotEnrolled { student, course })?;
        record.score = score;
        record.status = status;
        Ok(())
    }
}
