//! Catalog facade: course lifecycle, enrollment, and evaluation over SQLite.
//!
//! Every mutating operation runs inside one transaction, so an engine
//! rejection or a storage failure mid-write rolls the call back wholesale.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::core::{Course, CourseChangeset, EnrollmentRecord, EnrollmentStatus, NewCourse};
use crate::db::schema::Schema;
use crate::db::{Connection, SqliteStore};
use crate::enroll;
use crate::error::{Error, Result};
use crate::graph::{self, DeletionOutcome};
use crate::store::CatalogStore;

/// SQLite-backed course catalog.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open an existing catalog database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        if !Schema::is_initialized(&mut conn) {
            return Err(Error::NotInitialized);
        }
        Ok(Self { conn })
    }

    /// Create and initialize a catalog database at the given path.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        Schema::init(&mut conn)?;
        info!("initialized catalog database");
        Ok(Self { conn })
    }

    /// Open an in-memory catalog for testing.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        Schema::init(&mut conn)?;
        Ok(Self { conn })
    }

    /// Run `f` against a store inside one transaction.
    fn with_tx<T>(&mut self, f: impl FnOnce(&mut SqliteStore) -> Result<T>) -> Result<T> {
        let tx = self.conn.transaction()?;
        let result = {
            let mut store = SqliteStore::new(&tx);
            f(&mut store)
        };
        match result {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            // Dropping the transaction rolls it back.
            Err(e) => Err(e),
        }
    }

    fn read_store(&self) -> SqliteStore<'_> {
        SqliteStore::new(self.conn.as_conn())
    }

    /// Create a course and set its prerequisites in one shot.
    pub fn add_course(&mut self, new: &NewCourse, prereqs: &BTreeSet<i64>) -> Result<Course> {
        new.validate()?;
        self.with_tx(|store| {
            let id = store.insert_course(new)?;
            graph::set_prerequisites(store, id, prereqs)?;
            store
                .course(id)?
                .ok_or(Error::CourseNotFound(id))
        })
    }

    /// Apply a partial update; `Some(prereqs)` replaces the prerequisite set,
    /// `None` leaves the graph untouched.
    pub fn update_course(
        &mut self,
        id: i64,
        changeset: &CourseChangeset,
        prereqs: Option<&BTreeSet<i64>>,
    ) -> Result<()> {
        changeset.validate()?;
        self.with_tx(|store| {
            if !store.course_exists(id)? {
                return Err(Error::CourseNotFound(id));
            }
            if !changeset.is_empty() {
                store.update_course(id, changeset)?;
            }
            if let Some(prereqs) = prereqs {
                graph::set_prerequisites(store, id, prereqs)?;
            }
            Ok(())
        })
    }

    /// Replace a course's prerequisite set.
    pub fn set_prerequisites(&mut self, id: i64, prereqs: &BTreeSet<i64>) -> Result<()> {
        self.with_tx(|store| graph::set_prerequisites(store, id, prereqs))
    }

    /// Delete a course, reconciling dependents per the deletion resolver.
    pub fn remove_course(
        &mut self,
        id: i64,
        force: bool,
        replace_with: Option<i64>,
    ) -> Result<DeletionOutcome> {
        self.with_tx(|store| graph::delete_course(store, id, force, replace_with))
    }

    /// Enroll a student through the eligibility gate.
    pub fn enroll(&mut self, student: i64, course: i64) -> Result<EnrollmentRecord> {
        self.with_tx(|store| enroll::try_enroll(store, student, course))
    }

    /// Record an evaluation for an enrolled student.
    ///
    /// This is the only path that writes `Completed`.
    pub fn evaluate(
        &mut self,
        student: i64,
        course: i64,
        score: f64,
        status: EnrollmentStatus,
    ) -> Result<()> {
        if !(0.0..=100.0).contains(&score) {
            return Err(Error::InvalidScore(score));
        }
        self.with_tx(|store| store.update_enrollment(student, course, Some(score), status))
    }

    /// Register a student. Account management proper lives elsewhere; this
    /// covers the existence the engine needs.
    pub fn add_student(&mut self, name: &str) -> Result<i64> {
        self.with_tx(|store| store.insert_student(name))
    }

    /// Fetch a course by id.
    pub fn course(&self, id: i64) -> Result<Course> {
        self.read_store()
            .course(id)?
            .ok_or(Error::CourseNotFound(id))
    }

    /// All courses, ordered by id.
    pub fn courses(&self) -> Result<Vec<Course>> {
        self.read_store().courses()
    }

    /// Direct prerequisites of a course.
    pub fn prerequisites_of(&self, id: i64) -> Result<Vec<i64>> {
        self.read_store().prerequisites(id)
    }

    /// Courses that directly require the given one.
    pub fn dependents_of(&self, id: i64) -> Result<Vec<i64>> {
        self.read_store().dependents(id)
    }

    /// All of a student's enrollment records.
    pub fn transcript(&self, student: i64) -> Result<Vec<EnrollmentRecord>> {
        let store = self.read_store();
        if !store.student_exists(student)? {
            return Err(Error::StudentNotFound(student));
        }
        store.student_enrollments(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CourseType, DifficultyLevel};

    fn new_course(name: &str) -> NewCourse {
        NewCourse {
            name: name.to_string(),
            price: 60.0,
            duration: 8,
            course_type: CourseType::Certificate,
            difficulty: DifficultyLevel::Beginner,
            notes_url: None,
            video_url: None,
        }
    }

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_add_course_with_prerequisites() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let intro = catalog.add_course(&new_course("Intro"), &set(&[])).unwrap();
        let advanced = catalog
            .add_course(&new_course("Advanced"), &set(&[intro.id]))
            .unwrap();

        assert_eq!(catalog.prerequisites_of(advanced.id).unwrap(), vec![intro.id]);
        assert_eq!(catalog.dependents_of(intro.id).unwrap(), vec![advanced.id]);
    }

    #[test]
    fn test_add_course_rolls_back_on_bad_prereq() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let result = catalog.add_course(&new_course("Orphan"), &set(&[999]));
        assert!(matches!(result, Err(Error::PrerequisiteNotFound(999))));
        // The course row from the failed call must not exist.
        assert!(catalog.courses().unwrap().is_empty());
    }

    #[test]
    fn test_add_course_validates_attributes() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let mut bad = new_course("Bad");
        bad.duration = 0;
        assert!(matches!(
            catalog.add_course(&bad, &set(&[])),
            Err(Error::InvalidDuration(0))
        ));
    }

    #[test]
    fn test_update_course_changeset_and_prereqs() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let a = catalog.add_course(&new_course("A"), &set(&[])).unwrap();
        let b = catalog.add_course(&new_course("B"), &set(&[])).unwrap();

        let changeset = CourseChangeset {
            price: Some(45.0),
            ..Default::default()
        };
        catalog
            .update_course(b.id, &changeset, Some(&set(&[a.id])))
            .unwrap();

        assert_eq!(catalog.course(b.id).unwrap().price, 45.0);
        assert_eq!(catalog.prerequisites_of(b.id).unwrap(), vec![a.id]);

        // None leaves the graph alone.
        catalog
            .update_course(b.id, &CourseChangeset::default(), None)
            .unwrap();
        assert_eq!(catalog.prerequisites_of(b.id).unwrap(), vec![a.id]);
    }

    #[test]
    fn test_update_rolls_back_changeset_on_cycle() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let a = catalog.add_course(&new_course("A"), &set(&[])).unwrap();
        let b = catalog
            .add_course(&new_course("B"), &set(&[a.id]))
            .unwrap();

        let changeset = CourseChangeset {
            name: Some("A renamed".to_string()),
            ..Default::default()
        };
        // Making b a prerequisite of a closes a cycle; the rename must not
        // survive the rollback either.
        let result = catalog.update_course(a.id, &changeset, Some(&set(&[b.id])));
        assert!(matches!(result, Err(Error::CircularDependency { .. })));
        assert_eq!(catalog.course(a.id).unwrap().name, "A");
    }

    #[test]
    fn test_remove_course_flow() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let a = catalog.add_course(&new_course("A"), &set(&[])).unwrap();
        let b = catalog
            .add_course(&new_course("B"), &set(&[a.id]))
            .unwrap();

        assert!(matches!(
            catalog.remove_course(a.id, false, None),
            Err(Error::BlockedByDependents { .. })
        ));

        let outcome = catalog.remove_course(a.id, true, None).unwrap();
        assert_eq!(
            outcome,
            DeletionOutcome::Cascaded {
                dependents: vec![b.id]
            }
        );
        assert!(catalog.prerequisites_of(b.id).unwrap().is_empty());
    }

    #[test]
    fn test_enroll_and_evaluate() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let intro = catalog.add_course(&new_course("Intro"), &set(&[])).unwrap();
        let advanced = catalog
            .add_course(&new_course("Advanced"), &set(&[intro.id]))
            .unwrap();
        let student = catalog.add_student("Ada").unwrap();

        assert!(matches!(
            catalog.enroll(student, advanced.id),
            Err(Error::PrerequisiteNotMet { .. })
        ));

        catalog.enroll(student, intro.id).unwrap();
        catalog
            .evaluate(student, intro.id, 92.0, EnrollmentStatus::Completed)
            .unwrap();

        let record = catalog.enroll(student, advanced.id).unwrap();
        assert_eq!(record.status, EnrollmentStatus::Pending);

        let transcript = catalog.transcript(student).unwrap();
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_evaluate_validates_score() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let course = catalog.add_course(&new_course("A"), &set(&[])).unwrap();
        let student = catalog.add_student("Ada").unwrap();
        catalog.enroll(student, course.id).unwrap();

        assert!(matches!(
            catalog.evaluate(student, course.id, 101.0, EnrollmentStatus::Completed),
            Err(Error::InvalidScore(_))
        ));
        assert!(matches!(
            catalog.evaluate(student, 999, 50.0, EnrollmentStatus::Completed),
            Err(Error::NotEnrolled { .. })
        ));
    }

    #[test]
    fn test_transcript_requires_student() {
        let catalog = Catalog::open_in_memory().unwrap();
        assert!(matches!(
            catalog.transcript(1),
            Err(Error::StudentNotFound(1))
        ));
    }
}
