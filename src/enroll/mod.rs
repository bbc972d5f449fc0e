//! Enrollment gate: eligibility check and record creation.

use tracing::debug;

use crate::core::EnrollmentRecord;
use crate::error::{Error, Result};
use crate::store::CatalogStore;

/// Enroll `student` in `course` if every direct prerequisite is completed.
///
/// The check is one level deep by design: only the course's directly declared
/// prerequisites are examined. Deeper chains hold because each prerequisite
/// could itself only be enrolled in through its own gate pass. A course with
/// no prerequisites is vacuously eligible.
///
/// On success a fresh `Pending` record with no score is inserted and
/// returned. Status only ever advances to `Completed` through the external
/// evaluation path, never here.
pub fn try_enroll<S: CatalogStore + ?Sized>(
    store: &mut S,
    student: i64,
    course: i64,
) -> Result<EnrollmentRecord> {
    if !store.student_exists(student)? {
        return Err(Error::StudentNotFound(student));
    }
    if !store.course_exists(course)? {
        return Err(Error::CourseNotFound(course));
    }
    if store.enrollment(student, course)?.is_some() {
        return Err(Error::AlreadyEnrolled { student, course });
    }

    for prereq in store.prerequisites(course)? {
        let completed = store
            .enrollment(student, prereq)?
            .is_some_and(|r| r.is_completed());
        if !completed {
            let name = store
                .course_name(prereq)?
                .unwrap_or_else(|| format!("#{prereq}"));
            return Err(Error::PrerequisiteNotMet {
                prerequisite: prereq,
                name,
            });
        }
    }

    let record = store.insert_enrollment(student, course)?;
    debug!(student, course, "enrolled");
    Ok(record)
}
