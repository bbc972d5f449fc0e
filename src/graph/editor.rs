//! Dependency editor: full-replace updates of a course's prerequisite set.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::cycle::would_create_cycle;
use crate::store::CatalogStore;

/// Replace the prerequisite set of `course` with `prereqs`.
///
/// Full replace, not a merge: every existing outgoing edge of the course is
/// dropped and the new set inserted. All validation (existence,
/// self-reference, per-candidate cycle check against the live graph) runs
/// before the first mutation, so a rejection leaves the edge set untouched.
///
/// An empty set is permitted; whether a course must keep at least one
/// prerequisite is the caller's policy.
pub fn set_prerequisites<S: CatalogStore + ?Sized>(
    store: &mut S,
    course: i64,
    prereqs: &BTreeSet<i64>,
) -> Result<()> {
    if !store.course_exists(course)? {
        return Err(Error::CourseNotFound(course));
    }

    for &prereq in prereqs {
        if prereq == course {
            return Err(Error::SelfReference(course));
        }
        if !store.course_exists(prereq)? {
            return Err(Error::PrerequisiteNotFound(prereq));
        }
    }

    // Each candidate is checked against the stored graph with only that edge
    // hypothetical. The course's own outgoing edges never affect the walk
    // (reaching the course terminates it), so the pending replacement cannot
    // mask or fabricate a cycle.
    for &prereq in prereqs {
        if would_create_cycle(store, course, prereq)? {
            return Err(Error::CircularDependency {
                course,
                prerequisite: prereq,
            });
        }
    }

    store.remove_edges_from(course)?;
    for &prereq in prereqs {
        store.add_edge(course, prereq)?;
    }

    debug!(course, count = prereqs.len(), "replaced prerequisite set");
    Ok(())
}
