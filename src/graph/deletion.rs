//! Deletion resolver: removing a course other courses depend on.

use tracing::debug;

use crate::error::{format_course_names, Error, Result};
use crate::store::CatalogStore;

/// How the dependents of a deleted course were reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// No dependents existed.
    Deleted,
    /// Dependents lost their edge to the deleted course outright.
    Cascaded { dependents: Vec<i64> },
    /// Dependent edges were retargeted to a replacement prerequisite.
    Redirected {
        replacement: i64,
        dependents: Vec<i64>,
    },
}

/// Delete `course`, reconciling any dependent prerequisite edges first.
///
/// With dependents present and `force` false the deletion is blocked,
/// reporting the dependent course names. With `force`:
///
/// - `replace_with: Some(r)` retargets each dependent's edge to `r`, except
///   where the dependent already requires `r` — that edge is simply dropped
///   to avoid a duplicate. No cycle re-check runs on the redirected edge;
///   the replacement is assumed to be a safe substitute (known gap, see
///   DESIGN.md).
/// - `replace_with: None` drops every edge targeting the course; dependents
///   lose that prerequisite with no replacement imposed.
///
/// Finally the course's own outgoing edges and the course row are removed.
/// Validation completes before any mutation; a blocked or invalid call
/// leaves the edge set untouched.
pub fn delete_course<S: CatalogStore + ?Sized>(
    store: &mut S,
    course: i64,
    force: bool,
    replace_with: Option<i64>,
) -> Result<DeletionOutcome> {
    if !store.course_exists(course)? {
        return Err(Error::CourseNotFound(course));
    }

    let dependents = store.dependents(course)?;

    if !dependents.is_empty() && !force {
        let mut names = Vec::with_capacity(dependents.len());
        for &dep in &dependents {
            names.push(
                store
                    .course_name(dep)?
                    .unwrap_or_else(|| format!("#{dep}")),
            );
        }
        return Err(Error::BlockedByDependents {
            course,
            dependents: format_course_names(&names),
        });
    }

    let outcome = if dependents.is_empty() {
        DeletionOutcome::Deleted
    } else if let Some(replacement) = replace_with {
        if !store.course_exists(replacement)? {
            return Err(Error::CourseNotFound(replacement));
        }
        for &dep in &dependents {
            if store.has_edge(dep, replacement)? {
                // Already requires the replacement; dropping the stale edge
                // avoids a duplicate pair.
                store.remove_edge(dep, course)?;
            } else {
                store.redirect_edge(dep, course, replacement)?;
            }
        }
        DeletionOutcome::Redirected {
            replacement,
            dependents: dependents.clone(),
        }
    } else {
        for &dep in &dependents {
            store.remove_edge(dep, course)?;
        }
        DeletionOutcome::Cascaded {
            dependents: dependents.clone(),
        }
    };

    store.remove_edges_from(course)?;
    store.delete_course(course)?;

    debug!(course, ?outcome, "deleted course");
    Ok(outcome)
}
