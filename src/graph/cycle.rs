//! Cycle detection in the prerequisite graph.

use std::collections::{HashSet, VecDeque};

use crate::error::Result;
use crate::store::CatalogStore;

/// Decide whether adding the edge `course -> candidate` would close a cycle.
///
/// Breadth-first traversal starting from `candidate`, following *its*
/// prerequisite edges (the same direction as the proposed edge, away from the
/// candidate and toward the courses it requires). If `course` is reached, the
/// candidate already depends on `course` directly or transitively, so the new
/// edge would close a cycle.
///
/// The visited set keeps diamonds (shared prerequisites) from being walked
/// twice and guarantees termination even on an erroneously cyclic graph.
pub fn would_create_cycle<S: CatalogStore + ?Sized>(
    store: &S,
    course: i64,
    candidate: i64,
) -> Result<bool> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([candidate]);

    while let Some(current) = queue.pop_front() {
        if current == course {
            return Ok(true);
        }
        if !visited.insert(current) {
            continue;
        }
        for prereq in store.prerequisites(current)? {
            queue.push_back(prereq);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CourseType, DifficultyLevel, NewCourse};
    use crate::store::MemoryStore;

    fn setup(n: usize) -> (MemoryStore, Vec<i64>) {
        let mut store = MemoryStore::new();
        let ids = (0..n)
            .map(|i| {
                store
                    .insert_course(&NewCourse {
                        name: format!("Course {i}"),
                        price: 0.0,
                        duration: 4,
                        course_type: CourseType::Certificate,
                        difficulty: DifficultyLevel::Beginner,
                        notes_url: None,
                        video_url: None,
                    })
                    .unwrap()
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn test_no_cycle_on_unrelated_edge() {
        // b requires a, c requires b. Adding "d requires a" is fine: a does
        // not reach d.
        let (mut store, ids) = setup(4);
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
        store.add_edge(b, a).unwrap();
        store.add_edge(c, b).unwrap();

        assert!(!would_create_cycle(&store, d, a).unwrap());
    }

    #[test]
    fn test_direct_cycle() {
        // a requires b; making a a prerequisite of b closes a -> b -> a.
        let (mut store, ids) = setup(2);
        let (a, b) = (ids[0], ids[1]);
        store.add_edge(a, b).unwrap();

        assert!(would_create_cycle(&store, b, a).unwrap());
    }

    #[test]
    fn test_transitive_cycle() {
        // Chain: e requires d requires c requires b requires a.
        // "a requires e" would close the loop.
        let (mut store, ids) = setup(5);
        for pair in ids.windows(2) {
            store.add_edge(pair[1], pair[0]).unwrap();
        }

        assert!(would_create_cycle(&store, ids[0], ids[4]).unwrap());
        assert!(!would_create_cycle(&store, ids[4], ids[0]).unwrap());
    }

    #[test]
    fn test_diamond_terminates() {
        // c and d both require a and b; the shared prerequisites must only be
        // visited once and must not produce a false positive.
        let (mut store, ids) = setup(5);
        let (a, b, c, d, e) = (ids[0], ids[1], ids[2], ids[3], ids[4]);
        store.add_edge(c, a).unwrap();
        store.add_edge(c, b).unwrap();
        store.add_edge(d, a).unwrap();
        store.add_edge(d, b).unwrap();

        assert!(!would_create_cycle(&store, e, c).unwrap());
        assert!(would_create_cycle(&store, a, d).unwrap());
    }

    #[test]
    fn test_candidate_is_course() {
        // The traversal starts at the candidate, so course == candidate is
        // flagged immediately.
        let (store, ids) = setup(1);
        assert!(would_create_cycle(&store, ids[0], ids[0]).unwrap());
    }
}
