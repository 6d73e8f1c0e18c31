use std::collections::HashSet;

use generational_arena::Index;
use tracing::instrument;

use crate::arena::Forest;
use crate::errors::{AssemblyError, AssemblyResult};

/// Capability a domain object must provide to participate in forest assembly.
///
/// The predicate must be total, deterministic and side-effect free. It is
/// expected to be irreflexive (an object is not its own parent), but the
/// builder does not enforce this.
pub trait ParentOf {
    /// True exactly when `self` is the immediate (one-level) parent of
    /// `candidate_child` in the caller's domain model.
    fn is_parent_of(&self, candidate_child: &Self) -> bool;
}

/// Assembles forests from flat sequences of parent-aware objects.
///
/// Each input object becomes exactly one node. Parent assignment is a
/// pairwise scan with a first-match policy: when several candidates claim
/// the same child, the candidate earliest in input order wins and later
/// matches are ignored. Objects with no matching parent become roots,
/// including objects whose declared parent is absent from the input.
pub struct TreeBuilder {
    check_cycles: bool,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            check_cycles: false,
        }
    }

    /// Fail with [`AssemblyError::CyclicParentage`] when the parentage
    /// relation traps nodes in a cycle, instead of silently leaving them
    /// out of the root list.
    pub fn check_cycles(mut self, enabled: bool) -> Self {
        self.check_cycles = enabled;
        self
    }

    /// Wrap every object in a node, link parents and children, and return
    /// the populated forest.
    #[instrument(level = "debug", skip(self, objects))]
    pub fn build<T: ParentOf>(&self, objects: Vec<T>) -> AssemblyResult<Forest<T>> {
        self.build_with(objects, |object| object)
    }

    /// Like [`TreeBuilder::build`], with a factory producing the stored
    /// payload for each object. Parentage is computed on the domain objects
    /// before they pass through the factory.
    #[instrument(level = "debug", skip_all)]
    pub fn build_with<P, T, F>(&self, objects: Vec<P>, make_payload: F) -> AssemblyResult<Forest<T>>
    where
        P: ParentOf,
        F: FnMut(P) -> T,
    {
        let forest = assemble(objects, make_payload);
        if self.check_cycles {
            verify_acyclic(&forest)?;
        }
        Ok(forest)
    }
}

/// Assemble a forest with the default policy. Never fails; nodes trapped in
/// a parentage cycle are simply absent from the root list.
#[instrument(level = "debug", skip(objects))]
pub fn build_forest<T: ParentOf>(objects: Vec<T>) -> Forest<T> {
    assemble(objects, |object| object)
}

fn assemble<P, T, F>(objects: Vec<P>, mut make_payload: F) -> Forest<T>
where
    P: ParentOf,
    F: FnMut(P) -> T,
{
    // O(n^2) pairwise scan; the predicate is opaque, so no indexing by a
    // candidate key is possible. First matching candidate in input order
    // wins. No identity short-circuit: an object claiming itself becomes
    // its own parent.
    let parent_positions: Vec<Option<usize>> = objects
        .iter()
        .map(|object| {
            objects
                .iter()
                .position(|candidate| candidate.is_parent_of(object))
        })
        .collect();

    let mut forest = Forest::new();
    let indices: Vec<Index> = objects
        .into_iter()
        .map(|object| forest.insert(make_payload(object)))
        .collect();

    // Link both sides; children end up in input order per parent.
    for (child_pos, parent_pos) in parent_positions.iter().enumerate() {
        if let Some(parent_pos) = parent_pos {
            forest.set_parent(indices[child_pos], Some(indices[*parent_pos]));
            forest.add_child(indices[*parent_pos], indices[child_pos]);
        }
    }

    forest
}

/// Walk parent links from every node with a visited set. A node that
/// revisits itself before reaching a parentless node is trapped in a cycle.
fn verify_acyclic<T>(forest: &Forest<T>) -> AssemblyResult<()> {
    let mut reaches_root: HashSet<Index> = HashSet::new();

    for &start in forest.indices() {
        let mut path: Vec<Index> = Vec::new();
        let mut current = start;
        loop {
            if reaches_root.contains(&current) {
                break;
            }
            if path.contains(&current) {
                return Err(AssemblyError::CyclicParentage(current));
            }
            path.push(current);
            match forest.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        reaches_root.extend(path);
    }

    Ok(())
}
