//! Assemble forests from flat collections of parent-aware objects.
//!
//! Each domain object answers a single question about another: "am I its
//! immediate parent?". Given an ordered sequence of such objects, the
//! [`TreeBuilder`] reconstructs the implied forest in a single pass and
//! returns an arena-backed [`Forest`] with parent and child links fully
//! populated. Objects whose declared parent is missing from the input are
//! promoted to roots; when several candidates claim the same child, the
//! earliest one in input order wins.
//!
//! The builder performs no I/O and owns none of the caller's data beyond
//! the assembled forest it returns.

pub mod arena;
pub mod builder;
pub mod errors;
pub mod render;

pub use arena::{Forest, TreeNode};
pub use builder::{build_forest, ParentOf, TreeBuilder};
pub use errors::{AssemblyError, AssemblyResult};
pub use render::TreeRender;
