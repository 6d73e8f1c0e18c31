use generational_arena::Index;
use thiserror::Error;

/// Errors surfaced during forest assembly.
///
/// Orphan promotion and ambiguous parentage are policy outcomes, not errors;
/// the only failure the builder can raise is a detected parentage cycle,
/// and only when cycle checking is enabled.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("cyclic parentage: node {0:?} never reaches a root")]
    CyclicParentage(Index),
}

pub type AssemblyResult<T> = Result<T, AssemblyError>;
