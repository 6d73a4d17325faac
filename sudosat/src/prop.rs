//! Unit propagation.
use crate::assignment::{Assignment, AssignmentCause};
use crate::store::ClauseStore;

/// Propagation found an empty clause or a contradicting unit.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Conflict;

/// Propagate unit clauses to fixpoint.
///
/// Simplifies the store under the current assignment, then repeatedly takes the first unit
/// clause in store order, makes its literal true with cause [`Propagation`] and re-simplifies.
/// Returns the simplified store once no unit clause remains.
///
/// On `Err(Conflict)` the assignment may hold propagated bindings made before the conflict was
/// found; the caller owns the rollback via the trail mark it took on entry. On `Ok` the
/// assignment extends the one passed in and every added binding is forced.
///
/// [`Propagation`]: AssignmentCause::Propagation
pub fn propagate(
    store: &ClauseStore,
    assignment: &mut Assignment,
) -> Result<ClauseStore, Conflict> {
    let mut current = store.simplify(assignment).ok_or(Conflict)?;

    while let Some(unit) = current.first_unit() {
        assignment.assign(unit, AssignmentCause::Propagation);
        current = current.simplify(assignment).ok_or(Conflict)?;
    }

    Ok(current)
}
