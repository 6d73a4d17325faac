//! Partial assignment and trail.
use sudosat_formula::{Lit, Var};

/// Why a variable was assigned.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AssignmentCause {
    /// Chosen by the branching heuristic.
    Decision,
    /// Forced by unit propagation.
    Propagation,
}

/// One step on the trail.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TrailStep {
    pub lit: Lit,
    pub cause: AssignmentCause,
}

/// A partial mapping from variables to boolean values.
///
/// Values live in a dense array indexed by variable, so lookup and undo are both O(1). Every
/// assignment is also recorded on an append-only trail; truncating the trail to an earlier
/// [`mark`] restores the dense array to the exact state it had at that mark.
///
/// [`mark`]: Assignment::mark
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    values: Vec<Option<bool>>,
    trail: Vec<TrailStep>,
}

impl Assignment {
    /// Create an all-unassigned assignment over `var_count` variables.
    pub fn new(var_count: usize) -> Assignment {
        Assignment {
            values: vec![None; var_count],
            trail: vec![],
        }
    }

    /// Number of variables this assignment ranges over.
    pub fn var_count(&self) -> usize {
        self.values.len()
    }

    /// Current value of a variable.
    pub fn var_value(&self, var: Var) -> Option<bool> {
        self.values[var.index()]
    }

    /// Whether a variable has a value.
    pub fn is_assigned(&self, var: Var) -> bool {
        self.values[var.index()].is_some()
    }

    /// Value of a literal under the current assignment.
    ///
    /// `Some(true)` when the literal is satisfied, `Some(false)` when falsified, `None` when its
    /// variable is unassigned.
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.values[lit.index()].map(|value| value == lit.is_positive())
    }

    /// Whether a literal is satisfied under the current assignment.
    pub fn lit_is_true(&self, lit: Lit) -> bool {
        self.lit_value(lit) == Some(true)
    }

    /// Make a literal true and push it onto the trail.
    ///
    /// The literal's variable must be unassigned.
    pub fn assign(&mut self, lit: Lit, cause: AssignmentCause) {
        debug_assert!(!self.is_assigned(lit.var()));
        self.values[lit.index()] = Some(lit.is_positive());
        self.trail.push(TrailStep { lit, cause });
    }

    /// The trail in assignment order.
    pub fn trail(&self) -> &[TrailStep] {
        &self.trail
    }

    /// Current trail length, for a later [`backtrack_to`](Assignment::backtrack_to).
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Undo every assignment made after the given mark.
    pub fn backtrack_to(&mut self, mark: usize) {
        for step in self.trail.drain(mark..) {
            self.values[step.lit.index()] = None;
        }
    }

    /// Dense view of the values, indexed by variable.
    pub fn values(&self) -> &[Option<bool>] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sudosat_formula::lit;

    #[test]
    fn assign_and_query() {
        let mut assignment = Assignment::new(3);
        assignment.assign(lit!(1), AssignmentCause::Decision);
        assignment.assign(lit!(-3), AssignmentCause::Propagation);

        assert_eq!(assignment.var_value(lit!(1).var()), Some(true));
        assert_eq!(assignment.var_value(lit!(3).var()), Some(false));
        assert_eq!(assignment.var_value(lit!(2).var()), None);

        assert!(assignment.lit_is_true(lit!(1)));
        assert!(assignment.lit_is_true(lit!(-3)));
        assert_eq!(assignment.lit_value(lit!(3)), Some(false));
        assert_eq!(assignment.lit_value(lit!(2)), None);
    }

    #[test]
    fn backtrack_restores_exact_state() {
        let mut assignment = Assignment::new(4);
        assignment.assign(lit!(1), AssignmentCause::Decision);

        let saved = assignment.clone();
        let mark = assignment.mark();

        assignment.assign(lit!(2), AssignmentCause::Decision);
        assignment.assign(lit!(-4), AssignmentCause::Propagation);
        assert_eq!(assignment.trail().len(), 3);

        assignment.backtrack_to(mark);
        assert_eq!(assignment, saved);
        assert!(!assignment.is_assigned(lit!(2).var()));
        assert!(!assignment.is_assigned(lit!(4).var()));
    }

    #[test]
    fn trail_records_causes() {
        let mut assignment = Assignment::new(2);
        assignment.assign(lit!(1), AssignmentCause::Decision);
        assignment.assign(lit!(2), AssignmentCause::Propagation);

        let causes: Vec<_> = assignment.trail().iter().map(|step| step.cause).collect();
        assert_eq!(
            causes,
            vec![AssignmentCause::Decision, AssignmentCause::Propagation]
        );
    }
}
