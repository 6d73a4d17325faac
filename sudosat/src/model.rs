//! Satisfying assignment snapshot.
use sudosat_formula::{Lit, Var};

use crate::assignment::Assignment;

/// The assignment recorded when the search found every clause satisfied.
///
/// Variables the search never had to assign stay `None` here. The solution file format wants a
/// total assignment, so [`dimacs_lits`](Model::dimacs_lits) defaults those variables to `true`;
/// that default is an output convention, not a semantic claim, and consumers decoding a model
/// should ignore variables outside their encoding's range.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Model {
    values: Vec<Option<bool>>,
}

impl Model {
    pub(crate) fn from_assignment(assignment: &Assignment) -> Model {
        Model {
            values: assignment.values().to_vec(),
        }
    }

    /// Value of a variable, `None` when the search left it unassigned.
    pub fn value(&self, var: Var) -> Option<bool> {
        self.values[var.index()]
    }

    /// Whether a literal is assigned true in the model.
    pub fn lit_is_true(&self, lit: Lit) -> bool {
        self.values[lit.index()] == Some(lit.is_positive())
    }

    /// Dense view of the values, indexed by variable.
    pub fn values(&self) -> &[Option<bool>] {
        &self.values
    }

    /// Total assignment as one literal per variable, unassigned variables defaulting to true.
    pub fn dimacs_lits(&self) -> impl Iterator<Item = Lit> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| Lit::from_index(index, value.unwrap_or(true)))
    }
}
