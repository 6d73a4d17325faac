//! Recursive DPLL search driver.
use std::cmp::max;

use crate::assignment::{Assignment, AssignmentCause};
use crate::decision::Brancher;
use crate::model::Model;
use crate::prop::propagate;
use crate::store::ClauseStore;

/// Externally observable search counters.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct SearchStats {
    /// Number of decisions whose both phases failed.
    pub backtracks: u64,
    /// Deepest recursion depth reached.
    pub max_depth: usize,
    /// Number of driver invocations.
    pub recursive_calls: u64,
}

/// Search aborted before reaching a verdict.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("recursion depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}

/// One DPLL search over a clause store.
///
/// Each recursion frame propagates to fixpoint, checks for a terminal state and otherwise
/// branches on the heuristic's decision, trying the opposite phase when the first fails. The
/// clause store is versioned functionally (a frame only ever reads the store it was handed and
/// passes its own simplified copy down), while the assignment is shared and rolled back via
/// trail marks. On `Unsat` return the assignment is exactly what the caller passed in; on `Sat`
/// the model slot holds the satisfying assignment.
pub struct Search {
    assignment: Assignment,
    brancher: Box<dyn Brancher>,
    depth_limit: Option<usize>,
    stats: SearchStats,
    model: Option<Model>,
}

impl Search {
    /// Create a search over `var_count` variables using the given heuristic.
    pub fn new(var_count: usize, brancher: Box<dyn Brancher>, depth_limit: Option<usize>) -> Search {
        Search {
            assignment: Assignment::new(var_count),
            brancher,
            depth_limit,
            stats: SearchStats::default(),
            model: None,
        }
    }

    /// Run the search to completion.
    pub fn run(&mut self, store: &ClauseStore) -> Result<bool, SolverError> {
        self.search(store, 0)
    }

    /// Search counters collected so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// The model found by [`run`](Search::run), if any.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Consume the search, returning the model if one was found.
    pub fn into_model(self) -> Option<Model> {
        self.model
    }

    fn search(&mut self, store: &ClauseStore, depth: usize) -> Result<bool, SolverError> {
        self.stats.recursive_calls += 1;
        self.stats.max_depth = max(self.stats.max_depth, depth);
        if let Some(limit) = self.depth_limit {
            if depth > limit {
                return Err(SolverError::DepthLimitExceeded { limit });
            }
        }

        let entry = self.assignment.mark();

        let store = match propagate(store, &mut self.assignment) {
            Ok(store) => store,
            Err(_conflict) => {
                self.assignment.backtrack_to(entry);
                return Ok(false);
            }
        };

        if store.is_empty() {
            self.model = Some(Model::from_assignment(&self.assignment));
            return Ok(true);
        }

        let decision = match self.brancher.choose(&store, &self.assignment) {
            Some(decision) => decision,
            None => {
                // No unassigned variable left in the store: every clause is satisfied.
                self.model = Some(Model::from_assignment(&self.assignment));
                return Ok(true);
            }
        };

        let decided = self.assignment.mark();
        for &phase in &[decision.phase, !decision.phase] {
            self.assignment
                .assign(decision.var.lit(phase), AssignmentCause::Decision);
            if self.search(&store, depth + 1)? {
                return Ok(true);
            }
            self.assignment.backtrack_to(decided);
        }

        self.assignment.backtrack_to(entry);
        self.stats.backtracks += 1;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sudosat_formula::{cnf_formula, lit, CnfFormula};

    use crate::decision::Strategy;

    fn run_search(formula: &CnfFormula, strategy: Strategy) -> (Result<bool, SolverError>, Search) {
        let store = ClauseStore::from_formula(formula);
        let mut search = Search::new(formula.var_count(), strategy.brancher(), None);
        let result = search.run(&store);
        (result, search)
    }

    #[test]
    fn unit_cascade_needs_no_decisions() {
        let formula = cnf_formula![
            1;
            -1, 2;
            -2, 3;
            -3;
        ];
        let (result, search) = run_search(&formula, Strategy::FirstUnassigned);
        assert_eq!(result.unwrap(), false);
        let stats = search.stats();
        assert_eq!(stats.backtracks, 0);
        assert_eq!(stats.max_depth, 0);
        assert_eq!(stats.recursive_calls, 1);
    }

    #[test]
    fn forced_then_one_decision() {
        let formula = cnf_formula![
            1;
            2, 3;
            -2, 3;
        ];
        let (result, search) = run_search(&formula, Strategy::FirstUnassigned);
        assert!(result.unwrap());

        let model = search.model().unwrap();
        assert!(model.lit_is_true(lit!(1)));
        assert!(model.lit_is_true(lit!(3)));

        let stats = search.stats();
        assert_eq!(stats.backtracks, 0);
        assert!(stats.max_depth <= 1);
    }

    #[test]
    fn full_binary_unsat_backtracks() {
        let formula = cnf_formula![
            1, 2;
            1, -2;
            -1, 2;
            -1, -2;
        ];
        for &strategy in &[
            Strategy::FirstUnassigned,
            Strategy::Mom,
            Strategy::JeroslowWang,
        ] {
            let (result, search) = run_search(&formula, strategy);
            assert_eq!(result.unwrap(), false);
            assert!(search.stats().backtracks >= 1);
            assert!(search.model().is_none());
        }
    }

    #[test]
    fn assignment_is_restored_after_unsat() {
        let formula = cnf_formula![
            1, 2;
            1, -2;
            -1, 2;
            -1, -2;
        ];
        let store = ClauseStore::from_formula(&formula);
        let mut search = Search::new(
            formula.var_count(),
            Strategy::FirstUnassigned.brancher(),
            None,
        );
        let before = search.assignment.clone();
        assert_eq!(search.run(&store).unwrap(), false);
        assert_eq!(search.assignment, before);
    }

    #[test]
    fn depth_limit_is_an_error_not_unsat() {
        // Satisfiable, but only by deciding; depth limit 0 forbids any decision frame.
        let formula = cnf_formula![
            1, 2;
            -1, -2;
        ];
        let store = ClauseStore::from_formula(&formula);
        let mut search = Search::new(
            formula.var_count(),
            Strategy::FirstUnassigned.brancher(),
            Some(0),
        );
        match search.run(&store) {
            Err(SolverError::DepthLimitExceeded { limit: 0 }) => (),
            other => panic!("expected depth limit error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn stats_are_deterministic() {
        let formula = cnf_formula![
            1, 2, 3;
            -1, -2;
            -2, -3;
            -1, -3;
            2, 3;
        ];
        let (first_result, first) = run_search(&formula, Strategy::JeroslowWang);
        let (second_result, second) = run_search(&formula, Strategy::JeroslowWang);
        assert_eq!(first_result.unwrap(), second_result.unwrap());
        assert_eq!(first.stats(), second.stats());
        assert_eq!(
            first.model().map(|m| m.values().to_vec()),
            second.model().map(|m| m.values().to_vec())
        );
    }
}
