//! Boolean satisfiability solver.
use std::io;

use anyhow::Error;
use log::{debug, info};

use sudosat_dimacs::parse_dimacs;
use sudosat_formula::CnfFormula;

use crate::config::SolverConfig;
use crate::model::Model;
use crate::search::{Search, SearchStats, SolverError};
use crate::store::ClauseStore;

/// A boolean satisfiability solver.
///
/// Collects a formula, runs one DPLL search over it and keeps the verdict, the model (on SAT)
/// and the search counters. A solver instance is single use: solving a different formula means
/// constructing a new solver.
#[derive(Default)]
pub struct Solver {
    config: SolverConfig,
    formula: CnfFormula,
    model: Option<Model>,
    stats: SearchStats,
}

impl Solver {
    /// Create a solver with default configuration.
    pub fn new() -> Solver {
        Solver::default()
    }

    /// Create a solver with the given configuration.
    pub fn with_config(config: SolverConfig) -> Solver {
        Solver {
            config,
            ..Solver::default()
        }
    }

    /// Add a formula to the solver.
    pub fn add_formula(&mut self, formula: &CnfFormula) {
        for clause in formula.iter() {
            self.formula.add_clause(clause);
        }
        self.formula.set_var_count(formula.var_count());
    }

    /// Read and add a formula in DIMACS CNF format.
    pub fn add_dimacs_cnf(&mut self, input: impl io::Read) -> Result<(), Error> {
        let formula = parse_dimacs(input)?;

        info!(
            "Parsed formula with {} variables and {} clauses",
            formula.var_count(),
            formula.len()
        );

        self.add_formula(&formula);
        Ok(())
    }

    /// Check the satisfiability of the current formula.
    pub fn solve(&mut self) -> Result<bool, SolverError> {
        let store = ClauseStore::from_formula(&self.formula);
        debug!(
            "Solving with strategy {}: {} clauses over {} variables",
            self.config.strategy,
            store.len(),
            self.formula.var_count()
        );

        let mut search = Search::new(
            self.formula.var_count(),
            self.config.strategy.brancher(),
            self.config.depth_limit,
        );
        let satisfiable = search.run(&store)?;

        self.stats = search.stats();
        info!(
            "Search finished: {} backtracks, max depth {}, {} recursive calls",
            self.stats.backtracks, self.stats.max_depth, self.stats.recursive_calls
        );

        self.model = search.into_model();
        Ok(satisfiable)
    }

    /// The model of the last [`solve`](Solver::solve) call, if it returned SAT.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Search counters of the last [`solve`](Solver::solve) call.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use sudosat_formula::test::{pigeon_hole_formula, sat_formula};

    use crate::decision::Strategy;

    #[test]
    fn solve_via_dimacs() {
        let mut solver = Solver::new();
        solver
            .add_dimacs_cnf(b"p cnf 2 2\n1 0\n-2 0\n" as &[_])
            .unwrap();
        assert!(solver.solve().unwrap());

        let model = solver.model().unwrap();
        assert!(model.lit_is_true(sudosat_formula::lit!(1)));
        assert!(model.lit_is_true(sudosat_formula::lit!(-2)));
    }

    proptest! {
        #[test]
        fn sat(formula in sat_formula(4..20usize, 10..100usize, 0.05..0.2, 0.9..1.0)) {
            for &strategy in &[
                Strategy::FirstUnassigned,
                Strategy::Mom,
                Strategy::JeroslowWang,
            ] {
                let mut solver = Solver::with_config(SolverConfig {
                    strategy,
                    ..SolverConfig::default()
                });
                solver.add_formula(&formula);

                prop_assert!(solver.solve().unwrap());

                let model = solver.model().unwrap();
                for clause in formula.iter() {
                    prop_assert!(clause.iter().any(|&lit| model.lit_is_true(lit)));
                }
            }
        }

        #[test]
        fn pigeon_hole_unsat(formula in pigeon_hole_formula(2..4usize)) {
            for &strategy in &[
                Strategy::FirstUnassigned,
                Strategy::Mom,
                Strategy::JeroslowWang,
            ] {
                let mut solver = Solver::with_config(SolverConfig {
                    strategy,
                    ..SolverConfig::default()
                });
                solver.add_formula(&formula);

                prop_assert!(!solver.solve().unwrap());
                prop_assert!(solver.model().is_none());
                prop_assert!(solver.stats().backtracks >= 1);
            }
        }
    }

    #[test]
    fn empty_formula_is_sat() {
        let mut solver = Solver::new();
        solver.add_formula(&CnfFormula::new());
        assert!(solver.solve().unwrap());
    }
}
