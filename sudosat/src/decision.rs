//! Branching heuristics.
//!
//! Each heuristic is a pure function of the current clause store and assignment, so runs are
//! reproducible. The store handed to [`Brancher::choose`] is always post-simplification, but the
//! implementations still skip assigned variables to keep the contract independent of that.
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use sudosat_formula::{Lit, Var};

use crate::assignment::Assignment;
use crate::store::ClauseStore;

/// A branching choice: which variable to assign next and which phase to try first.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Decision {
    pub var: Var,
    pub phase: bool,
}

/// Picks the next decision variable and its first phase.
///
/// Returns `None` when the store contains no unassigned variable, which the search driver
/// treats as satisfied.
pub trait Brancher {
    fn choose(&self, store: &ClauseStore, assignment: &Assignment) -> Option<Decision>;
}

/// First unassigned variable in clause-then-literal store order, phase `true`.
pub struct FirstUnassigned;

impl Brancher for FirstUnassigned {
    fn choose(&self, store: &ClauseStore, assignment: &Assignment) -> Option<Decision> {
        for clause in store.iter() {
            for &lit in clause {
                if !assignment.is_assigned(lit.var()) {
                    return Some(Decision {
                        var: lit.var(),
                        phase: true,
                    });
                }
            }
        }
        None
    }
}

/// Maximum Occurrences in clauses of Minimum size.
///
/// Only clauses of the smallest length present are counted. With `p` and `n` the positive and
/// negative occurrence counts of a variable in those clauses, the score is
/// `(p + n) * 2 + p * n`: total frequency dominates, the product term favors balanced
/// variables. Ties break to the smallest variable id and the first phase is always `true`.
pub struct Mom;

impl Brancher for Mom {
    fn choose(&self, store: &ClauseStore, assignment: &Assignment) -> Option<Decision> {
        let min_len = store.min_clause_len()?;

        let mut occurrences: FxHashMap<Lit, u64> = FxHashMap::default();
        for clause in store.iter().filter(|clause| clause.len() == min_len) {
            for &lit in clause {
                *occurrences.entry(lit).or_default() += 1;
            }
        }

        let mut vars: Vec<Var> = occurrences.keys().map(|lit| lit.var()).collect();
        vars.sort_unstable();
        vars.dedup();

        let mut best: Option<(u64, Var)> = None;
        for var in vars {
            if assignment.is_assigned(var) {
                continue;
            }
            let p = occurrences.get(&var.positive()).copied().unwrap_or(0);
            let n = occurrences.get(&var.negative()).copied().unwrap_or(0);
            let score = (p + n) * 2 + p * n;
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, var));
            }
        }

        best.map(|(_, var)| Decision { var, phase: true })
    }
}

/// Two-sided Jeroslow-Wang.
///
/// Accumulates `J(lit) = sum over clauses containing lit of 2^-len(clause)` and picks the
/// unassigned variable maximizing `max(J(v), J(-v))`, ties to the smallest variable id. The
/// first phase is the side with the larger weight, `true` on equality.
pub struct JeroslowWang;

impl Brancher for JeroslowWang {
    fn choose(&self, store: &ClauseStore, assignment: &Assignment) -> Option<Decision> {
        let mut weights: FxHashMap<Lit, f64> = FxHashMap::default();
        for clause in store.iter() {
            let weight = 2f64.powi(-(clause.len() as i32));
            for &lit in clause {
                *weights.entry(lit).or_default() += weight;
            }
        }

        let mut vars: Vec<Var> = weights.keys().map(|lit| lit.var()).collect();
        vars.sort_unstable();
        vars.dedup();

        let mut best: Option<(OrderedFloat<f64>, Decision)> = None;
        for var in vars {
            if assignment.is_assigned(var) {
                continue;
            }
            let positive = weights.get(&var.positive()).copied().unwrap_or(0.0);
            let negative = weights.get(&var.negative()).copied().unwrap_or(0.0);
            let score = OrderedFloat(positive.max(negative));
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((
                    score,
                    Decision {
                        var,
                        phase: positive >= negative,
                    },
                ));
            }
        }

        best.map(|(_, decision)| decision)
    }
}

/// Which branching heuristic to use.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// S1
    FirstUnassigned,
    /// S2
    Mom,
    /// S3
    JeroslowWang,
}

impl Strategy {
    /// The heuristic implementation for this strategy.
    pub fn brancher(self) -> Box<dyn Brancher> {
        match self {
            Strategy::FirstUnassigned => Box::new(FirstUnassigned),
            Strategy::Mom => Box::new(Mom),
            Strategy::JeroslowWang => Box::new(JeroslowWang),
        }
    }
}

impl Default for Strategy {
    fn default() -> Strategy {
        Strategy::FirstUnassigned
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Strategy::FirstUnassigned => "first-unassigned",
            Strategy::Mom => "mom",
            Strategy::JeroslowWang => "jeroslow-wang",
        };
        write!(f, "{}", name)
    }
}

/// Accepts the numeric strategy flags `1`/`2`/`3` as well as the kebab-case names.
impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(value: &str) -> Result<Strategy, UnknownStrategy> {
        match value {
            "1" | "first-unassigned" => Ok(Strategy::FirstUnassigned),
            "2" | "mom" => Ok(Strategy::Mom),
            "3" | "jeroslow-wang" => Ok(Strategy::JeroslowWang),
            _ => Err(UnknownStrategy(value.into())),
        }
    }
}

/// Error for strategy names [`FromStr`] does not recognize.
#[derive(Debug, thiserror::Error)]
#[error("unknown strategy '{0}', expected 1, 2 or 3")]
pub struct UnknownStrategy(pub String);
