//! Solver configuration.
use serde::Deserialize;

use crate::decision::Strategy;

/// Configurable parameters used during solving.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Branching heuristic. (Default: first-unassigned)
    pub strategy: Strategy,

    /// Abort the solve when the recursion depth exceeds this. (Default: unlimited)
    pub depth_limit: Option<usize>,
}
