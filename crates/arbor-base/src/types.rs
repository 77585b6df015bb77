//! Identifiers and solver stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a binary variable (also its LP column position).
pub type VarId = usize;

/// Creation-order number of a branch-and-bound node. The root is 0.
pub type NodeNumber = u64;

/// Lifecycle stage of a solver model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// No problem loaded.
    Init,
    /// Problem loaded, branch-and-bound not started.
    Problem,
    /// Suspended inside branch-and-bound, waiting on a callback decision.
    Solving,
    /// Branch-and-bound finished or stopped on a limit.
    Solved,
}

impl Stage {
    /// Returns the lowercase stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Problem => "problem",
            Self::Solving => "solving",
            Self::Solved => "solved",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
