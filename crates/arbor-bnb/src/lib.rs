//! # arbor-bnb
//!
//! Branch-and-bound core for binary packing problems.
//!
//! Implements:
//! - LP relaxations with a dense primal simplex
//! - Node tree with open-node partitioning (children, siblings, leaves)
//! - Default branching rules, node selection and a rounding heuristic
//! - A resumable main loop that suspends on reverse callbacks

pub mod callback;
pub mod heuristics;
pub mod lp;
pub mod solver;
pub mod tree;

pub use callback::{Call, CallbackResult, CallbackType};
pub use heuristics::{BranchingRule, Candidate, NodeSelection};
pub use solver::{Incumbent, SolveStatus, Solver, SolverConfig, SolverStats};
pub use tree::{Node, NodeStatus, OpenNodes};
