//! # arbor-env
//!
//! Environments that hand branch-and-bound decisions to a caller.
//!
//! An [`Environment`] combines:
//! - **Dynamics**: which solver decision each step answers
//! - **Observation functions**: what the caller sees between steps
//! - **Reward functions**: scalar feedback per transition
//! - **Information functions**: extra diagnostics per transition
//!
//! # Example
//!
//! ```ignore
//! use arbor_env::{branching, Defaultable, Model};
//!
//! let model = Model::from_file("knapsack.json")?;
//! let mut env = branching::Env::make_dummy();
//! let (_obs, mut done) = env.reset(model.clone())?;
//! while !done {
//!     let (_obs, _reward, d, _info) = env.step(Defaultable::Value(0))?;
//!     done = d;
//! }
//! ```

pub mod branching;
pub mod dynamics;
pub mod environment;
pub mod heuristic;
pub mod information;
pub mod model;
pub mod nodesel;
pub mod observation;
pub mod reward;

// Re-export core types
pub use arbor_base::{Error, NodeNumber, Result, Stage, VarId};
pub use arbor_bnb::{OpenNodes, SolveStatus, SolverConfig, SolverStats};

pub use dynamics::{
    BranchingDynamics, Defaultable, Dynamics, HeuristicDynamics, NodeselDynamics,
};
pub use environment::Environment;
pub use information::InformationFunction;
pub use model::Model;
pub use observation::ObservationFunction;
pub use reward::RewardFunction;
