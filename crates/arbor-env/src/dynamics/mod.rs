//! Environment dynamics.
//!
//! Dynamics decide which solver decision each environment step answers.
//! `reset_dynamics` starts solving a fresh model and runs until the first
//! decision; `step_dynamics` applies an action and runs until the next one.
//! Both return whether the episode is over and the set of valid actions.

mod branching;
mod heuristic;
mod nodesel;

pub use branching::BranchingDynamics;
pub use heuristic::HeuristicDynamics;
pub use nodesel::NodeselDynamics;

use crate::model::Model;
use arbor_base::{Result, XorShift64};

/// An action, or a request to let the solver decide on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Defaultable<T> {
    /// Explicit action.
    Value(T),
    /// Use the solver's configured rule.
    #[default]
    Default,
}

impl<T> Defaultable<T> {
    /// Returns the explicit value, if any.
    pub fn value(self) -> Option<T> {
        match self {
            Defaultable::Value(value) => Some(value),
            Defaultable::Default => None,
        }
    }
}

impl<T> From<T> for Defaultable<T> {
    fn from(value: T) -> Self {
        Defaultable::Value(value)
    }
}

/// Drives a [`Model`] from one decision point to the next.
pub trait Dynamics {
    /// What the caller supplies at each step.
    type Action;
    /// Valid actions at the current decision point.
    type ActionSet: Default;

    /// Starts solving `model` and stops at the first decision.
    fn reset_dynamics(&mut self, model: &mut Model) -> Result<(bool, Self::ActionSet)>;

    /// Applies `action` and stops at the next decision.
    fn step_dynamics(
        &mut self,
        model: &mut Model,
        action: Self::Action,
    ) -> Result<(bool, Self::ActionSet)>;

    /// Seeds the model's randomness from the environment generator.
    fn set_dynamics_random_state(&mut self, model: &mut Model, rng: &mut XorShift64) -> Result<()> {
        model.solver_mut().set_seed(rng.next())
    }
}
