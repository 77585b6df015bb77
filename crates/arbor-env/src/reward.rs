//! Reward functions.

use crate::model::Model;

/// Extracts a scalar reward after every transition.
pub trait RewardFunction {
    /// Called before the environment starts a new episode.
    fn before_reset(&mut self, _model: &Model) {}

    /// Extracts the reward for the transition that just happened.
    fn extract(&mut self, model: &Model, done: bool) -> f64;
}

/// Always the same reward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl Default for Constant {
    fn default() -> Self {
        Constant(0.0)
    }
}

impl RewardFunction for Constant {
    fn extract(&mut self, _model: &Model, _done: bool) -> f64 {
        self.0
    }
}

/// 1 on the terminal transition, 0 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsDone;

impl RewardFunction for IsDone {
    fn extract(&mut self, _model: &Model, done: bool) -> f64 {
        if done {
            1.0
        } else {
            0.0
        }
    }
}

/// Nodes processed since the previous extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NNodes {
    last: u64,
}

impl RewardFunction for NNodes {
    fn before_reset(&mut self, _model: &Model) {
        self.last = 0;
    }

    fn extract(&mut self, model: &Model, _done: bool) -> f64 {
        let nodes = model.stats().nodes;
        let reward = nodes.saturating_sub(self.last) as f64;
        self.last = nodes;
        reward
    }
}

/// Simplex iterations performed since the previous extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LpIterations {
    last: u64,
}

impl RewardFunction for LpIterations {
    fn before_reset(&mut self, _model: &Model) {
        self.last = 0;
    }

    fn extract(&mut self, model: &Model, _done: bool) -> f64 {
        let iterations = model.stats().lp_iterations;
        let reward = iterations.saturating_sub(self.last) as f64;
        self.last = iterations;
        reward
    }
}
