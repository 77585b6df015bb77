//! Information functions.

use crate::model::Model;
use arbor_bnb::SolverStats;

/// Extracts auxiliary information after every transition.
pub trait InformationFunction {
    /// Information type.
    type Information;

    /// Called before the environment starts a new episode.
    fn before_reset(&mut self, _model: &Model) {}

    /// Extracts information about the current state.
    fn extract(&mut self, model: &Model, done: bool) -> Self::Information;
}

/// No information.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nothing;

impl InformationFunction for Nothing {
    type Information = ();

    fn extract(&mut self, _model: &Model, _done: bool) -> Self::Information {}
}

/// Snapshot of the solver statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Statistics;

impl InformationFunction for Statistics {
    type Information = SolverStats;

    fn extract(&mut self, model: &Model, _done: bool) -> Self::Information {
        model.stats().clone()
    }
}
