//! Observation functions.
//!
//! An observation function is reset alongside the environment and then
//! extracts one observation after every transition. Observations are `None`
//! whenever the model has no focus node to describe, in particular once the
//! episode is over.

mod capacity;
mod focus_node;
mod weight;

pub use capacity::Capacity;
pub use focus_node::{FocusNode, FocusNodeObs};
pub use weight::Weight;

use crate::model::Model;

/// Extracts observations from a model.
pub trait ObservationFunction {
    /// Observation type.
    type Observation;

    /// Called before the environment starts a new episode.
    fn before_reset(&mut self, _model: &Model) {}

    /// Extracts the observation for the current state.
    fn extract(&mut self, model: &Model, done: bool) -> Self::Observation;
}

/// Observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nothing;

impl ObservationFunction for Nothing {
    type Observation = ();

    fn extract(&mut self, _model: &Model, _done: bool) -> Self::Observation {}
}

impl<A, B> ObservationFunction for (A, B)
where
    A: ObservationFunction,
    B: ObservationFunction,
{
    type Observation = (A::Observation, B::Observation);

    fn before_reset(&mut self, model: &Model) {
        self.0.before_reset(model);
        self.1.before_reset(model);
    }

    fn extract(&mut self, model: &Model, done: bool) -> Self::Observation {
        (self.0.extract(model, done), self.1.extract(model, done))
    }
}

impl<A, B, C> ObservationFunction for (A, B, C)
where
    A: ObservationFunction,
    B: ObservationFunction,
    C: ObservationFunction,
{
    type Observation = (A::Observation, B::Observation, C::Observation);

    fn before_reset(&mut self, model: &Model) {
        self.0.before_reset(model);
        self.1.before_reset(model);
        self.2.before_reset(model);
    }

    fn extract(&mut self, model: &Model, done: bool) -> Self::Observation {
        (
            self.0.extract(model, done),
            self.1.extract(model, done),
            self.2.extract(model, done),
        )
    }
}
