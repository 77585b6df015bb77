//! Node selection dynamics.

use super::{Defaultable, Dynamics};
use crate::model::Model;
use arbor_base::{Error, NodeNumber, Result};
use arbor_bnb::{Call, CallbackResult, CallbackType, OpenNodes};

/// Each step picks the next open node to process.
///
/// The action is a node number from the action set.
/// [`Defaultable::Default`] defers to the solver's node selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeselDynamics;

impl NodeselDynamics {
    /// Creates node selection dynamics.
    pub fn new() -> Self {
        Self
    }

    fn outcome(model: &Model, call: Option<Call>) -> (bool, Option<OpenNodes>) {
        match call {
            Some(_) if model.solver().n_nodes_left() > 0 => {
                (false, Some(model.solver().open_nodes()))
            }
            _ => (true, None),
        }
    }
}

impl Dynamics for NodeselDynamics {
    type Action = Defaultable<NodeNumber>;
    type ActionSet = Option<OpenNodes>;

    fn reset_dynamics(&mut self, model: &mut Model) -> Result<(bool, Self::ActionSet)> {
        let call = model.solver_mut().solve_iter(&[CallbackType::Nodesel])?;
        Ok(Self::outcome(model, call))
    }

    fn step_dynamics(
        &mut self,
        model: &mut Model,
        action: Self::Action,
    ) -> Result<(bool, Self::ActionSet)> {
        let result = match action {
            Defaultable::Value(node) => {
                if !model.solver().is_open(node) {
                    return Err(Error::InvalidAction(format!("node {node} is not open")));
                }
                CallbackResult::Selected(node)
            }
            Defaultable::Default => CallbackResult::DidNotRun,
        };
        let call = model.solver_mut().solve_iter_continue(result)?;
        Ok(Self::outcome(model, call))
    }
}
