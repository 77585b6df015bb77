//! Primal heuristic dynamics.

use super::{Defaultable, Dynamics};
use crate::model::Model;
use arbor_base::{Result, VarId};
use arbor_bnb::{Call, CallbackResult, CallbackType};

/// Each step may supply a primal solution after the focus node's LP is solved.
///
/// The action set lists the variables left unfixed at the focus node. A
/// supplied solution must be binary, satisfy every row and carry one value
/// per variable; a better one becomes the incumbent and cuts off nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDynamics;

impl HeuristicDynamics {
    fn outcome(model: &Model, call: Option<Call>) -> (bool, Option<Vec<VarId>>) {
        match call {
            Some(_) => (false, Some(model.solver().pseudo_candidates().to_vec())),
            None => (true, None),
        }
    }
}

impl Dynamics for HeuristicDynamics {
    type Action = Defaultable<Vec<f64>>;
    type ActionSet = Option<Vec<VarId>>;

    fn reset_dynamics(&mut self, model: &mut Model) -> Result<(bool, Self::ActionSet)> {
        let call = model.solver_mut().solve_iter(&[CallbackType::Heuristic])?;
        Ok(Self::outcome(model, call))
    }

    fn step_dynamics(
        &mut self,
        model: &mut Model,
        action: Self::Action,
    ) -> Result<(bool, Self::ActionSet)> {
        let result = match action {
            Defaultable::Value(solution) => CallbackResult::FoundSolution(solution),
            Defaultable::Default => CallbackResult::DidNotRun,
        };
        let call = model.solver_mut().solve_iter_continue(result)?;
        Ok(Self::outcome(model, call))
    }
}
