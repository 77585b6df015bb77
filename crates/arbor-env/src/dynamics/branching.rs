//! Variable branching dynamics.

use super::{Defaultable, Dynamics};
use crate::model::Model;
use arbor_base::{Error, Result, VarId};
use arbor_bnb::{Call, CallbackResult, CallbackType};

/// Each step picks the variable to branch on at the focus node.
///
/// The action is a position into the action set, which lists the fractional
/// LP candidates (or every unfixed variable when `pseudo_candidates` is set).
/// [`Defaultable::Default`] defers to the solver's branching rule.
#[derive(Debug, Clone, Default)]
pub struct BranchingDynamics {
    pseudo_candidates: bool,
}

impl BranchingDynamics {
    /// Creates branching dynamics.
    pub fn new(pseudo_candidates: bool) -> Self {
        Self { pseudo_candidates }
    }

    /// Whether the action set holds pseudo candidates.
    pub fn uses_pseudo_candidates(&self) -> bool {
        self.pseudo_candidates
    }

    fn candidates(&self, model: &Model) -> Vec<VarId> {
        let solver = model.solver();
        if self.pseudo_candidates {
            solver.pseudo_candidates().to_vec()
        } else {
            solver.lp_candidates().iter().map(|c| c.var).collect()
        }
    }

    fn outcome(&self, model: &Model, call: Option<Call>) -> (bool, Option<Vec<VarId>>) {
        match call {
            Some(_) => (false, Some(self.candidates(model))),
            None => (true, None),
        }
    }
}

impl Dynamics for BranchingDynamics {
    type Action = Defaultable<usize>;
    type ActionSet = Option<Vec<VarId>>;

    fn reset_dynamics(&mut self, model: &mut Model) -> Result<(bool, Self::ActionSet)> {
        let call = model.solver_mut().solve_iter(&[CallbackType::Branchrule])?;
        Ok(self.outcome(model, call))
    }

    fn step_dynamics(
        &mut self,
        model: &mut Model,
        action: Self::Action,
    ) -> Result<(bool, Self::ActionSet)> {
        let result = match action {
            Defaultable::Value(position) => {
                let candidates = self.candidates(model);
                let var = candidates.get(position).copied().ok_or_else(|| {
                    Error::InvalidAction(format!(
                        "branching position {position} with {} candidates",
                        candidates.len()
                    ))
                })?;
                tracing::debug!("Branching on x{} (position {})", var, position);
                CallbackResult::Branched(var)
            }
            Defaultable::Default => CallbackResult::DidNotRun,
        };
        let call = model.solver_mut().solve_iter_continue(result)?;
        Ok(self.outcome(model, call))
    }
}
