//! Focus node features.

use super::ObservationFunction;
use crate::model::Model;
use arbor_base::Stage;
use serde::Serialize;

/// Features of the node the solver is working on.
///
/// Bounds are in the solver's internal minimization sense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusNodeObs {
    /// Node number.
    pub number: i64,
    /// Depth in the tree, root at 0.
    pub depth: u32,
    /// Lower bound of the subtree.
    pub lowerbound: f64,
    /// Estimated best objective in the subtree.
    pub estimate: f64,
    /// Number of variables in the problem.
    pub n_vars: usize,
    /// Number of fractional branching candidates.
    pub n_lp_candidates: usize,
    /// Number of unfixed variables.
    pub n_pseudo_candidates: usize,
    /// Rows added during the solve. Always 0: the solver adds no cuts.
    pub n_added_conss: usize,
    /// Parent node number, -1 at the root.
    pub parent_number: i64,
    /// Parent lower bound, the node's own at the root.
    pub parent_lowerbound: f64,
}

/// Observes [`FocusNodeObs`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusNode;

impl ObservationFunction for FocusNode {
    type Observation = Option<FocusNodeObs>;

    fn extract(&mut self, model: &Model, done: bool) -> Self::Observation {
        if done || model.stage() != Stage::Solving {
            return None;
        }
        let solver = model.solver();
        let node = solver.focus_node()?;
        let parent = node.parent().and_then(|p| solver.node(p));

        Some(FocusNodeObs {
            number: node.number() as i64,
            depth: node.depth(),
            lowerbound: node.lowerbound(),
            estimate: node.estimate(),
            n_vars: solver.n_vars(),
            n_lp_candidates: solver.lp_candidates().len(),
            n_pseudo_candidates: solver.pseudo_candidates().len(),
            n_added_conss: 0,
            parent_number: parent.map_or(-1, |p| p.number() as i64),
            parent_lowerbound: parent.map_or(node.lowerbound(), |p| p.lowerbound()),
        })
    }
}
