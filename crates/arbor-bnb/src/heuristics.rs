//! Default branching rules, node selection and primal rounding.

use crate::tree::NodeTree;
use arbor_base::utils::fractionality;
use arbor_base::{NodeNumber, VarId, XorShift64};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tie tolerance when comparing scores.
const TIE_EPS: f64 = 1e-9;

/// Rule used when no branching decision is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchingRule {
    /// Most fractional LP value; ties broken at random.
    #[default]
    MostFractional,
    /// Lowest-index candidate.
    FirstCandidate,
    /// Uniformly random candidate.
    Random,
}

/// Rule used when no node selection is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSelection {
    /// Smallest lower bound, deeper first on ties.
    #[default]
    BestBound,
    /// Deepest, most recently created node.
    DepthFirst,
    /// Smallest estimate, then smallest lower bound.
    BestEstimate,
}

/// A fractional variable of the focus node's LP solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Variable id.
    pub var: VarId,
    /// LP value.
    pub value: f64,
}

impl Candidate {
    /// Distance of the LP value to the nearest integer.
    pub fn fractionality(&self) -> f64 {
        fractionality(self.value)
    }
}

/// Picks a branching variable among `candidates`.
pub fn select_candidate(
    rule: BranchingRule,
    candidates: &[Candidate],
    rng: &mut XorShift64,
) -> Option<VarId> {
    if candidates.is_empty() {
        return None;
    }
    match rule {
        BranchingRule::FirstCandidate => candidates.iter().map(|c| c.var).min(),
        BranchingRule::Random => Some(candidates[rng.next_below(candidates.len())].var),
        BranchingRule::MostFractional => {
            let best = candidates
                .iter()
                .map(Candidate::fractionality)
                .fold(f64::NEG_INFINITY, f64::max);
            let ties: Vec<VarId> = candidates
                .iter()
                .filter(|c| c.fractionality() >= best - TIE_EPS)
                .map(|c| c.var)
                .collect();
            Some(ties[rng.next_below(ties.len())])
        }
    }
}

/// Picks the next open node to process.
pub fn select_node(rule: NodeSelection, tree: &NodeTree) -> Option<NodeNumber> {
    let best = match rule {
        NodeSelection::BestBound => tree.open_nodes().min_by(|a, b| {
            cmp_f64(a.lowerbound(), b.lowerbound())
                .then_with(|| b.depth().cmp(&a.depth()))
                .then_with(|| a.number().cmp(&b.number()))
        }),
        NodeSelection::DepthFirst => tree
            .open_nodes()
            .max_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.number().cmp(&b.number()))),
        NodeSelection::BestEstimate => tree.open_nodes().min_by(|a, b| {
            cmp_f64(a.estimate(), b.estimate())
                .then_with(|| cmp_f64(a.lowerbound(), b.lowerbound()))
                .then_with(|| a.number().cmp(&b.number()))
        }),
    };
    best.map(|n| n.number())
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= TIE_EPS {
        Ordering::Equal
    } else {
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}

/// Rounds an LP point down to a binary point.
///
/// Feasible for any packing LP point, since activities can only decrease.
pub fn round_down(values: &[f64], tolerance: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v >= 1.0 - tolerance { 1.0 } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate { var: 4, value: 0.9 },
            Candidate { var: 2, value: 0.5 },
            Candidate { var: 7, value: 0.3 },
        ]
    }

    #[test]
    fn test_most_fractional() {
        let mut rng = XorShift64::new(1);
        assert_eq!(
            select_candidate(BranchingRule::MostFractional, &candidates(), &mut rng),
            Some(2)
        );
    }

    #[test]
    fn test_first_candidate() {
        let mut rng = XorShift64::new(1);
        assert_eq!(
            select_candidate(BranchingRule::FirstCandidate, &candidates(), &mut rng),
            Some(2)
        );
    }

    #[test]
    fn test_random_candidate_is_member() {
        let mut rng = XorShift64::new(3);
        for _ in 0..20 {
            let var = select_candidate(BranchingRule::Random, &candidates(), &mut rng).unwrap();
            assert!([4, 2, 7].contains(&var));
        }
        assert_eq!(select_candidate(BranchingRule::Random, &[], &mut rng), None);
    }

    #[test]
    fn test_node_selection_rules() {
        let mut tree = NodeTree::with_root();
        tree.focus(0);
        tree.set_bounds(0, -10.0, -8.0);
        let (down, up) = tree.branch(0, 0);
        tree.set_bounds(down, -9.0, -9.5);
        tree.focus(up);
        let (_, up_up) = tree.branch(up, 1);

        assert_eq!(select_node(NodeSelection::BestBound, &tree), Some(up_up - 1));
        assert_eq!(select_node(NodeSelection::DepthFirst, &tree), Some(up_up));
        assert_eq!(select_node(NodeSelection::BestEstimate, &tree), Some(down));
    }

    #[test]
    fn test_round_down() {
        assert_eq!(round_down(&[1.0, 0.999_999_9, 0.5, 0.0], 1e-6), vec![1.0, 1.0, 0.0, 0.0]);
    }
}
