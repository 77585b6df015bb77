//! Reverse callbacks: points where branch-and-bound hands a decision to the caller.

use arbor_base::{NodeNumber, VarId};

/// Decision points that can be handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackType {
    /// Choose the branching variable of the focus node.
    Branchrule,
    /// Choose the next open node to process.
    Nodesel,
    /// Supply a primal solution once the focus node's LP is solved.
    Heuristic,
}

/// A suspended decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// The focus node's LP is fractional and needs a branching variable.
    Branchrule {
        /// Node to branch.
        node: NodeNumber,
    },
    /// The next node must be selected among the open nodes.
    Nodesel {
        /// Last processed node, if any.
        focus: Option<NodeNumber>,
    },
    /// The focus node's LP is fractional; a solution may be supplied before branching.
    Heuristic {
        /// Node being processed.
        node: NodeNumber,
    },
}

impl Call {
    /// Returns the callback type of this call.
    pub fn callback_type(&self) -> CallbackType {
        match self {
            Self::Branchrule { .. } => CallbackType::Branchrule,
            Self::Nodesel { .. } => CallbackType::Nodesel,
            Self::Heuristic { .. } => CallbackType::Heuristic,
        }
    }
}

/// Answer to a suspended call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackResult {
    /// Let the default rule decide.
    DidNotRun,
    /// Branch on this variable.
    Branched(VarId),
    /// Process this node next.
    Selected(NodeNumber),
    /// A feasible binary solution, one value per variable.
    FoundSolution(Vec<f64>),
}
