//! Branch-and-bound node tree.

use arbor_base::{NodeNumber, VarId};
use std::collections::BTreeSet;

/// Node status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Waiting in the open set.
    Open,
    /// Currently being processed.
    Focused,
    /// Split into two children.
    Branched,
    /// Discarded by bound.
    Pruned,
    /// LP relaxation infeasible.
    Infeasible,
    /// LP solution integral.
    Feasible,
}

/// A node of the branch-and-bound tree.
#[derive(Debug, Clone)]
pub struct Node {
    number: NodeNumber,
    parent: Option<NodeNumber>,
    depth: u32,
    lowerbound: f64,
    estimate: f64,
    /// Bound change that created this node: `(variable, fixed value)`.
    bound_change: Option<(VarId, bool)>,
    status: NodeStatus,
}

impl Node {
    /// Returns the node number.
    pub fn number(&self) -> NodeNumber {
        self.number
    }

    /// Returns the parent node number (None for root).
    pub fn parent(&self) -> Option<NodeNumber> {
        self.parent
    }

    /// Returns the depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Lower bound on the minimization objective in this subtree.
    pub fn lowerbound(&self) -> f64 {
        self.lowerbound
    }

    /// Estimated best objective in this subtree.
    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    /// Returns the bound change applied when this node was created.
    pub fn bound_change(&self) -> Option<(VarId, bool)> {
        self.bound_change
    }

    /// Returns the current status.
    pub fn status(&self) -> NodeStatus {
        self.status
    }
}

/// Open nodes classified relative to the focus node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenNodes {
    /// Open nodes that are neither children nor siblings.
    pub leaves: Vec<NodeNumber>,
    /// Open nodes whose parent is the focus node.
    pub children: Vec<NodeNumber>,
    /// Open nodes sharing the focus node's parent.
    pub siblings: Vec<NodeNumber>,
}

impl OpenNodes {
    /// Total number of open nodes.
    pub fn len(&self) -> usize {
        self.leaves.len() + self.children.len() + self.siblings.len()
    }

    /// Returns whether no node is open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether `number` is in any of the three sets.
    pub fn contains(&self, number: NodeNumber) -> bool {
        self.iter().any(|n| n == number)
    }

    /// Iterates over leaves, then children, then siblings.
    pub fn iter(&self) -> impl Iterator<Item = NodeNumber> + '_ {
        self.leaves
            .iter()
            .chain(&self.children)
            .chain(&self.siblings)
            .copied()
    }
}

/// All nodes created during one solve, indexed by number.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
    open: BTreeSet<NodeNumber>,
}

impl NodeTree {
    /// Creates a tree holding only an open root node.
    pub fn with_root() -> Self {
        let root = Node {
            number: 0,
            parent: None,
            depth: 0,
            lowerbound: f64::NEG_INFINITY,
            estimate: f64::NEG_INFINITY,
            bound_change: None,
            status: NodeStatus::Open,
        };
        Self {
            nodes: vec![root],
            open: BTreeSet::from([0]),
        }
    }

    /// Returns a node by number.
    pub fn node(&self, number: NodeNumber) -> Option<&Node> {
        self.nodes.get(number as usize)
    }

    /// Total number of nodes created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether no node was created.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of open nodes.
    pub fn n_open(&self) -> usize {
        self.open.len()
    }

    /// Returns whether `number` is open.
    pub fn is_open(&self, number: NodeNumber) -> bool {
        self.open.contains(&number)
    }

    /// Iterates over open nodes in number order.
    pub fn open_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.open.iter().map(|&n| &self.nodes[n as usize])
    }

    /// Removes `number` from the open set and marks it focused.
    ///
    /// Returns false if the node was not open.
    pub fn focus(&mut self, number: NodeNumber) -> bool {
        if !self.open.remove(&number) {
            return false;
        }
        self.nodes[number as usize].status = NodeStatus::Focused;
        true
    }

    /// Sets the status of a node.
    pub fn set_status(&mut self, number: NodeNumber, status: NodeStatus) {
        if let Some(node) = self.nodes.get_mut(number as usize) {
            node.status = status;
        }
    }

    /// Sets lower bound and estimate of a node.
    pub fn set_bounds(&mut self, number: NodeNumber, lowerbound: f64, estimate: f64) {
        if let Some(node) = self.nodes.get_mut(number as usize) {
            node.lowerbound = lowerbound;
            node.estimate = estimate;
        }
    }

    /// Creates the down (`var = 0`) and up (`var = 1`) children of `parent`.
    ///
    /// Children inherit the parent's bounds. Returns `(down, up)`.
    pub fn branch(&mut self, parent: NodeNumber, var: VarId) -> (NodeNumber, NodeNumber) {
        let (depth, lowerbound, estimate) = {
            let p = &mut self.nodes[parent as usize];
            p.status = NodeStatus::Branched;
            (p.depth + 1, p.lowerbound, p.estimate)
        };
        let mut create = |value: bool| {
            let number = self.nodes.len() as NodeNumber;
            self.nodes.push(Node {
                number,
                parent: Some(parent),
                depth,
                lowerbound,
                estimate,
                bound_change: Some((var, value)),
                status: NodeStatus::Open,
            });
            self.open.insert(number);
            number
        };
        let down = create(false);
        let up = create(true);
        (down, up)
    }

    /// Collects the fixings from the root down to `number`.
    pub fn fixings(&self, number: NodeNumber, n_vars: usize) -> Vec<Option<bool>> {
        let mut fixings = vec![None; n_vars];
        let mut current = self.node(number);
        while let Some(node) = current {
            if let Some((var, value)) = node.bound_change {
                fixings[var] = Some(value);
            }
            current = node.parent.and_then(|p| self.node(p));
        }
        fixings
    }

    /// Classifies the open nodes relative to `focus`.
    ///
    /// With no focus node, the open root counts as a child.
    pub fn partition(&self, focus: Option<NodeNumber>) -> OpenNodes {
        let focus_parent = focus.and_then(|f| self.node(f)).and_then(|n| n.parent);
        let mut open = OpenNodes::default();
        for node in self.open_nodes() {
            if node.parent == focus {
                open.children.push(node.number);
            } else if focus_parent.is_some() && node.parent == focus_parent {
                open.siblings.push(node.number);
            } else {
                open.leaves.push(node.number);
            }
        }
        open
    }

    /// Discards open nodes whose lower bound is at least `cutoff`.
    ///
    /// Returns the number of pruned nodes.
    pub fn prune(&mut self, cutoff: f64) -> usize {
        let doomed: Vec<NodeNumber> = self
            .open_nodes()
            .filter(|n| n.lowerbound >= cutoff)
            .map(|n| n.number)
            .collect();
        for &number in &doomed {
            self.open.remove(&number);
            self.nodes[number as usize].status = NodeStatus::Pruned;
        }
        doomed.len()
    }

    /// Smallest lower bound among open nodes.
    pub fn lowest_open_bound(&self) -> Option<f64> {
        self.open_nodes().map(|n| n.lowerbound).reduce(f64::min)
    }
}
