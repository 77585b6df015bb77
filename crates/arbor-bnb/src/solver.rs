//! Resumable branch-and-bound solver.
//!
//! The solver runs its main loop until it reaches a decision point for which
//! a reverse callback is installed, then returns the [`Call`] and keeps its
//! state so that [`Solver::solve_iter_continue`] can pick up exactly where it
//! stopped.

use crate::callback::{Call, CallbackResult, CallbackType};
use crate::heuristics::{self, BranchingRule, Candidate, NodeSelection};
use crate::lp::{self, LpData, LpStatus};
use crate::tree::{Node, NodeStatus, NodeTree, OpenNodes};
use arbor_base::utils::is_integral;
use arbor_base::{Error, NodeNumber, Result, Stage, VarId, XorShift64};
use arbor_format::{PackingProblem, Sense};
use serde::{Deserialize, Serialize};

/// Bound comparison tolerance.
const BOUND_EPS: f64 = 1e-9;

/// Configuration for the branch-and-bound solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Stop after processing this many nodes.
    pub node_limit: Option<u64>,
    /// Branching rule used when no decision is supplied.
    pub branching_rule: BranchingRule,
    /// Node selection used when no decision is supplied.
    pub node_selection: NodeSelection,
    /// Run the rounding heuristic at every fractional node.
    pub primal_heuristic: bool,
    /// Seed for randomized tie breaking.
    pub seed: u64,
    /// Integrality tolerance.
    pub feasibility_tolerance: f64,
    /// Simplex pivots allowed per LP solve.
    pub lp_iteration_limit: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            node_limit: None,
            branching_rule: BranchingRule::default(),
            node_selection: NodeSelection::default(),
            primal_heuristic: true,
            seed: 0,
            feasibility_tolerance: 1e-6,
            lp_iteration_limit: 100_000,
        }
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Not finished.
    #[default]
    Unknown,
    /// Tree exhausted with an incumbent.
    Optimal,
    /// Tree exhausted without an incumbent.
    Infeasible,
    /// Stopped on the node limit.
    NodeLimit,
}

/// Solver statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Nodes focused.
    pub nodes: u64,
    /// Simplex pivots.
    pub lp_iterations: u64,
    /// LP relaxations solved.
    pub lp_solves: u64,
    /// Branchings performed.
    pub branchings: u64,
    /// Improving solutions found.
    pub incumbents: u64,
    /// Deepest focused node.
    pub max_depth: u32,
}

/// Best known solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Incumbent {
    /// Binary values.
    pub values: Vec<f64>,
    /// Minimization objective.
    pub objective: f64,
}

/// The decision the solver is suspended on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Select,
    Heuristic(NodeNumber),
    Branch(NodeNumber),
}

/// Branch-and-bound over a binary packing problem.
#[derive(Debug)]
pub struct Solver {
    problem: PackingProblem,
    lp: LpData,
    config: SolverConfig,
    stage: Stage,
    status: SolveStatus,
    tree: NodeTree,
    focus: Option<NodeNumber>,
    lp_candidates: Vec<Candidate>,
    pseudo_candidates: Vec<VarId>,
    incumbent: Option<Incumbent>,
    reverse: Vec<CallbackType>,
    pending: Option<Pending>,
    stats: SolverStats,
    rng: XorShift64,
}

impl Default for Solver {
    /// An empty solver in stage [`Stage::Init`].
    fn default() -> Self {
        let config = SolverConfig::default();
        Self::from_parts(PackingProblem::new("", Sense::Maximize), config, Stage::Init)
    }
}

impl Solver {
    /// Creates a solver with default configuration.
    pub fn new(problem: PackingProblem) -> Result<Self> {
        Self::with_config(problem, SolverConfig::default())
    }

    /// Creates a solver with custom configuration.
    pub fn with_config(problem: PackingProblem, config: SolverConfig) -> Result<Self> {
        problem.validate()?;
        Ok(Self::from_parts(problem, config, Stage::Problem))
    }

    fn from_parts(problem: PackingProblem, config: SolverConfig, stage: Stage) -> Self {
        let lp = LpData::from_problem(&problem);
        let rng = XorShift64::new(config.seed);
        Self {
            problem,
            lp,
            config,
            stage,
            status: SolveStatus::Unknown,
            tree: NodeTree::default(),
            focus: None,
            lp_candidates: Vec::new(),
            pseudo_candidates: Vec::new(),
            incumbent: None,
            reverse: Vec::new(),
            pending: None,
            stats: SolverStats::default(),
            rng,
        }
    }

    /// Copies the original problem and configuration, discarding solving state.
    pub fn copy_orig(&self) -> Self {
        let stage = match self.stage {
            Stage::Init => Stage::Init,
            _ => Stage::Problem,
        };
        Self::from_parts(self.problem.clone(), self.config.clone(), stage)
    }

    /// Returns the current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the solve status.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Returns the problem.
    pub fn problem(&self) -> &PackingProblem {
        &self.problem
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replaces the configuration. Only allowed before solving.
    pub fn set_config(&mut self, config: SolverConfig) -> Result<()> {
        self.expect_unstarted()?;
        self.config = config;
        Ok(())
    }

    /// Sets the tie-breaking seed. Only allowed before solving.
    pub fn set_seed(&mut self, seed: u64) -> Result<()> {
        self.expect_unstarted()?;
        self.config.seed = seed;
        Ok(())
    }

    fn expect_unstarted(&self) -> Result<()> {
        match self.stage {
            Stage::Init | Stage::Problem => Ok(()),
            actual => Err(Error::InvalidStage {
                expected: "init or problem",
                actual,
            }),
        }
    }

    /// Returns the number of variables.
    pub fn n_vars(&self) -> usize {
        self.problem.num_vars()
    }

    /// Solves to completion with the default rules.
    pub fn solve(&mut self) -> Result<SolveStatus> {
        match self.solve_iter(&[])? {
            None => Ok(self.status),
            Some(call) => Err(Error::Internal(format!(
                "solve without callbacks stopped on {call:?}"
            ))),
        }
    }

    /// Starts solving with the given reverse callbacks installed.
    ///
    /// Returns the first call, or `None` if solving finished without one.
    pub fn solve_iter(&mut self, callbacks: &[CallbackType]) -> Result<Option<Call>> {
        if self.stage != Stage::Problem {
            return Err(Error::InvalidStage {
                expected: "problem",
                actual: self.stage,
            });
        }
        tracing::info!(
            "Solving {} ({} vars, {} rows, callbacks {:?})",
            self.problem.name,
            self.problem.num_vars(),
            self.problem.num_rows(),
            callbacks
        );
        self.reverse = callbacks.to_vec();
        self.rng = XorShift64::new(self.config.seed);
        self.tree = NodeTree::with_root();
        self.stage = Stage::Solving;
        self.advance()
    }

    /// Resumes solving with the answer to the pending call.
    pub fn solve_iter_continue(&mut self, result: CallbackResult) -> Result<Option<Call>> {
        if self.stage != Stage::Solving {
            return Err(Error::InvalidStage {
                expected: "solving",
                actual: self.stage,
            });
        }
        let pending = self
            .pending
            .take()
            .ok_or_else(|| Error::Solver("no callback is waiting for a result".to_string()))?;

        let call = match (pending, result) {
            (Pending::Select, CallbackResult::Selected(number)) => {
                if !self.tree.is_open(number) {
                    self.pending = Some(pending);
                    return Err(Error::InvalidAction(format!("node {number} is not open")));
                }
                self.process(number)?
            }
            (Pending::Select, CallbackResult::DidNotRun) => {
                let number = self.default_node()?;
                self.process(number)?
            }
            (Pending::Branch(node), CallbackResult::Branched(var)) => {
                if !self.pseudo_candidates.contains(&var) {
                    self.pending = Some(pending);
                    return Err(Error::InvalidAction(format!(
                        "variable {var} cannot be branched at node {node}"
                    )));
                }
                self.branch(node, var);
                None
            }
            (Pending::Branch(node), CallbackResult::DidNotRun) => {
                let var = self.default_candidate()?;
                self.branch(node, var);
                None
            }
            (Pending::Heuristic(node), CallbackResult::FoundSolution(values)) => {
                if !self
                    .problem
                    .is_feasible(&values, self.config.feasibility_tolerance)
                {
                    self.pending = Some(pending);
                    return Err(Error::InvalidAction(format!(
                        "supplied solution with {} values is not feasible",
                        values.len()
                    )));
                }
                let values = values.iter().map(|v| v.round()).collect();
                self.try_incumbent(values, "caller");
                self.finish_fractional(node)?
            }
            (Pending::Heuristic(node), CallbackResult::DidNotRun) => self.finish_fractional(node)?,
            (pending, result) => {
                self.pending = Some(pending);
                return Err(Error::Solver(format!(
                    "{result:?} does not answer the pending {pending:?} call"
                )));
            }
        };

        match call {
            Some(call) => Ok(Some(call)),
            None => self.advance(),
        }
    }

    /// Runs node selection and processing until a call or the end.
    fn advance(&mut self) -> Result<Option<Call>> {
        loop {
            if self.tree.n_open() == 0 {
                let status = if self.incumbent.is_some() {
                    SolveStatus::Optimal
                } else {
                    SolveStatus::Infeasible
                };
                self.finish(status);
                return Ok(None);
            }
            if let Some(limit) = self.config.node_limit {
                if self.stats.nodes >= limit {
                    tracing::warn!(
                        "Node limit {} reached with {} open nodes",
                        limit,
                        self.tree.n_open()
                    );
                    self.finish(SolveStatus::NodeLimit);
                    return Ok(None);
                }
            }
            if self.reverse.contains(&CallbackType::Nodesel) {
                self.pending = Some(Pending::Select);
                return Ok(Some(Call::Nodesel { focus: self.focus }));
            }
            let number = self.default_node()?;
            if let Some(call) = self.process(number)? {
                return Ok(Some(call));
            }
        }
    }

    fn default_node(&self) -> Result<NodeNumber> {
        heuristics::select_node(self.config.node_selection, &self.tree)
            .ok_or_else(|| Error::Internal("node selection on an empty tree".to_string()))
    }

    fn default_candidate(&mut self) -> Result<VarId> {
        heuristics::select_candidate(self.config.branching_rule, &self.lp_candidates, &mut self.rng)
            .ok_or_else(|| Error::Internal("branching without candidates".to_string()))
    }

    /// Focuses and evaluates a node. Returns a branching call if one is installed.
    fn process(&mut self, number: NodeNumber) -> Result<Option<Call>> {
        if !self.tree.focus(number) {
            return Err(Error::Internal(format!("node {number} is not open")));
        }
        self.focus = Some(number);
        self.lp_candidates.clear();
        self.pseudo_candidates.clear();
        self.stats.nodes += 1;

        let (depth, lowerbound) = match self.tree.node(number) {
            Some(node) => (node.depth(), node.lowerbound()),
            None => return Err(Error::Internal(format!("node {number} does not exist"))),
        };
        self.stats.max_depth = self.stats.max_depth.max(depth);
        tracing::debug!("Focus node {} at depth {} (lower bound {})", number, depth, lowerbound);

        if self.is_cut_off(lowerbound) {
            self.tree.set_status(number, NodeStatus::Pruned);
            tracing::debug!("Node {} pruned by bound", number);
            return Ok(None);
        }

        let fixings = self.tree.fixings(number, self.n_vars());
        let relaxation = lp::solve(&self.lp, &fixings, self.config.lp_iteration_limit)?;
        self.stats.lp_solves += 1;
        self.stats.lp_iterations += relaxation.iterations;

        if relaxation.status == LpStatus::Infeasible {
            self.tree.set_status(number, NodeStatus::Infeasible);
            tracing::debug!("Node {} infeasible", number);
            return Ok(None);
        }
        if self.is_cut_off(relaxation.objective) {
            self.tree.set_status(number, NodeStatus::Pruned);
            tracing::debug!("Node {} pruned by LP bound {}", number, relaxation.objective);
            return Ok(None);
        }

        let tolerance = self.config.feasibility_tolerance;
        let mut candidates: Vec<Candidate> = (0..self.n_vars())
            .filter(|&j| fixings[j].is_none() && !is_integral(relaxation.values[j], tolerance))
            .map(|j| Candidate {
                var: j,
                value: relaxation.values[j],
            })
            .collect();

        if candidates.is_empty() {
            let values: Vec<f64> = relaxation.values.iter().map(|v| v.round()).collect();
            if self.problem.is_feasible(&values, tolerance) {
                self.tree
                    .set_bounds(number, relaxation.objective.max(lowerbound), relaxation.objective);
                self.try_incumbent(values, "LP");
                self.tree.set_status(number, NodeStatus::Feasible);
                return Ok(None);
            }
            // Near-integral values whose rounding breaks a row stay branchable.
            candidates = (0..self.n_vars())
                .filter(|&j| fixings[j].is_none() && relaxation.values[j] != values[j])
                .map(|j| Candidate {
                    var: j,
                    value: relaxation.values[j],
                })
                .collect();
            if candidates.is_empty() {
                return Err(Error::Solver(format!(
                    "LP point of node {number} is integral but violates a row"
                )));
            }
            tracing::debug!(
                "Node {} rounds to an infeasible point; {} near-integral candidates",
                number,
                candidates.len()
            );
        }
        let estimate = relaxation.objective
            + candidates
                .iter()
                .map(|c| c.fractionality() * self.lp.objective[c.var].abs())
                .sum::<f64>();
        self.tree
            .set_bounds(number, relaxation.objective.max(lowerbound), estimate);

        if self.config.primal_heuristic {
            let rounded = heuristics::round_down(&relaxation.values, tolerance);
            self.try_incumbent(rounded, "rounding");
            if self.is_cut_off(relaxation.objective) {
                self.tree.set_status(number, NodeStatus::Pruned);
                return Ok(None);
            }
        }

        self.pseudo_candidates = (0..self.n_vars()).filter(|&j| fixings[j].is_none()).collect();
        self.lp_candidates = candidates;

        if self.reverse.contains(&CallbackType::Heuristic) {
            self.pending = Some(Pending::Heuristic(number));
            return Ok(Some(Call::Heuristic { node: number }));
        }
        self.branch_or_call(number)
    }

    /// Resumes a fractional node after the heuristic call.
    fn finish_fractional(&mut self, number: NodeNumber) -> Result<Option<Call>> {
        let lowerbound = self.tree.node(number).map_or(f64::NEG_INFINITY, Node::lowerbound);
        if self.is_cut_off(lowerbound) {
            self.tree.set_status(number, NodeStatus::Pruned);
            tracing::debug!("Node {} pruned by supplied solution", number);
            return Ok(None);
        }
        self.branch_or_call(number)
    }

    /// Branches with the default rule, or hands the choice out.
    fn branch_or_call(&mut self, number: NodeNumber) -> Result<Option<Call>> {
        if self.reverse.contains(&CallbackType::Branchrule) {
            self.pending = Some(Pending::Branch(number));
            return Ok(Some(Call::Branchrule { node: number }));
        }
        let var = self.default_candidate()?;
        self.branch(number, var);
        Ok(None)
    }

    fn branch(&mut self, number: NodeNumber, var: VarId) {
        let (down, up) = self.tree.branch(number, var);
        self.stats.branchings += 1;
        tracing::debug!("Branched node {} on x{} into {} and {}", number, var, down, up);
    }

    fn is_cut_off(&self, bound: f64) -> bool {
        self.incumbent
            .as_ref()
            .is_some_and(|inc| bound >= inc.objective - BOUND_EPS)
    }

    fn try_incumbent(&mut self, values: Vec<f64>, source: &str) {
        let objective: f64 = values
            .iter()
            .zip(&self.lp.objective)
            .map(|(x, c)| x * c)
            .sum();
        if self.is_cut_off(objective) {
            return;
        }
        if !self.problem.is_feasible(&values, self.config.feasibility_tolerance) {
            tracing::debug!("Rejected infeasible {} solution", source);
            return;
        }
        self.stats.incumbents += 1;
        tracing::info!(
            "New incumbent from {} with objective {}",
            source,
            self.to_problem_sense(objective)
        );
        self.incumbent = Some(Incumbent { values, objective });
        let pruned = self.tree.prune(objective - BOUND_EPS);
        if pruned > 0 {
            tracing::debug!("Pruned {} open nodes", pruned);
        }
    }

    fn finish(&mut self, status: SolveStatus) {
        self.stage = Stage::Solved;
        self.status = status;
        self.pending = None;
        tracing::info!(
            "Finished {} with status {:?} after {} nodes",
            self.problem.name,
            status,
            self.stats.nodes
        );
    }

    fn to_problem_sense(&self, value: f64) -> f64 {
        match self.problem.sense {
            Sense::Minimize => value,
            Sense::Maximize => -value,
        }
    }

    /// Returns the current focus node, if any.
    pub fn focus_node(&self) -> Option<&Node> {
        self.focus.and_then(|n| self.tree.node(n))
    }

    /// Returns a node by number.
    pub fn node(&self, number: NodeNumber) -> Option<&Node> {
        self.tree.node(number)
    }

    /// Fractional unfixed variables at the focus node.
    pub fn lp_candidates(&self) -> &[Candidate] {
        &self.lp_candidates
    }

    /// Unfixed variables at the focus node.
    pub fn pseudo_candidates(&self) -> &[VarId] {
        &self.pseudo_candidates
    }

    /// Open nodes classified relative to the focus node.
    pub fn open_nodes(&self) -> OpenNodes {
        self.tree.partition(self.focus)
    }

    /// Returns whether `number` is an open node.
    pub fn is_open(&self, number: NodeNumber) -> bool {
        self.tree.is_open(number)
    }

    /// Number of open nodes.
    pub fn n_nodes_left(&self) -> usize {
        self.tree.n_open()
    }

    /// Best solution objective in the problem's sense.
    pub fn primal_bound(&self) -> Option<f64> {
        self.incumbent
            .as_ref()
            .map(|inc| self.to_problem_sense(inc.objective))
    }

    /// Best proven bound in the problem's sense.
    ///
    /// Infinite (in the improving direction) while no bound is known, or
    /// when the problem is proven infeasible.
    pub fn dual_bound(&self) -> f64 {
        let mut bound = self.tree.lowest_open_bound().unwrap_or(f64::INFINITY);
        if let Some(Pending::Branch(node) | Pending::Heuristic(node)) = self.pending {
            if let Some(node) = self.tree.node(node) {
                bound = bound.min(node.lowerbound());
            }
        }
        if let Some(inc) = &self.incumbent {
            bound = bound.min(inc.objective);
        }
        if self.stage == Stage::Problem || self.stage == Stage::Init {
            bound = f64::NEG_INFINITY;
        }
        self.to_problem_sense(bound)
    }

    /// Best solution found so far.
    pub fn best_solution(&self) -> Option<&[f64]> {
        self.incumbent.as_ref().map(|inc| inc.values.as_slice())
    }

    /// Returns solver statistics.
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }
}
