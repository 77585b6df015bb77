//! Solver model handed to environments.

use arbor_base::{Result, Stage};
use arbor_bnb::{SolveStatus, Solver, SolverConfig, SolverStats};
use arbor_format::PackingProblem;
use std::path::Path;

/// A problem instance together with its solver state.
///
/// Cloning copies the original problem and configuration into a fresh model
/// in [`Stage::Problem`], whatever the stage of the source.
#[derive(Debug, Default)]
pub struct Model {
    solver: Solver,
}

impl Model {
    /// Creates a model with default solver configuration.
    pub fn from_problem(problem: PackingProblem) -> Result<Self> {
        Ok(Self {
            solver: Solver::new(problem)?,
        })
    }

    /// Creates a model with custom solver configuration.
    pub fn with_config(problem: PackingProblem, config: SolverConfig) -> Result<Self> {
        Ok(Self {
            solver: Solver::with_config(problem, config)?,
        })
    }

    /// Reads a JSON problem file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_problem(PackingProblem::from_file(path)?)
    }

    /// Returns the current stage.
    pub fn stage(&self) -> Stage {
        self.solver.stage()
    }

    /// Returns the problem.
    pub fn problem(&self) -> &PackingProblem {
        self.solver.problem()
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        self.solver.config()
    }

    /// Replaces the solver configuration. Only allowed before solving.
    pub fn set_config(&mut self, config: SolverConfig) -> Result<()> {
        self.solver.set_config(config)
    }

    /// Solves to completion with the default rules.
    pub fn solve(&mut self) -> Result<SolveStatus> {
        self.solver.solve()
    }

    /// Returns the solve status.
    pub fn status(&self) -> SolveStatus {
        self.solver.status()
    }

    /// Returns whether solving finished.
    pub fn is_solved(&self) -> bool {
        self.stage() == Stage::Solved
    }

    /// Best solution objective in the problem's sense.
    pub fn primal_bound(&self) -> Option<f64> {
        self.solver.primal_bound()
    }

    /// Best proven bound in the problem's sense.
    pub fn dual_bound(&self) -> f64 {
        self.solver.dual_bound()
    }

    /// Best solution found so far.
    pub fn best_solution(&self) -> Option<&[f64]> {
        self.solver.best_solution()
    }

    /// Returns solver statistics.
    pub fn stats(&self) -> &SolverStats {
        self.solver.stats()
    }

    /// Returns the underlying solver.
    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Returns the underlying solver mutably.
    pub fn solver_mut(&mut self) -> &mut Solver {
        &mut self.solver
    }
}

impl Clone for Model {
    fn clone(&self) -> Self {
        Self {
            solver: self.solver.copy_orig(),
        }
    }
}

impl From<Solver> for Model {
    fn from(solver: Solver) -> Self {
        Self { solver }
    }
}
