//! LP relaxation of a packing problem.
//!
//! Solves `min c·x` subject to `A x <= b`, `0 <= x <= 1` with some variables
//! fixed to 0 or 1. Because `A >= 0` and `b >= 0`, the slack basis is primal
//! feasible whenever the fixings leave every right-hand side non-negative, so
//! a single-phase primal simplex is enough. Entering and leaving variables
//! follow Bland's rule.

use arbor_base::{Error, Result, VarId};
use arbor_format::PackingProblem;

/// Pivot and ratio tolerance.
const EPS: f64 = 1e-9;

/// Column-and-row view of a packing problem in minimization form.
#[derive(Debug, Clone, Default)]
pub struct LpData {
    /// Minimization objective.
    pub objective: Vec<f64>,
    /// Row-major sparse coefficients.
    pub rows: Vec<Vec<(VarId, f64)>>,
    /// Column-major sparse coefficients.
    pub columns: Vec<Vec<(usize, f64)>>,
    /// Right-hand sides.
    pub rhs: Vec<f64>,
}

impl LpData {
    /// Builds the relaxation data of a validated problem.
    #[must_use]
    pub fn from_problem(problem: &PackingProblem) -> Self {
        let mut columns = vec![Vec::new(); problem.num_vars()];
        for (i, row) in problem.rows.iter().enumerate() {
            for &(j, a) in &row.coefs {
                columns[j].push((i, a));
            }
        }
        Self {
            objective: problem.minimization_objective(),
            rows: problem.rows.iter().map(|r| r.coefs.clone()).collect(),
            columns,
            rhs: problem.rows.iter().map(|r| r.rhs).collect(),
        }
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }
}

/// Outcome of an LP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
}

/// Solution of an LP relaxation.
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Termination status.
    pub status: LpStatus,
    /// Objective value (minimization sense). `+inf` when infeasible.
    pub objective: f64,
    /// Column values, fixed columns included. Empty when infeasible.
    pub values: Vec<f64>,
    /// Simplex pivots performed.
    pub iterations: u64,
}

impl LpSolution {
    fn infeasible() -> Self {
        Self {
            status: LpStatus::Infeasible,
            objective: f64::INFINITY,
            values: Vec::new(),
            iterations: 0,
        }
    }
}

/// Solves the relaxation under `fixings` (`None` = free, `Some(v)` = fixed to `v`).
pub fn solve(data: &LpData, fixings: &[Option<bool>], iteration_limit: u64) -> Result<LpSolution> {
    let n = data.num_vars();
    if fixings.len() != n {
        return Err(Error::Internal(format!(
            "{} fixings for {} columns",
            fixings.len(),
            n
        )));
    }

    let mut rhs = data.rhs.clone();
    for (j, fixing) in fixings.iter().enumerate() {
        if *fixing == Some(true) {
            for &(i, a) in &data.columns[j] {
                rhs[i] -= a;
            }
        }
    }
    if rhs.iter().any(|&b| b < -EPS) {
        return Ok(LpSolution::infeasible());
    }

    let free: Vec<VarId> = (0..n).filter(|&j| fixings[j].is_none()).collect();
    let mut tableau = Tableau::new(data, &free, &rhs);
    let iterations = tableau.optimize(iteration_limit)?;

    let mut values: Vec<f64> = fixings
        .iter()
        .map(|f| if *f == Some(true) { 1.0 } else { 0.0 })
        .collect();
    for (c, value) in tableau.structural_values() {
        values[free[c]] = snap(value);
    }
    let objective = values
        .iter()
        .zip(&data.objective)
        .map(|(x, c)| x * c)
        .sum();

    Ok(LpSolution {
        status: LpStatus::Optimal,
        objective,
        values,
        iterations,
    })
}

/// Clamps to `[0, 1]` and removes pivoting noise around integers.
fn snap(value: f64) -> f64 {
    let value = value.clamp(0.0, 1.0);
    if (value - value.round()).abs() < EPS {
        value.round()
    } else {
        value
    }
}

/// Dense simplex tableau.
///
/// Rows are the packing rows followed by one `x_c <= 1` row per free column.
/// Columns are the free structurals, then one slack per row, then the rhs.
struct Tableau {
    cells: Vec<Vec<f64>>,
    reduced_costs: Vec<f64>,
    basis: Vec<usize>,
    n_structural: usize,
}

impl Tableau {
    fn new(data: &LpData, free: &[VarId], rhs: &[f64]) -> Self {
        let m = data.rows.len();
        let k = free.len();
        let n_rows = m + k;
        let n_cols = k + n_rows;

        let mut position = vec![None; data.num_vars()];
        for (c, &j) in free.iter().enumerate() {
            position[j] = Some(c);
        }

        let mut cells = vec![vec![0.0; n_cols + 1]; n_rows];
        for (i, row) in data.rows.iter().enumerate() {
            for &(j, a) in row {
                if let Some(c) = position[j] {
                    cells[i][c] = a;
                }
            }
            cells[i][k + i] = 1.0;
            cells[i][n_cols] = rhs[i].max(0.0);
        }
        for c in 0..k {
            let r = m + c;
            cells[r][c] = 1.0;
            cells[r][k + r] = 1.0;
            cells[r][n_cols] = 1.0;
        }

        let mut reduced_costs = vec![0.0; n_cols];
        for (c, &j) in free.iter().enumerate() {
            reduced_costs[c] = data.objective[j];
        }

        Self {
            cells,
            reduced_costs,
            basis: (k..n_cols).collect(),
            n_structural: k,
        }
    }

    fn rhs_col(&self) -> usize {
        self.reduced_costs.len()
    }

    fn optimize(&mut self, iteration_limit: u64) -> Result<u64> {
        let mut iterations = 0;
        while let Some(entering) = self.entering() {
            let leaving = self.leaving(entering).ok_or_else(|| {
                Error::Solver(format!("relaxation unbounded along column {entering}"))
            })?;
            self.pivot(leaving, entering);
            iterations += 1;
            if iterations > iteration_limit {
                return Err(Error::Solver(format!(
                    "simplex exceeded {iteration_limit} iterations"
                )));
            }
        }
        Ok(iterations)
    }

    fn entering(&self) -> Option<usize> {
        self.reduced_costs.iter().position(|&d| d < -EPS)
    }

    fn leaving(&self, entering: usize) -> Option<usize> {
        let rhs = self.rhs_col();
        let mut best: Option<(usize, f64)> = None;
        for (r, row) in self.cells.iter().enumerate() {
            let a = row[entering];
            if a <= EPS {
                continue;
            }
            let ratio = row[rhs] / a;
            best = match best {
                None => Some((r, ratio)),
                Some((b, best_ratio)) => {
                    if ratio < best_ratio - EPS
                        || (ratio <= best_ratio + EPS && self.basis[r] < self.basis[b])
                    {
                        Some((r, ratio))
                    } else {
                        Some((b, best_ratio))
                    }
                }
            };
        }
        best.map(|(r, _)| r)
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let pivot = self.cells[row][col];
        for value in &mut self.cells[row] {
            *value /= pivot;
        }
        let pivot_row = self.cells[row].clone();
        for (r, cells) in self.cells.iter_mut().enumerate() {
            if r == row {
                continue;
            }
            let factor = cells[col];
            if factor.abs() > 0.0 {
                for (value, p) in cells.iter_mut().zip(&pivot_row) {
                    *value -= factor * p;
                }
            }
        }
        let factor = self.reduced_costs[col];
        for (d, p) in self.reduced_costs.iter_mut().zip(&pivot_row) {
            *d -= factor * p;
        }
        self.basis[row] = col;
    }

    /// `(structural column, value)` for every basic structural.
    fn structural_values(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        let rhs = self.rhs_col();
        self.basis
            .iter()
            .zip(&self.cells)
            .filter(|(&c, _)| c < self.n_structural)
            .map(move |(&c, row)| (c, row[rhs]))
    }
}
