//! Packing problem JSON format.
//!
//! A packing problem is a binary program over `x ∈ {0, 1}^n` with rows
//! `sum_j a_ij x_j <= b_i` where every `a_ij` and `b_i` is non-negative.
//! Rounding any feasible point down keeps it feasible, which the solver
//! relies on for its relaxations and primal heuristic.

use arbor_base::{Error, Result, VarId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    #[default]
    Maximize,
    Minimize,
}

/// A binary variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Objective coefficient in the problem's own sense.
    pub objective: f64,
}

/// A `<=` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sparse `(variable, coefficient)` entries.
    pub coefs: Vec<(VarId, f64)>,
    /// Right-hand side.
    pub rhs: f64,
}

/// The packing problem document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingProblem {
    /// Instance name.
    #[serde(default)]
    pub name: String,
    /// Optimization direction.
    #[serde(default)]
    pub sense: Sense,
    /// Variable definitions, indexed by `VarId`.
    pub variables: Vec<VariableDef>,
    /// Constraint rows.
    pub rows: Vec<Row>,
}

impl PackingProblem {
    /// Creates an empty problem.
    #[must_use]
    pub fn new(name: impl Into<String>, sense: Sense) -> Self {
        Self {
            name: name.into(),
            sense,
            variables: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Builds a single 0-1 knapsack: maximize `values·x` with `weights·x <= capacity`.
    pub fn knapsack(values: &[f64], weights: &[f64], capacity: f64) -> Result<Self> {
        if values.len() != weights.len() {
            return Err(Error::InvalidProblem(format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        let mut problem = Self::new("knapsack", Sense::Maximize);
        for &value in values {
            problem.add_variable(None, value);
        }
        problem.add_row(
            Some("capacity".to_string()),
            weights.iter().copied().enumerate().filter(|&(_, w)| w != 0.0),
            capacity,
        );
        problem.validate()?;
        Ok(problem)
    }

    /// Appends a variable and returns its id.
    pub fn add_variable(&mut self, name: Option<String>, objective: f64) -> VarId {
        self.variables.push(VariableDef { name, objective });
        self.variables.len() - 1
    }

    /// Appends a row and returns its index.
    pub fn add_row(
        &mut self,
        name: Option<String>,
        coefs: impl IntoIterator<Item = (VarId, f64)>,
        rhs: f64,
    ) -> usize {
        self.rows.push(Row {
            name,
            coefs: coefs.into_iter().collect(),
            rhs,
        });
        self.rows.len() - 1
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Checks that the problem is in packing form.
    pub fn validate(&self) -> Result<()> {
        for (j, var) in self.variables.iter().enumerate() {
            if !var.objective.is_finite() {
                return Err(Error::InvalidProblem(format!(
                    "variable {} has non-finite objective {}",
                    self.variable_label(j),
                    var.objective
                )));
            }
        }
        for (i, row) in self.rows.iter().enumerate() {
            let label = row.name.clone().unwrap_or_else(|| format!("#{i}"));
            if !row.rhs.is_finite() || row.rhs < 0.0 {
                return Err(Error::InvalidProblem(format!(
                    "row {label} has invalid right-hand side {}",
                    row.rhs
                )));
            }
            let mut seen = HashSet::with_capacity(row.coefs.len());
            for &(var, coef) in &row.coefs {
                if var >= self.num_vars() {
                    return Err(Error::InvalidProblem(format!(
                        "row {label} references unknown variable {var}"
                    )));
                }
                if !seen.insert(var) {
                    return Err(Error::InvalidProblem(format!(
                        "row {label} references variable {var} twice"
                    )));
                }
                if !coef.is_finite() || coef < 0.0 {
                    return Err(Error::InvalidProblem(format!(
                        "row {label} has invalid coefficient {coef} for variable {var}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Iterates over `(row index, coefficient)` for every row containing `var`.
    pub fn column(&self, var: VarId) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows.iter().enumerate().filter_map(move |(i, row)| {
            row.coefs
                .iter()
                .find(|&&(v, _)| v == var)
                .map(|&(_, coef)| (i, coef))
        })
    }

    /// Objective coefficients of the equivalent minimization problem.
    #[must_use]
    pub fn minimization_objective(&self) -> Vec<f64> {
        let sign = match self.sense {
            Sense::Maximize => -1.0,
            Sense::Minimize => 1.0,
        };
        self.variables.iter().map(|v| sign * v.objective).collect()
    }

    /// Objective value of `x` in the problem's own sense.
    #[must_use]
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(x)
            .map(|(var, &value)| var.objective * value)
            .sum()
    }

    /// Whether `x` satisfies every row within `tolerance` and is binary.
    #[must_use]
    pub fn is_feasible(&self, x: &[f64], tolerance: f64) -> bool {
        if x.len() != self.num_vars() {
            return false;
        }
        let binary = x
            .iter()
            .all(|&v| v.abs() <= tolerance || (v - 1.0).abs() <= tolerance);
        binary
            && self.rows.iter().all(|row| {
                let activity: f64 = row.coefs.iter().map(|&(j, a)| a * x[j]).sum();
                activity <= row.rhs + tolerance
            })
    }

    /// Parses from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let problem: Self = serde_json::from_str(json)?;
        problem.validate()?;
        Ok(problem)
    }

    /// Serializes to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses from JSON reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let problem: Self = serde_json::from_reader(reader)?;
        problem.validate()?;
        Ok(problem)
    }

    /// Writes to JSON writer.
    pub fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<()> {
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }

    /// Reads a JSON problem file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Reading problem from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Writes a JSON problem file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.to_writer(std::io::BufWriter::new(file))
    }

    fn variable_label(&self, var: VarId) -> String {
        self.variables[var]
            .name
            .clone()
            .unwrap_or_else(|| format!("x{var}"))
    }
}
