//! Seeded instance generators.

use crate::problem::{PackingProblem, Sense};
use arbor_base::XorShift64;
use serde::{Deserialize, Serialize};

/// A reseedable source of packing problems.
pub trait InstanceGenerator {
    /// Generates the next instance.
    fn generate(&mut self) -> PackingProblem;

    /// Resets the random state.
    fn seed(&mut self, seed: u64);
}

/// Parameters of a multiple knapsack instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleKnapsackParams {
    /// Number of items.
    pub n_items: usize,
    /// Number of knapsacks.
    pub n_knapsacks: usize,
    /// Inclusive item weight range.
    pub weight_range: (u64, u64),
    /// Inclusive item value range.
    pub value_range: (u64, u64),
    /// Each capacity is drawn in this fraction range of `total weight / n_knapsacks`.
    /// Negative draws give a zero capacity.
    pub capacity_ratio: (f64, f64),
}

impl Default for MultipleKnapsackParams {
    fn default() -> Self {
        Self {
            n_items: 12,
            n_knapsacks: 2,
            weight_range: (10, 100),
            value_range: (10, 100),
            capacity_ratio: (0.4, 0.6),
        }
    }
}

/// Generates multiple knapsack instances.
///
/// Variable `i * n_knapsacks + k` assigns item `i` to knapsack `k`. There is
/// one capacity row per knapsack followed by one "at most once" row per item.
#[derive(Debug, Clone)]
pub struct MultipleKnapsackGenerator {
    params: MultipleKnapsackParams,
    rng: XorShift64,
    generated: u64,
}

impl MultipleKnapsackGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(params: MultipleKnapsackParams, seed: u64) -> Self {
        Self {
            params,
            rng: XorShift64::new(seed),
            generated: 0,
        }
    }

    /// Returns the generator parameters.
    pub fn params(&self) -> &MultipleKnapsackParams {
        &self.params
    }
}

impl InstanceGenerator for MultipleKnapsackGenerator {
    fn generate(&mut self) -> PackingProblem {
        let p = &self.params;
        let weights: Vec<f64> = (0..p.n_items)
            .map(|_| self.rng.next_in_range(p.weight_range.0, p.weight_range.1) as f64)
            .collect();
        let values: Vec<f64> = (0..p.n_items)
            .map(|_| self.rng.next_in_range(p.value_range.0, p.value_range.1) as f64)
            .collect();
        let total: f64 = weights.iter().sum();
        let share = total / p.n_knapsacks.max(1) as f64;

        let mut problem = PackingProblem::new(
            format!("knapsack-{}x{}-{}", p.n_items, p.n_knapsacks, self.generated),
            Sense::Maximize,
        );
        for (i, &value) in values.iter().enumerate() {
            for k in 0..p.n_knapsacks {
                problem.add_variable(Some(format!("x_{i}_{k}")), value);
            }
        }
        for k in 0..p.n_knapsacks {
            let (lo, hi) = p.capacity_ratio;
            let ratio = lo + (hi - lo) * self.rng.next_f64();
            let capacity = (share * ratio).floor().max(0.0);
            let coefs = weights
                .iter()
                .enumerate()
                .map(|(i, &w)| (i * p.n_knapsacks + k, w));
            problem.add_row(Some(format!("capacity_{k}")), coefs, capacity);
        }
        for i in 0..p.n_items {
            let coefs = (0..p.n_knapsacks).map(|k| (i * p.n_knapsacks + k, 1.0));
            problem.add_row(Some(format!("once_{i}")), coefs, 1.0);
        }

        self.generated += 1;
        tracing::debug!(
            "Generated {} ({} vars, {} rows)",
            problem.name,
            problem.num_vars(),
            problem.num_rows()
        );
        problem
    }

    fn seed(&mut self, seed: u64) {
        self.rng = XorShift64::new(seed);
        self.generated = 0;
    }
}

impl Iterator for MultipleKnapsackGenerator {
    type Item = PackingProblem;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }
}

/// Parameters of an independent set instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndependentSetParams {
    /// Number of graph vertices.
    pub n_nodes: usize,
    /// Probability that any pair of vertices is joined by an edge.
    pub edge_probability: f64,
}

impl Default for IndependentSetParams {
    fn default() -> Self {
        Self {
            n_nodes: 15,
            edge_probability: 0.3,
        }
    }
}

/// Generates maximum independent set instances on Erdős–Rényi graphs.
///
/// One row `x_u + x_v <= 1` per edge.
#[derive(Debug, Clone)]
pub struct IndependentSetGenerator {
    params: IndependentSetParams,
    rng: XorShift64,
    generated: u64,
}

impl IndependentSetGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(params: IndependentSetParams, seed: u64) -> Self {
        Self {
            params,
            rng: XorShift64::new(seed),
            generated: 0,
        }
    }
}

impl InstanceGenerator for IndependentSetGenerator {
    fn generate(&mut self) -> PackingProblem {
        let n = self.params.n_nodes;
        let mut problem = PackingProblem::new(
            format!("indset-{}-{}", n, self.generated),
            Sense::Maximize,
        );
        for v in 0..n {
            problem.add_variable(Some(format!("v{v}")), 1.0);
        }
        for u in 0..n {
            for v in (u + 1)..n {
                if self.rng.next_f64() < self.params.edge_probability {
                    problem.add_row(Some(format!("edge_{u}_{v}")), [(u, 1.0), (v, 1.0)], 1.0);
                }
            }
        }

        self.generated += 1;
        tracing::debug!("Generated {} ({} edges)", problem.name, problem.num_rows());
        problem
    }

    fn seed(&mut self, seed: u64) {
        self.rng = XorShift64::new(seed);
        self.generated = 0;
    }
}

impl Iterator for IndependentSetGenerator {
    type Item = PackingProblem;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }
}
