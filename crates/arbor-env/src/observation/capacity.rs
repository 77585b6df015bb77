//! Per-variable capacity.

use super::ObservationFunction;
use crate::model::Model;
use arbor_base::Stage;

/// Largest right-hand side among the rows each variable appears in.
///
/// Variables that appear in no row get 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capacity;

impl ObservationFunction for Capacity {
    type Observation = Option<Vec<f64>>;

    fn extract(&mut self, model: &Model, done: bool) -> Self::Observation {
        if done || model.stage() != Stage::Solving {
            return None;
        }
        let problem = model.problem();
        let mut capacity = vec![0.0_f64; problem.num_vars()];
        for row in &problem.rows {
            for &(var, _) in &row.coefs {
                capacity[var] = capacity[var].max(row.rhs);
            }
        }
        Some(capacity)
    }
}
