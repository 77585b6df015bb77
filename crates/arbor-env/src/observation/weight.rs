//! Per-variable weight.

use super::ObservationFunction;
use crate::model::Model;
use arbor_base::Stage;

/// Largest coefficient of each variable over all rows.
///
/// Variables that appear in no row get 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Weight;

impl ObservationFunction for Weight {
    type Observation = Option<Vec<f64>>;

    fn extract(&mut self, model: &Model, done: bool) -> Self::Observation {
        if done || model.stage() != Stage::Solving {
            return None;
        }
        let problem = model.problem();
        let mut weight = vec![0.0_f64; problem.num_vars()];
        for row in &problem.rows {
            for &(var, coef) in &row.coefs {
                weight[var] = weight[var].max(coef);
            }
        }
        Some(weight)
    }
}
