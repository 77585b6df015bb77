//! Primal heuristic environment.

use crate::dynamics::HeuristicDynamics;
use crate::environment::Environment;
use crate::information;
use crate::observation::Nothing;
use crate::reward::IsDone;

/// Environment whose steps may supply primal solutions.
pub type Env<O = Nothing, R = IsDone, I = information::Nothing> =
    Environment<HeuristicDynamics, O, R, I>;

impl Env {
    /// No observation, `IsDone` reward and no information.
    pub fn make_dummy() -> Self {
        Environment::new(HeuristicDynamics, Nothing, IsDone, information::Nothing)
    }
}
