//! Branching environment.

use crate::dynamics::BranchingDynamics;
use crate::environment::Environment;
use crate::information;
use crate::observation::Nothing;
use crate::reward::IsDone;

/// Environment whose steps choose branching variables.
pub type Env<O = Nothing, R = IsDone, I = information::Nothing> =
    Environment<BranchingDynamics, O, R, I>;

impl Env {
    /// Branching on LP candidates with no observation, `IsDone` reward and no
    /// information.
    pub fn make_dummy() -> Self {
        Environment::new(
            BranchingDynamics::default(),
            Nothing,
            IsDone,
            information::Nothing,
        )
    }
}
