//! Node selection environment.

use crate::dynamics::NodeselDynamics;
use crate::environment::Environment;
use crate::information;
use crate::observation::Nothing;
use crate::reward::IsDone;

/// Environment whose steps choose the next node to process.
pub type Env<O = Nothing, R = IsDone, I = information::Nothing> =
    Environment<NodeselDynamics, O, R, I>;

impl Env {
    /// Node selection with no observation, `IsDone` reward and no information.
    pub fn make_dummy() -> Self {
        Environment::new(NodeselDynamics, Nothing, IsDone, information::Nothing)
    }
}
