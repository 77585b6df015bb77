//! Generic environment.

use crate::dynamics::Dynamics;
use crate::information::InformationFunction;
use crate::model::Model;
use crate::observation::ObservationFunction;
use crate::reward::RewardFunction;
use arbor_base::{Error, Result, XorShift64};

/// Seed used until [`Environment::seed`] is called.
const DEFAULT_SEED: u64 = 0x5eed;

/// An episodic environment over one model at a time.
///
/// `reset` takes ownership of a fresh model and runs it to the first
/// decision; `step` answers that decision and runs to the next one. A step
/// rejected with [`Error::InvalidAction`] leaves the episode where it was;
/// any other failure ends it and a new `reset` is required.
#[derive(Debug)]
pub struct Environment<D: Dynamics, O, R, I> {
    dynamics: D,
    observation_function: O,
    reward_function: R,
    information_function: I,
    model: Option<Model>,
    action_set: D::ActionSet,
    rng: XorShift64,
    can_transition: bool,
}

impl<D, O, R, I> Environment<D, O, R, I>
where
    D: Dynamics,
    O: ObservationFunction,
    R: RewardFunction,
    I: InformationFunction,
{
    /// Creates an environment.
    pub fn new(
        dynamics: D,
        observation_function: O,
        reward_function: R,
        information_function: I,
    ) -> Self {
        Self {
            dynamics,
            observation_function,
            reward_function,
            information_function,
            model: None,
            action_set: D::ActionSet::default(),
            rng: XorShift64::new(DEFAULT_SEED),
            can_transition: false,
        }
    }

    /// Reseeds the generator that seeds every model passed to `reset`.
    pub fn seed(&mut self, seed: u64) {
        self.rng = XorShift64::new(seed);
    }

    /// Starts a new episode on `model`.
    ///
    /// Returns the first observation and whether the episode is already over.
    pub fn reset(&mut self, model: Model) -> Result<(O::Observation, bool)> {
        self.can_transition = false;
        self.model = None;
        self.action_set = D::ActionSet::default();

        let mut model = model;
        self.dynamics.set_dynamics_random_state(&mut model, &mut self.rng)?;
        self.observation_function.before_reset(&model);
        self.reward_function.before_reset(&model);
        self.information_function.before_reset(&model);

        let (done, action_set) = self.dynamics.reset_dynamics(&mut model)?;
        let observation = self.observation_function.extract(&model, done);
        tracing::debug!("Reset on {} (done: {})", model.problem().name, done);

        self.model = Some(model);
        self.action_set = action_set;
        self.can_transition = !done;
        Ok((observation, done))
    }

    /// Applies `action` and advances to the next decision.
    ///
    /// Returns the observation, reward, done flag and information.
    pub fn step(
        &mut self,
        action: D::Action,
    ) -> Result<(O::Observation, f64, bool, I::Information)> {
        if !self.can_transition {
            return Err(Error::Environment("environment needs to be reset".to_string()));
        }
        let model = self
            .model
            .as_mut()
            .ok_or_else(|| Error::Environment("no model loaded".to_string()))?;

        let (done, action_set) = match self.dynamics.step_dynamics(model, action) {
            Ok(outcome) => outcome,
            Err(Error::InvalidAction(msg)) => {
                tracing::warn!("Rejected action: {}", msg);
                return Err(Error::InvalidAction(msg));
            }
            Err(err) => {
                self.can_transition = false;
                return Err(err);
            }
        };

        let observation = self.observation_function.extract(model, done);
        let reward = self.reward_function.extract(model, done);
        let information = self.information_function.extract(model, done);
        if done {
            tracing::debug!(
                "Episode finished with status {:?} after {} nodes",
                model.status(),
                model.stats().nodes
            );
        }

        self.action_set = action_set;
        self.can_transition = !done;
        Ok((observation, reward, done, information))
    }

    /// Valid actions for the next step.
    pub fn action_set(&self) -> &D::ActionSet {
        &self.action_set
    }

    /// The model of the current episode.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Whether `step` may be called.
    pub fn can_transition(&self) -> bool {
        self.can_transition
    }

    /// Returns the dynamics.
    pub fn dynamics(&self) -> &D {
        &self.dynamics
    }

    /// Returns the observation function.
    pub fn observation_function(&self) -> &O {
        &self.observation_function
    }

    /// Returns the reward function.
    pub fn reward_function(&self) -> &R {
        &self.reward_function
    }
}
