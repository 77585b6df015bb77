//! Run command: play environment episodes with a fixed policy.

use super::load_model;
use crate::config::CliConfig;
use arbor_base::{NodeNumber, XorShift64};
use arbor_env::information::Statistics;
use arbor_env::observation::FocusNode;
use arbor_env::reward::NNodes;
use arbor_env::{
    BranchingDynamics, Defaultable, Environment, HeuristicDynamics, Model, NodeselDynamics,
    OpenNodes, SolverStats, VarId,
};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Environment kind.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum EnvKind {
    /// Choose branching variables
    Branching,
    /// Choose the next node
    Nodesel,
    /// Supply primal solutions
    Heuristic,
}

/// How actions are picked.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum Policy {
    /// Let the solver decide
    Default,
    /// First candidate, or smallest open node
    #[default]
    First,
    /// Uniformly random action
    Random,
}

#[derive(Args)]
pub struct RunArgs {
    /// Input problem (JSON)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Environment to play
    #[arg(long, value_enum, default_value_t = EnvKind::Branching)]
    pub env: EnvKind,

    /// Number of episodes
    #[arg(short, long, default_value_t = 1)]
    pub episodes: usize,

    /// Action policy
    #[arg(long, value_enum, default_value_t)]
    pub policy: Policy,

    /// Seed for the environment and the random policy
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Branch on any unfixed variable instead of fractional ones
    #[arg(long)]
    pub pseudo_candidates: bool,

    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Summary of one episode.
#[derive(Debug)]
struct Episode {
    steps: usize,
    reward: f64,
    stats: SolverStats,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = CliConfig::load(args.config.as_deref())?;
    let model = load_model(&args.input, &config)?;
    let mut rng = XorShift64::new(args.seed);

    for episode in 0..args.episodes {
        let summary = match args.env {
            EnvKind::Branching => {
                branching_episode(&model, args.policy, args.pseudo_candidates, &mut rng)?
            }
            EnvKind::Nodesel => nodesel_episode(&model, args.policy, &mut rng)?,
            EnvKind::Heuristic => heuristic_episode(&model, args.policy, &mut rng)?,
        };
        println!(
            "episode {}: {} steps, {} nodes, reward {}",
            episode, summary.steps, summary.stats.nodes, summary.reward
        );
    }
    Ok(())
}

fn branching_episode(
    model: &Model,
    policy: Policy,
    pseudo_candidates: bool,
    rng: &mut XorShift64,
) -> anyhow::Result<Episode> {
    let mut env = Environment::new(
        BranchingDynamics::new(pseudo_candidates),
        FocusNode,
        NNodes::default(),
        Statistics,
    );
    env.seed(rng.next());

    let (mut obs, mut done) = env.reset(model.clone())?;
    let mut episode = Episode {
        steps: 0,
        reward: 0.0,
        stats: model.stats().clone(),
    };
    while !done {
        let n_candidates = env.action_set().as_ref().map_or(0, Vec::len);
        if let Some(node) = &obs {
            tracing::debug!(
                "Node {} at depth {}: {} candidates",
                node.number,
                node.depth,
                n_candidates
            );
        }
        let action = match policy {
            Policy::Default => Defaultable::Default,
            Policy::First => Defaultable::Value(0),
            Policy::Random if n_candidates > 0 => {
                Defaultable::Value(rng.next_below(n_candidates))
            }
            Policy::Random => Defaultable::Default,
        };
        let (next, reward, d, stats) = env.step(action)?;
        obs = next;
        done = d;
        episode.steps += 1;
        episode.reward += reward;
        episode.stats = stats;
    }
    Ok(episode)
}

fn nodesel_episode(model: &Model, policy: Policy, rng: &mut XorShift64) -> anyhow::Result<Episode> {
    let mut env = Environment::new(
        NodeselDynamics::new(),
        FocusNode,
        NNodes::default(),
        Statistics,
    );
    env.seed(rng.next());

    let (_obs, mut done) = env.reset(model.clone())?;
    let mut episode = Episode {
        steps: 0,
        reward: 0.0,
        stats: model.stats().clone(),
    };
    while !done {
        let action = match (policy, env.action_set()) {
            (Policy::Default, _) | (_, None) => Defaultable::Default,
            (Policy::First, Some(open)) => open
                .iter()
                .min()
                .map_or(Defaultable::Default, Defaultable::Value),
            (Policy::Random, Some(open)) => random_node(open, rng),
        };
        let (_obs, reward, d, stats) = env.step(action)?;
        done = d;
        episode.steps += 1;
        episode.reward += reward;
        episode.stats = stats;
    }
    Ok(episode)
}

fn random_node(open: &OpenNodes, rng: &mut XorShift64) -> Defaultable<NodeNumber> {
    if open.is_empty() {
        return Defaultable::Default;
    }
    let pick = rng.next_below(open.len());
    open.iter()
        .nth(pick)
        .map_or(Defaultable::Default, Defaultable::Value)
}

fn heuristic_episode(
    model: &Model,
    policy: Policy,
    rng: &mut XorShift64,
) -> anyhow::Result<Episode> {
    let mut env = Environment::new(HeuristicDynamics, FocusNode, NNodes::default(), Statistics);
    env.seed(rng.next());

    let (_obs, mut done) = env.reset(model.clone())?;
    let mut episode = Episode {
        steps: 0,
        reward: 0.0,
        stats: model.stats().clone(),
    };
    while !done {
        let action = match (policy, env.action_set(), env.model()) {
            (Policy::Default, _, _) | (_, None, _) | (_, _, None) => Defaultable::Default,
            (Policy::First, Some(free), Some(live)) => {
                Defaultable::Value(greedy_solution(live, free.iter().copied()))
            }
            (Policy::Random, Some(free), Some(live)) => {
                let mut order = free.clone();
                for i in (1..order.len()).rev() {
                    order.swap(i, rng.next_below(i + 1));
                }
                Defaultable::Value(greedy_solution(live, order))
            }
        };
        let (_obs, reward, d, stats) = env.step(action)?;
        done = d;
        episode.steps += 1;
        episode.reward += reward;
        episode.stats = stats;
    }
    Ok(episode)
}

/// Sets variables to 1 in `order` while every row stays satisfied.
fn greedy_solution(model: &Model, order: impl IntoIterator<Item = VarId>) -> Vec<f64> {
    let problem = model.problem();
    let tolerance = model.config().feasibility_tolerance;
    let mut solution = vec![0.0; problem.num_vars()];
    for var in order {
        solution[var] = 1.0;
        if !problem.is_feasible(&solution, tolerance) {
            solution[var] = 0.0;
        }
    }
    solution
}
