//! End-to-end tests for the primal heuristic environment.

use arbor_bnb::NodeStatus;
use arbor_env::reward::NNodes;
use arbor_env::{
    heuristic, information, observation, Defaultable, Environment, Error, HeuristicDynamics,
    Model, SolveStatus,
};
use arbor_format::PackingProblem;

/// Knapsack whose root relaxation is fractional (x2 = 0.25), optimum 16.
fn model() -> Model {
    let problem = PackingProblem::knapsack(&[10.0, 7.0, 6.0, 5.0], &[6.0, 5.0, 4.0, 3.0], 10.0)
        .expect("valid knapsack");
    Model::from_problem(problem).expect("valid model")
}

/// Letting the solver run on its own until the episode ends.
#[test]
fn test_heuristic_env() {
    let model = model();
    let mut env = heuristic::Env::make_dummy();
    for _ in 0..2 {
        let mut count = 0;
        let (_obs, mut done) = env.reset(model.clone()).expect("reset should succeed");
        while !done {
            let (_obs, _reward, d, _info) =
                env.step(Defaultable::Default).expect("step should succeed");
            done = d;
            count += 1;
        }
        assert!(count > 0);
        assert_eq!(env.model().map(|m| m.status()), Some(SolveStatus::Optimal));
    }
}

/// The action set holds every unfixed variable at the focus node.
#[test]
fn test_action_set_lists_unfixed_variables() {
    let mut env = heuristic::Env::make_dummy();
    let (_obs, done) = env.reset(model()).expect("reset");
    assert!(!done);
    assert_eq!(env.action_set().as_deref(), Some(&[0, 1, 2, 3][..]));
}

/// An optimal solution supplied at the root cuts off the x2 = 1 subtree.
#[test]
fn test_supplied_solution_prunes_nodes() {
    let mut env = Environment::new(
        HeuristicDynamics,
        observation::Nothing,
        NNodes::default(),
        information::Statistics,
    );
    env.reset(model()).expect("reset");
    // Rounding down the root relaxation already gives 15.
    assert_eq!(env.model().and_then(|m| m.primal_bound()), Some(15.0));

    let (_obs, _reward, mut done, stats) = env
        .step(Defaultable::Value(vec![1.0, 0.0, 1.0, 0.0]))
        .expect("feasible solution");
    assert_eq!(stats.incumbents, 2);
    assert_eq!(env.model().and_then(|m| m.primal_bound()), Some(16.0));
    while !done {
        done = env.step(Defaultable::Default).expect("step").2;
    }

    let model = env.model().expect("model kept after episode");
    assert_eq!(model.status(), SolveStatus::Optimal);
    assert_eq!(model.primal_bound(), Some(16.0));
    assert_eq!(model.stats().incumbents, 2);
    let up = model.solver().node(2).expect("up child exists");
    assert_eq!(up.status(), NodeStatus::Pruned);
}

/// Infeasible or malformed solutions are rejected without ending the episode.
#[test]
fn test_invalid_solution_keeps_episode() {
    let mut env = heuristic::Env::make_dummy();
    env.reset(model()).expect("reset");

    for solution in [vec![1.0; 4], vec![1.0, 0.0], vec![0.0, 0.0, 0.5, 0.0]] {
        let err = env.step(Defaultable::Value(solution)).unwrap_err();
        assert!(matches!(err, Error::InvalidAction(_)));
        assert!(env.can_transition());
    }
    assert_eq!(env.model().and_then(|m| m.primal_bound()), Some(15.0));

    env.step(Defaultable::Value(vec![1.0, 0.0, 1.0, 0.0]))
        .expect("valid solution");
    assert_eq!(env.model().and_then(|m| m.primal_bound()), Some(16.0));
}

/// A worse solution is accepted as an action but leaves the incumbent alone.
#[test]
fn test_worse_solution_keeps_incumbent() {
    let mut env = heuristic::Env::make_dummy();
    env.reset(model()).expect("reset");
    env.step(Defaultable::Value(vec![0.0; 4])).expect("feasible solution");
    let model = env.model().expect("model");
    assert_eq!(model.primal_bound(), Some(15.0));
    assert_eq!(model.stats().incumbents, 1);
}
