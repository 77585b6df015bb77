//! Integration tests for the branch-and-bound solver.

use arbor_base::{Error, Stage, XorShift64};
use arbor_bnb::{
    BranchingRule, Call, CallbackResult, CallbackType, NodeSelection, NodeStatus, SolveStatus,
    Solver, SolverConfig,
};
use arbor_format::generator::{IndependentSetParams, MultipleKnapsackParams};
use arbor_format::{
    IndependentSetGenerator, InstanceGenerator, MultipleKnapsackGenerator, PackingProblem, Sense,
};

// =============================================================================
// Helpers
// =============================================================================

fn small_knapsack() -> PackingProblem {
    PackingProblem::knapsack(&[10.0, 7.0, 6.0, 5.0], &[6.0, 5.0, 4.0, 3.0], 10.0).unwrap()
}

/// Optimal objective by enumeration, in the problem's sense.
fn brute_force(problem: &PackingProblem) -> f64 {
    let n = problem.num_vars();
    assert!(n <= 16, "enumeration only for small problems");
    let mut best: Option<f64> = None;
    for mask in 0u32..(1 << n) {
        let x: Vec<f64> = (0..n).map(|j| f64::from((mask >> j) & 1)).collect();
        if !problem.is_feasible(&x, 1e-9) {
            continue;
        }
        let value = problem.objective_value(&x);
        best = Some(match (best, problem.sense) {
            (None, _) => value,
            (Some(b), Sense::Maximize) => b.max(value),
            (Some(b), Sense::Minimize) => b.min(value),
        });
    }
    best.expect("packing problems always admit x = 0")
}

fn all_configs() -> Vec<SolverConfig> {
    let mut configs = Vec::new();
    for branching_rule in [
        BranchingRule::MostFractional,
        BranchingRule::FirstCandidate,
        BranchingRule::Random,
    ] {
        for node_selection in [
            NodeSelection::BestBound,
            NodeSelection::DepthFirst,
            NodeSelection::BestEstimate,
        ] {
            for primal_heuristic in [true, false] {
                configs.push(SolverConfig {
                    branching_rule,
                    node_selection,
                    primal_heuristic,
                    seed: 11,
                    ..Default::default()
                });
            }
        }
    }
    configs
}

fn assert_optimal(problem: &PackingProblem, config: SolverConfig) {
    let expected = brute_force(problem);
    let mut solver = Solver::with_config(problem.clone(), config.clone()).unwrap();
    let status = solver.solve().unwrap();
    assert_eq!(status, SolveStatus::Optimal, "config {config:?}");
    let primal = solver.primal_bound().unwrap();
    assert!((primal - expected).abs() < 1e-6, "{primal} != {expected} with {config:?}");
    assert!((solver.dual_bound() - expected).abs() < 1e-6);
    let x = solver.best_solution().unwrap();
    assert!(problem.is_feasible(x, 1e-9));
    assert_eq!(solver.stage(), Stage::Solved);
}

// =============================================================================
// Default-rule solving
// =============================================================================

#[test]
fn test_small_knapsack_all_rules() {
    let problem = small_knapsack();
    assert_eq!(brute_force(&problem), 16.0);
    for config in all_configs() {
        assert_optimal(&problem, config);
    }
}

#[test]
fn test_generated_multiple_knapsack() {
    let params = MultipleKnapsackParams {
        n_items: 6,
        n_knapsacks: 2,
        ..Default::default()
    };
    let mut generator = MultipleKnapsackGenerator::new(params, 2024);
    for _ in 0..3 {
        let problem = generator.generate();
        assert_optimal(&problem, SolverConfig::default());
        assert_optimal(
            &problem,
            SolverConfig {
                node_selection: NodeSelection::DepthFirst,
                primal_heuristic: false,
                ..Default::default()
            },
        );
    }
}

#[test]
fn test_generated_independent_set() {
    let params = IndependentSetParams {
        n_nodes: 10,
        edge_probability: 0.4,
    };
    let mut generator = IndependentSetGenerator::new(params, 5);
    for _ in 0..3 {
        let problem = generator.generate();
        assert_optimal(&problem, SolverConfig::default());
    }
}

#[test]
fn test_minimization_sense() {
    let mut problem = PackingProblem::new("min", Sense::Minimize);
    let a = problem.add_variable(None, -3.0);
    let b = problem.add_variable(None, -2.0);
    let c = problem.add_variable(None, 1.0);
    problem.add_row(None, [(a, 2.0), (b, 2.0), (c, 1.0)], 3.0);
    assert_eq!(brute_force(&problem), -3.0);
    assert_optimal(&problem, SolverConfig::default());
}

// =============================================================================
// Integrality tolerance
// =============================================================================

/// `max x0` with `1e6 x0 <= 999_999.5`: the LP gives x0 = 0.9999995, which is
/// integral within tolerance but rounds to an infeasible point.
#[test]
fn test_near_integral_lp_value_is_branched() {
    let mut problem = PackingProblem::new("near-integral", Sense::Maximize);
    let x = problem.add_variable(None, 1.0);
    problem.add_row(None, [(x, 1e6)], 999_999.5);

    let mut solver = Solver::new(problem.clone()).unwrap();
    assert_eq!(solver.solve().unwrap(), SolveStatus::Optimal);
    assert_eq!(solver.primal_bound().map(f64::abs), Some(0.0));
    assert_eq!(solver.best_solution(), Some(&[0.0][..]));
    assert!(solver.stats().branchings >= 1);
    for config in all_configs() {
        assert_optimal(&problem, config);
    }
}

/// Rounding error chains through both variables before the zero solution.
#[test]
fn test_near_integral_values_in_sequence() {
    let mut problem = PackingProblem::new("chain", Sense::Maximize);
    let a = problem.add_variable(None, 1.0);
    let b = problem.add_variable(None, 1.0);
    problem.add_row(None, [(a, 2e6), (b, 2e6)], 1_999_999.3);
    assert_eq!(brute_force(&problem), 0.0);
    for config in all_configs() {
        assert_optimal(&problem, config);
    }
}

/// Integer coefficients in `1e5..=1e6` with right-hand sides ending in `.5`,
/// so every binary point is at least 0.5 away from each row boundary.
fn large_coefficient_problem(seed: u64) -> PackingProblem {
    let mut rng = XorShift64::new(seed);
    let mut problem = PackingProblem::new(format!("large-{seed}"), Sense::Maximize);
    let n = 8;
    for _ in 0..n {
        problem.add_variable(None, rng.next_in_range(1, 50) as f64);
    }
    for _ in 0..2 {
        let coefs: Vec<(usize, f64)> = (0..n)
            .map(|j| (j, rng.next_in_range(100_000, 1_000_000) as f64))
            .collect();
        let total: f64 = coefs.iter().map(|&(_, a)| a).sum();
        problem.add_row(None, coefs, (total * 0.45).floor() + 0.5);
    }
    problem
}

#[test]
fn test_large_coefficients_match_brute_force() {
    for seed in 1..=6 {
        let problem = large_coefficient_problem(seed);
        problem.validate().unwrap();
        assert_optimal(&problem, SolverConfig::default());
        assert_optimal(
            &problem,
            SolverConfig {
                branching_rule: BranchingRule::FirstCandidate,
                node_selection: NodeSelection::DepthFirst,
                primal_heuristic: false,
                ..Default::default()
            },
        );
    }
}

#[test]
fn test_empty_problem() {
    let problem = PackingProblem::new("empty", Sense::Maximize);
    let mut solver = Solver::new(problem).unwrap();
    assert_eq!(solver.solve().unwrap(), SolveStatus::Optimal);
    assert_eq!(solver.primal_bound(), Some(0.0));
    assert_eq!(solver.stats().nodes, 1);
}

#[test]
fn test_node_limit() {
    let config = SolverConfig {
        node_limit: Some(1),
        ..Default::default()
    };
    let mut solver = Solver::with_config(small_knapsack(), config).unwrap();
    assert_eq!(solver.solve().unwrap(), SolveStatus::NodeLimit);
    assert_eq!(solver.stage(), Stage::Solved);
    assert_eq!(solver.stats().nodes, 1);
    assert_eq!(solver.n_nodes_left(), 2);
    // Root LP bound of 16.5 is still the best proven bound.
    assert!((solver.dual_bound() - 16.5).abs() < 1e-9);
}

#[test]
fn test_stats_are_counted() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    solver.solve().unwrap();
    let stats = solver.stats();
    assert!(stats.nodes >= 3);
    assert!(stats.branchings >= 1);
    assert!(stats.lp_iterations > 0);
    assert!(stats.lp_solves <= stats.nodes);
    assert!(stats.incumbents >= 1);
    assert!(stats.max_depth >= 1);
}

// =============================================================================
// Stage handling
// =============================================================================

#[test]
fn test_init_stage_cannot_solve() {
    let mut solver = Solver::default();
    assert_eq!(solver.stage(), Stage::Init);
    assert!(matches!(
        solver.solve(),
        Err(Error::InvalidStage { actual: Stage::Init, .. })
    ));
    assert_eq!(solver.copy_orig().stage(), Stage::Init);
}

#[test]
fn test_solve_twice_is_rejected() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    solver.solve().unwrap();
    assert!(matches!(solver.solve(), Err(Error::InvalidStage { .. })));
    assert!(matches!(
        solver.set_seed(3),
        Err(Error::InvalidStage { actual: Stage::Solved, .. })
    ));
}

#[test]
fn test_continue_without_pending_call() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::DidNotRun),
        Err(Error::InvalidStage { actual: Stage::Problem, .. })
    ));
}

#[test]
fn test_copy_orig_resets_solving_state() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    let call = solver.solve_iter(&[CallbackType::Branchrule]).unwrap();
    assert!(call.is_some());
    assert_eq!(solver.stage(), Stage::Solving);

    let mut copy = solver.copy_orig();
    assert_eq!(copy.stage(), Stage::Problem);
    assert_eq!(copy.stats().nodes, 0);
    assert_eq!(copy.solve().unwrap(), SolveStatus::Optimal);
    assert_eq!(copy.primal_bound(), Some(16.0));
}

// =============================================================================
// Reverse callbacks
// =============================================================================

fn drive_default(solver: &mut Solver, callbacks: &[CallbackType]) -> usize {
    let mut calls = 0;
    let mut call = solver.solve_iter(callbacks).unwrap();
    while let Some(c) = call {
        assert!(callbacks.contains(&c.callback_type()));
        calls += 1;
        call = solver.solve_iter_continue(CallbackResult::DidNotRun).unwrap();
    }
    calls
}

#[test]
fn test_did_not_run_matches_default_solve() {
    let problem = small_knapsack();
    for callbacks in [
        vec![CallbackType::Branchrule],
        vec![CallbackType::Nodesel],
        vec![CallbackType::Branchrule, CallbackType::Nodesel],
        vec![CallbackType::Heuristic],
        vec![
            CallbackType::Heuristic,
            CallbackType::Branchrule,
            CallbackType::Nodesel,
        ],
    ] {
        let mut solver = Solver::new(problem.clone()).unwrap();
        let calls = drive_default(&mut solver, &callbacks);
        assert!(calls > 0);
        assert_eq!(solver.status(), SolveStatus::Optimal);
        assert_eq!(solver.primal_bound(), Some(16.0));
    }
}

#[test]
fn test_branchrule_call_exposes_candidates() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    let call = solver.solve_iter(&[CallbackType::Branchrule]).unwrap();
    assert_eq!(call, Some(Call::Branchrule { node: 0 }));

    let candidates = solver.lp_candidates();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].var, 2);
    assert!((candidates[0].value - 0.25).abs() < 1e-9);
    assert_eq!(solver.pseudo_candidates(), &[0, 1, 2, 3]);
    assert_eq!(solver.focus_node().unwrap().number(), 0);
    assert!((solver.dual_bound() - 16.5).abs() < 1e-9);
}

#[test]
fn test_branching_on_pseudo_candidate() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    solver.solve_iter(&[CallbackType::Branchrule]).unwrap();
    // x0 is integral in the root LP but still unfixed, so branching on it is allowed.
    let mut call = solver.solve_iter_continue(CallbackResult::Branched(0)).unwrap();
    assert_eq!(solver.node(1).unwrap().bound_change(), Some((0, false)));
    assert_eq!(solver.node(2).unwrap().bound_change(), Some((0, true)));
    while call.is_some() {
        call = solver.solve_iter_continue(CallbackResult::DidNotRun).unwrap();
    }
    assert_eq!(solver.primal_bound(), Some(16.0));
}

#[test]
fn test_invalid_branching_keeps_call_pending() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    solver.solve_iter(&[CallbackType::Branchrule]).unwrap();
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::Branched(99)),
        Err(Error::InvalidAction(_))
    ));
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::Selected(0)),
        Err(Error::Solver(_))
    ));
    let mut call = solver.solve_iter_continue(CallbackResult::DidNotRun).unwrap();
    while call.is_some() {
        call = solver.solve_iter_continue(CallbackResult::DidNotRun).unwrap();
    }
    assert_eq!(solver.status(), SolveStatus::Optimal);
}

#[test]
fn test_nodesel_partition_covers_open_nodes() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    let mut call = solver.solve_iter(&[CallbackType::Nodesel]).unwrap();
    assert_eq!(call, Some(Call::Nodesel { focus: None }));
    assert_eq!(solver.open_nodes().children, vec![0]);

    while let Some(Call::Nodesel { focus }) = call {
        let open = solver.open_nodes();
        assert_eq!(open.len(), solver.n_nodes_left());
        let mut all: Vec<_> = open.iter().collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), open.len());
        for &child in &open.children {
            assert_eq!(solver.node(child).unwrap().parent(), focus);
        }

        // Always dive into the newest node.
        let newest = open.iter().max().unwrap();
        call = solver
            .solve_iter_continue(CallbackResult::Selected(newest))
            .unwrap();
    }
    assert_eq!(solver.status(), SolveStatus::Optimal);
    assert_eq!(solver.primal_bound(), Some(16.0));
}

#[test]
fn test_selecting_closed_node_is_invalid() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    solver.solve_iter(&[CallbackType::Nodesel]).unwrap();
    solver
        .solve_iter_continue(CallbackResult::Selected(0))
        .unwrap();
    // The root is no longer open.
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::Selected(0)),
        Err(Error::InvalidAction(_))
    ));
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::Branched(2)),
        Err(Error::Solver(_))
    ));
    assert!(solver.solve_iter_continue(CallbackResult::DidNotRun).is_ok());
}

// =============================================================================
// Heuristic callback
// =============================================================================

fn without_rounding() -> SolverConfig {
    SolverConfig {
        primal_heuristic: false,
        ..Default::default()
    }
}

#[test]
fn test_supplied_solution_becomes_incumbent_and_prunes() {
    let mut solver = Solver::with_config(small_knapsack(), without_rounding()).unwrap();
    let call = solver.solve_iter(&[CallbackType::Heuristic]).unwrap();
    assert_eq!(call, Some(Call::Heuristic { node: 0 }));
    assert_eq!(solver.lp_candidates().len(), 1);
    assert_eq!(solver.primal_bound(), None);

    let mut call = solver
        .solve_iter_continue(CallbackResult::FoundSolution(vec![1.0, 0.0, 1.0, 0.0]))
        .unwrap();
    assert_eq!(solver.primal_bound(), Some(16.0));
    while call.is_some() {
        call = solver.solve_iter_continue(CallbackResult::DidNotRun).unwrap();
    }

    assert_eq!(solver.status(), SolveStatus::Optimal);
    assert_eq!(solver.primal_bound(), Some(16.0));
    // Nothing improves on the supplied optimum.
    assert_eq!(solver.stats().incumbents, 1);
    // The x2 = 1 child has LP bound 16 and is cut off by the supplied solution.
    assert_eq!(solver.node(2).unwrap().status(), NodeStatus::Pruned);
}

#[test]
fn test_infeasible_supplied_solution_is_rejected() {
    let mut solver = Solver::with_config(small_knapsack(), without_rounding()).unwrap();
    solver.solve_iter(&[CallbackType::Heuristic]).unwrap();
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::FoundSolution(vec![1.0; 4])),
        Err(Error::InvalidAction(_))
    ));
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::FoundSolution(vec![1.0])),
        Err(Error::InvalidAction(_))
    ));
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::FoundSolution(vec![0.5, 0.0, 0.0, 0.0])),
        Err(Error::InvalidAction(_))
    ));
    assert!(matches!(
        solver.solve_iter_continue(CallbackResult::Branched(2)),
        Err(Error::Solver(_))
    ));
    assert_eq!(solver.primal_bound(), None);

    // The call is still pending and accepts a valid answer.
    solver
        .solve_iter_continue(CallbackResult::FoundSolution(vec![0.0, 1.0, 1.0, 0.0]))
        .unwrap();
    assert_eq!(solver.primal_bound(), Some(13.0));
}

#[test]
fn test_heuristic_call_precedes_branching_call() {
    let mut solver = Solver::new(small_knapsack()).unwrap();
    let call = solver
        .solve_iter(&[CallbackType::Branchrule, CallbackType::Heuristic])
        .unwrap();
    assert_eq!(call, Some(Call::Heuristic { node: 0 }));
    assert!((solver.dual_bound() - 16.5).abs() < 1e-9);

    let call = solver.solve_iter_continue(CallbackResult::DidNotRun).unwrap();
    assert_eq!(call, Some(Call::Branchrule { node: 0 }));
}

#[test]
fn test_near_integral_node_raises_heuristic_call() {
    let mut problem = PackingProblem::new("near-integral", Sense::Maximize);
    let x = problem.add_variable(None, 1.0);
    problem.add_row(None, [(x, 1e6)], 999_999.5);

    let mut solver = Solver::new(problem).unwrap();
    let call = solver.solve_iter(&[CallbackType::Heuristic]).unwrap();
    assert_eq!(call, Some(Call::Heuristic { node: 0 }));
    assert_eq!(solver.lp_candidates()[0].var, 0);
    solver
        .solve_iter_continue(CallbackResult::FoundSolution(vec![0.0]))
        .unwrap();
    assert_eq!(solver.primal_bound().map(f64::abs), Some(0.0));
}
