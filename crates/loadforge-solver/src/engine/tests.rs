//! Tests for the solver engines.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use loadforge_config::{EngineKind, GreedyOrder, SolverConfig};
use loadforge_core::{approx_eq, SolveStatus};
use loadforge_test::random::{random_instance, RandomInstanceSpec};
use loadforge_test::scenario::{self, Instance};
use loadforge_test::{best_volume, check_assignment};

use super::*;
use crate::model::AssignmentModel;
use crate::termination::NodeCountTermination;

fn model_of(instance: &Instance) -> AssignmentModel {
    AssignmentModel::build(&instance.items, &instance.slots, true).unwrap()
}

fn exact() -> BranchAndBoundEngine {
    BranchAndBoundEngine::new()
}

fn assert_valid(instance: &Instance, solution: &Solution) {
    let packed = check_assignment(&instance.items, &instance.slots, solution.assignment()).unwrap();
    assert!(
        approx_eq(packed, solution.objective_value()),
        "objective {} but {} packed",
        solution.objective_value(),
        packed
    );
}

#[test]
fn test_exact_three_items() {
    let instance = scenario::three_items();
    let solution = exact().solve(&model_of(&instance), &SolveContext::unbounded());

    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert_eq!(solution.objective_value(), 35.0);
    assert_eq!(solution.slot_of(1), Some(1));
    assert_eq!(solution.slot_of(0), Some(0));
    assert_valid(&instance, &solution);
}

#[test]
fn test_exact_beats_greedy_trap() {
    let instance = scenario::greedy_trap();
    let model = model_of(&instance);

    let greedy = GreedyEngine::default().solve(&model, &SolveContext::unbounded());
    assert_eq!(greedy.status(), SolveStatus::Feasible);
    assert_eq!(greedy.objective_value(), 6.0);

    let solution = exact().solve(&model, &SolveContext::unbounded());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert_eq!(solution.objective_value(), 10.0);
    assert_eq!(solution.unassigned_items(), vec![0]);
    assert_valid(&instance, &solution);
}

#[test]
fn test_exact_weight_bound() {
    let instance = scenario::weight_bound();
    let solution = exact().solve(&model_of(&instance), &SolveContext::unbounded());

    assert_eq!(solution.objective_value(), 12.0);
    assert_eq!(solution.slot_of(0), None);
    assert_valid(&instance, &solution);
}

#[test]
fn test_greedy_density_order_solves_weight_bound() {
    let instance = scenario::weight_bound();
    let model = model_of(&instance);

    let by_volume = GreedyEngine::new(GreedyOrder::VolumeDecreasing).solve(&model, &SolveContext::unbounded());
    assert_eq!(by_volume.objective_value(), 10.0);

    let by_density = GreedyEngine::new(GreedyOrder::DensityDecreasing).solve(&model, &SolveContext::unbounded());
    assert_eq!(by_density.objective_value(), 12.0);
    // meets the upper bound, so proven
    assert_eq!(by_density.status(), SolveStatus::Optimal);
}

#[test]
fn test_overweight_item_is_never_assigned() {
    let instance = scenario::overweight_item();
    let model = model_of(&instance);

    for engine in [&exact() as &dyn SolverEngine, &GreedyEngine::default()] {
        let solution = engine.solve(&model, &SolveContext::unbounded());
        assert_eq!(solution.slot_of(0), None);
        assert!(solution.slot_of(1).is_some());
        assert_eq!(solution.objective_value(), 10.0);
    }
}

#[test]
fn test_overweight_item_without_pruning() {
    let instance = scenario::overweight_item();
    let model = AssignmentModel::build(&instance.items, &instance.slots, false).unwrap();

    let solution = exact().solve(&model, &SolveContext::unbounded());
    assert_eq!(solution.slot_of(0), None);
    assert_eq!(solution.objective_value(), 10.0);
}

#[test]
fn test_no_slots_is_trivially_optimal() {
    let instance = scenario::three_items();
    let model = AssignmentModel::build(&instance.items, &[], true).unwrap();

    for engine in [&exact() as &dyn SolverEngine, &GreedyEngine::default()] {
        let solution = engine.solve(&model, &SolveContext::unbounded());
        assert_eq!(solution.status(), SolveStatus::Optimal);
        assert_eq!(solution.objective_value(), 0.0);
        assert_eq!(solution.unassigned_items(), vec![0, 1, 2]);
    }
}

#[test]
fn test_no_items_is_trivially_optimal() {
    let instance = scenario::three_items();
    let model = AssignmentModel::build(&[], &instance.slots, true).unwrap();

    let solution = exact().solve(&model, &SolveContext::with_time_limit(Duration::ZERO));
    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert!(solution.assignment().is_empty());
}

#[test]
fn test_zero_budget_times_out() {
    let model = model_of(&scenario::three_items());
    let context = SolveContext::with_time_limit(Duration::ZERO);

    for engine in [&exact() as &dyn SolverEngine, &GreedyEngine::default()] {
        let solution = engine.solve(&model, &context);
        assert_eq!(solution.status(), SolveStatus::Timeout);
        assert!(!solution.has_assignment());
        assert!(solution.assignment().is_empty());
    }
}

#[test]
fn test_cancelled_flag_times_out() {
    let model = model_of(&scenario::three_items());
    let flag = Arc::new(AtomicBool::new(true));
    let context = SolveContext::unbounded().with_terminate_flag(flag);

    let solution = exact().solve(&model, &context);
    assert_eq!(solution.status(), SolveStatus::Timeout);
}

#[test]
fn test_node_budget_yields_feasible_incumbent() {
    let instance = random_instance(11, &RandomInstanceSpec::new(14, 4));
    let model = model_of(&instance);
    let engine = exact().with_warm_start(false);

    let solution = engine.solve(&model, &SolveContext::new(NodeCountTermination::new(3)));
    assert!(solution.has_assignment());
    assert!(solution.stats().nodes_explored <= 3);
    assert_valid(&instance, &solution);
}

#[test]
fn test_improvement_callback_sees_increasing_objectives() {
    let instance = random_instance(5, &RandomInstanceSpec::new(10, 3));
    let model = model_of(&instance);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let context = SolveContext::unbounded().with_improvement_callback(move |objective| {
        sink.lock().unwrap().push(objective);
    });

    let solution = exact().with_warm_start(false).solve(&model, &context);
    let seen = seen.lock().unwrap();

    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert!(approx_eq(*seen.last().unwrap(), solution.objective_value()));
}

#[test]
fn test_exact_matches_brute_force_on_random_instances() {
    for seed in 0..40 {
        let instance = random_instance(seed, &RandomInstanceSpec::new(8, 3));
        let model = model_of(&instance);
        let expected = best_volume(&instance.items, &instance.slots);

        for symmetry in [true, false] {
            let engine = exact().with_symmetry_breaking(symmetry);
            let solution = engine.solve(&model, &SolveContext::unbounded());

            assert_eq!(solution.status(), SolveStatus::Optimal, "seed {seed}");
            assert!(
                approx_eq(solution.objective_value(), expected),
                "seed {seed} symmetry {symmetry}: {} != {expected}",
                solution.objective_value()
            );
            assert_valid(&instance, &solution);
        }
    }
}

/// Small integer loads so that many items coincide, over slot classes that
/// alternate instead of sitting next to each other.
fn repetitive_instance(seed: usize) -> Instance {
    let pairs: Vec<(f64, f64)> = (0..6)
        .map(|i| {
            let weight = 1 + (seed * 7 + i * 3) % 4;
            let volume = 1 + (seed * 5 + i * 11) % 3;
            (weight as f64, volume as f64)
        })
        .collect();
    let classes = [("S", 3.0, 3.0), ("M", 5.0, 4.0), ("L", 7.0, 6.0)];
    let slot_triples: Vec<(&str, f64, f64)> = (0..5).map(|j| classes[(j + seed) % 3]).collect();
    Instance::new(scenario::items(&pairs), scenario::slots(&slot_triples))
}

#[test]
fn test_exact_matches_brute_force_with_repeated_items_and_interleaved_slots() {
    for seed in 0..40 {
        let instance = repetitive_instance(seed);
        let expected = best_volume(&instance.items, &instance.slots);

        for prune in [true, false] {
            let model = AssignmentModel::build(&instance.items, &instance.slots, prune).unwrap();
            for warm_start in [true, false] {
                let solution = exact()
                    .with_warm_start(warm_start)
                    .solve(&model, &SolveContext::unbounded());

                assert_eq!(solution.status(), SolveStatus::Optimal, "seed {seed}");
                assert!(
                    approx_eq(solution.objective_value(), expected),
                    "seed {seed} prune {prune} warm start {warm_start}: {} != {expected}",
                    solution.objective_value()
                );
                assert_valid(&instance, &solution);
            }
        }
    }
}

#[test]
fn test_greedy_is_valid_and_never_above_optimum() {
    for seed in 0..40 {
        let instance = random_instance(seed, &RandomInstanceSpec::new(9, 3));
        let model = model_of(&instance);
        let optimum = best_volume(&instance.items, &instance.slots);

        for order in [GreedyOrder::VolumeDecreasing, GreedyOrder::DensityDecreasing] {
            let solution = GreedyEngine::new(order).solve(&model, &SolveContext::unbounded());
            assert_valid(&instance, &solution);
            assert!(solution.objective_value() <= optimum + 1e-9, "seed {seed}");
            if solution.is_optimal() {
                assert!(approx_eq(solution.objective_value(), optimum), "seed {seed}");
            }
        }
    }
}

#[test]
fn test_symmetry_breaking_explores_fewer_nodes() {
    let instance = scenario::identical_items();
    let model = model_of(&instance);
    let context = || SolveContext::unbounded();

    let with = exact().with_warm_start(false).solve(&model, &context());
    let without = exact()
        .with_warm_start(false)
        .with_symmetry_breaking(false)
        .solve(&model, &context());

    assert_eq!(with.objective_value(), 24.0);
    assert_eq!(without.objective_value(), 24.0);
    assert!(with.stats().nodes_explored <= without.stats().nodes_explored);
}

#[test]
fn test_warm_start_meeting_bound_skips_search() {
    let instance = scenario::three_items();
    let model = model_of(&instance);

    let solution = exact().solve(&model, &SolveContext::unbounded());
    // greedy packs everything, which equals the root bound
    assert_eq!(solution.stats().nodes_explored, 3);
    assert_eq!(solution.stats().engine, "branch_and_bound");
}

#[test]
fn test_idempotent() {
    let instance = random_instance(3, &RandomInstanceSpec::new(10, 4));
    let model = model_of(&instance);

    let first = exact().solve(&model, &SolveContext::unbounded());
    let second = exact().solve(&model, &SolveContext::unbounded());

    assert_eq!(first.assignment(), second.assignment());
    assert_eq!(first.objective_value(), second.objective_value());
}

#[test]
fn test_auto_selects_by_variable_count() {
    let model = model_of(&scenario::three_items());

    let small = AutoEngine::new(exact(), GreedyEngine::default(), 100);
    assert_eq!(small.select(&model).name(), "branch_and_bound");

    let tiny = AutoEngine::new(exact(), GreedyEngine::default(), 2);
    assert_eq!(tiny.select(&model).name(), "greedy");
    assert_eq!(tiny.solve(&model, &SolveContext::unbounded()).stats().engine, "greedy");
}

#[test]
fn test_engine_from_config() {
    let cases = [
        (EngineKind::Auto, "auto"),
        (EngineKind::Exact, "branch_and_bound"),
        (EngineKind::Greedy, "greedy"),
    ];
    for (kind, name) in cases {
        let engine = engine_from_config(&SolverConfig::new().with_engine(kind));
        assert_eq!(engine.name(), name);
    }
}

#[test]
fn test_context_from_config_applies_node_limit() {
    let instance = random_instance(2, &RandomInstanceSpec::new(14, 4));
    let model = model_of(&instance);
    let config = SolverConfig::new().with_node_limit(1);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let context = SolveContext::from_config(&config).with_improvement_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let solution = GreedyEngine::default().solve(&model, &context);
    // one placement, then the node budget stops the pass
    assert_eq!(solution.stats().nodes_explored, 1);
    assert!(solution.has_assignment());
    assert!(calls.load(Ordering::SeqCst) <= 1);
}
