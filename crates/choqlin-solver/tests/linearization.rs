// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! End-to-end checks of the linearizations against brute force.
//!
//! Every test builds a model with `choqlin_linearize`, optimizes it with
//! the reference enumeration adapter, and compares the optimum against an
//! independent combinatorial enumeration of the feasible decisions.

use choqlin_linearize::{integral::CapacityIntegralLinearizer, owa::OwaLinearizer};
use choqlin_model::{
    capacity::{CapacityGenerator, MobiusMassFunction},
    index::{CriterionIndex, ItemIndex},
    instance::ProblemInstance,
    linear::{LinearModel, Relation},
    weights::owa_weights,
};
use choqlin_solver::{
    adapter::{SolverAdapter, SolverError},
    enumeration::EnumerationSolver,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

const TOLERANCE: f64 = 1e-6;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assignment_instance() -> ProblemInstance<i64> {
    ProblemInstance::from_rows(vec![vec![9, 2, 4], vec![1, 8, 3], vec![5, 5, 5]], None)
        .expect("valid instance")
}

fn selection_instance() -> ProblemInstance<i64> {
    ProblemInstance::from_rows(
        vec![
            vec![10, 4, 6, 2],
            vec![3, 9, 5, 7],
            vec![6, 6, 4, 4],
        ],
        Some(vec![8, 6, 6, 5]),
    )
    .expect("valid instance")
}

/// Visits the satisfaction profile of every feasible item-to-agent
/// assignment (each item given out at most once; optionally at most one
/// item per agent).
fn for_each_assignment<F: FnMut(&[f64])>(
    instance: &ProblemInstance<i64>,
    one_to_one: bool,
    mut visit: F,
) {
    let n = instance.num_criteria();
    let p = instance.num_items();

    // choice[j] in 0..n assigns item j to an agent; n leaves it out.
    let mut choice = vec![0usize; p];
    loop {
        let mut counts = vec![0usize; n];
        let mut valid = true;
        for &agent in &choice {
            if agent < n {
                counts[agent] += 1;
                if one_to_one && counts[agent] > 1 {
                    valid = false;
                    break;
                }
            }
        }

        if valid {
            let mut z = vec![0.0; n];
            for (j, &agent) in choice.iter().enumerate() {
                if agent < n {
                    z[agent] +=
                        instance.utility(CriterionIndex::new(agent), ItemIndex::new(j)) as f64;
                }
            }
            visit(&z);
        }

        let mut position = 0;
        loop {
            if position == p {
                return;
            }
            choice[position] += 1;
            if choice[position] <= n {
                break;
            }
            choice[position] = 0;
            position += 1;
        }
    }
}

/// Visits the satisfaction profile of every selection within budget.
fn for_each_selection<F: FnMut(&[f64])>(
    instance: &ProblemInstance<i64>,
    budget: f64,
    mut visit: F,
) {
    let n = instance.num_criteria();
    let p = instance.num_items();
    let costs = instance.costs().expect("selection instance has costs");

    for mask in 0u32..(1u32 << p) {
        let cost: f64 = (0..p)
            .filter(|&j| mask & (1 << j) != 0)
            .map(|j| costs[j] as f64)
            .sum();
        if cost > budget + TOLERANCE {
            continue;
        }

        let mut z = vec![0.0; n];
        for j in 0..p {
            if mask & (1 << j) != 0 {
                for (i, value) in z.iter_mut().enumerate() {
                    *value += instance.utility(CriterionIndex::new(i), ItemIndex::new(j)) as f64;
                }
            }
        }
        visit(&z);
    }
}

fn read_vector(model: &LinearModel, solution: &choqlin_model::solution::Solution, prefix: &str, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            solution
                .value_by_name(model, &format!("{}_{}", prefix, i))
                .expect("variable exists")
        })
        .collect()
}

#[test]
fn owa_with_uniform_weights_maximizes_average_satisfaction() {
    init_logger();

    let instance = assignment_instance();
    let n = instance.num_criteria();
    let weights = owa_weights(n, 1.0);

    let model = OwaLinearizer::new()
        .build_model(&instance, &weights)
        .expect("valid configuration");
    let solution = EnumerationSolver::new()
        .solve(&model, None)
        .expect("model solves");

    let mut best_average = f64::NEG_INFINITY;
    for_each_assignment(&instance, true, |z| {
        let average = z.iter().sum::<f64>() / n as f64;
        if average > best_average {
            best_average = average;
        }
    });

    assert!(
        (solution.objective_value() - best_average).abs() < TOLERANCE,
        "linearized optimum {} differs from brute-force optimum {}",
        solution.objective_value(),
        best_average
    );
}

#[test]
fn owa_order_variables_equal_sorted_satisfactions() {
    init_logger();

    let instance = assignment_instance();
    let n = instance.num_criteria();
    let weights = owa_weights(n, 2.0);

    let model = OwaLinearizer::new()
        .build_model(&instance, &weights)
        .expect("valid configuration");
    let solution = EnumerationSolver::new()
        .solve(&model, None)
        .expect("model solves");

    let z = read_vector(&model, &solution, "z", n);
    let y = read_vector(&model, &solution, "y", n);

    for pair in y.windows(2) {
        assert!(pair[0] <= pair[1] + TOLERANCE, "order variables must ascend");
    }

    let mut sorted_z = z.clone();
    sorted_z.sort_by(f64::total_cmp);
    for (expected, actual) in sorted_z.iter().zip(&y) {
        assert!(
            (expected - actual).abs() < TOLERANCE,
            "order variables {:?} differ from sorted satisfactions {:?}",
            y,
            sorted_z
        );
    }

    let expected_objective: f64 = weights.iter().zip(&sorted_z).map(|(w, v)| w * v).sum();
    assert!((solution.objective_value() - expected_objective).abs() < TOLERANCE);
}

#[test]
fn owa_brute_force_agrees_for_fairness_weights() {
    init_logger();

    let instance = assignment_instance();
    let n = instance.num_criteria();
    let weights = owa_weights(n, 3.0);

    let model = OwaLinearizer::new()
        .build_model(&instance, &weights)
        .expect("valid configuration");
    let solution = EnumerationSolver::new()
        .solve(&model, None)
        .expect("model solves");

    let mut best = f64::NEG_INFINITY;
    for_each_assignment(&instance, true, |z| {
        let mut sorted = z.to_vec();
        sorted.sort_by(f64::total_cmp);
        let value: f64 = weights.iter().zip(&sorted).map(|(w, v)| w * v).sum();
        if value > best {
            best = value;
        }
    });

    assert!((solution.objective_value() - best).abs() < TOLERANCE);
}

#[test]
fn unanimity_capacity_yields_the_maximin_selection() {
    init_logger();

    let instance = selection_instance();
    let n = instance.num_criteria();
    let budget = 12.0;
    let masses = MobiusMassFunction::unanimity(n);

    let model = CapacityIntegralLinearizer::new()
        .build_selection_model(&instance, &masses, budget)
        .expect("valid configuration");
    let solution = EnumerationSolver::new()
        .solve(&model, None)
        .expect("model solves");

    let mut best_maximin = f64::NEG_INFINITY;
    for_each_selection(&instance, budget, |z| {
        let min = z.iter().copied().fold(f64::INFINITY, f64::min);
        if min > best_maximin {
            best_maximin = min;
        }
    });

    assert!(
        (solution.objective_value() - best_maximin).abs() < TOLERANCE,
        "linearized maximin {} differs from brute-force maximin {}",
        solution.objective_value(),
        best_maximin
    );
}

#[test]
fn additive_capacity_reduces_to_a_plain_weighted_sum() {
    init_logger();

    let instance = selection_instance();
    let p = instance.num_items();
    let budget = 12.0;
    let weights = [0.2, 0.3, 0.5];
    let masses = MobiusMassFunction::additive(&weights).expect("valid weights");

    let model = CapacityIntegralLinearizer::new()
        .build_selection_model(&instance, &masses, budget)
        .expect("valid configuration");
    let solution = EnumerationSolver::new()
        .solve(&model, None)
        .expect("model solves");

    // Independent brute force of the weighted sum.
    let mut best = f64::NEG_INFINITY;
    for_each_selection(&instance, budget, |z| {
        let value: f64 = weights.iter().zip(z).map(|(w, v)| w * v).sum();
        if value > best {
            best = value;
        }
    });
    assert!((solution.objective_value() - best).abs() < TOLERANCE);

    // Cross-check against a hand-built linear-sum model over the same
    // decisions: same optimum, no envelope machinery involved.
    let costs = instance.costs().expect("costs present");
    let mut direct = LinearModel::new("weighted_sum");
    let x: Vec<_> = (0..p)
        .map(|j| direct.add_binary(format!("x_{}", j)))
        .collect();
    direct.add_constraint(
        "budget",
        x.iter()
            .enumerate()
            .map(|(j, &var)| (var, costs[j] as f64))
            .collect(),
        Relation::LessOrEqual,
        budget,
    );
    direct.set_objective(
        x.iter()
            .enumerate()
            .map(|(j, &var)| {
                let coefficient: f64 = weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| {
                        w * instance.utility(CriterionIndex::new(i), ItemIndex::new(j)) as f64
                    })
                    .sum();
                (var, coefficient)
            })
            .collect(),
    );

    let direct_solution = EnumerationSolver::new()
        .solve(&direct, None)
        .expect("direct model solves");
    assert!(
        (solution.objective_value() - direct_solution.objective_value()).abs() < TOLERANCE
    );
}

#[test]
fn wowa_assignment_agrees_with_direct_choquet_evaluation() {
    init_logger();

    let instance = assignment_instance();
    let n = instance.num_criteria();

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let masses = CapacityGenerator::new().belief_function(n, &mut rng);

    let model = CapacityIntegralLinearizer::new()
        .build_assignment_model(&instance, &masses)
        .expect("valid configuration");
    let solution = EnumerationSolver::new()
        .solve(&model, None)
        .expect("model solves");

    let mut best = f64::NEG_INFINITY;
    for_each_assignment(&instance, true, |z| {
        let value = masses.choquet_integral(z);
        if value > best {
            best = value;
        }
    });

    assert!(
        (solution.objective_value() - best).abs() < TOLERANCE,
        "linearized integral {} differs from direct evaluation {}",
        solution.objective_value(),
        best
    );
}

#[test]
fn two_objective_portfolio_example_end_to_end() {
    init_logger();

    // Two objectives, three projects of cost 10 each, budget 15: exactly
    // one project fits. With equal singleton masses the integral is the
    // plain average, so the best single project scores (10 + 1) / 2 = 5.5.
    let instance = ProblemInstance::from_rows(
        vec![vec![10, 5, 1], vec![1, 5, 10]],
        Some(vec![10, 10, 10]),
    )
    .expect("valid instance");
    let budget = instance.half_cost_budget().expect("costs present");
    assert_eq!(budget, 15.0);

    let masses = MobiusMassFunction::additive(&[0.5, 0.5]).expect("valid weights");
    let model = CapacityIntegralLinearizer::new()
        .build_selection_model(&instance, &masses, budget)
        .expect("valid configuration");
    let solution = EnumerationSolver::new()
        .solve(&model, None)
        .expect("model solves");

    let mut best = f64::NEG_INFINITY;
    for_each_selection(&instance, budget, |z| {
        best = best.max(0.5 * z[0] + 0.5 * z[1]);
    });
    assert!((best - 5.5).abs() < TOLERANCE);
    assert!((solution.objective_value() - 5.5).abs() < TOLERANCE);

    let selected: f64 = (0..3)
        .map(|j| {
            solution
                .value_by_name(&model, &format!("x_{}", j))
                .expect("selection variable exists")
        })
        .sum();
    assert!((selected - 1.0).abs() < TOLERANCE, "budget admits one project");
}

#[test]
fn timeout_surfaces_as_a_typed_error() {
    init_logger();

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let instance = ProblemInstance::random_assignment(3, 4, &mut rng);
    let weights = owa_weights(3, 2.0);

    let model = OwaLinearizer::new()
        .build_model(&instance, &weights)
        .expect("valid configuration");

    let result = EnumerationSolver::new().solve(&model, Some(Duration::ZERO));
    assert_eq!(result.unwrap_err(), SolverError::Timeout);
}

#[test]
fn identical_inputs_build_identical_models() {
    init_logger();

    let instance = selection_instance();
    let masses = MobiusMassFunction::unanimity(instance.num_criteria());

    let build = || {
        CapacityIntegralLinearizer::new()
            .build_selection_model(&instance, &masses, 12.0)
            .expect("valid configuration")
    };

    let mut first = Vec::new();
    let mut second = Vec::new();
    build().write_lp(&mut first).expect("render");
    build().write_lp(&mut second).expect("render");
    assert_eq!(first, second);
}
