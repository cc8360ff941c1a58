use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rideshare_ga::distance::RouteCalculator;
use rideshare_ga::evaluation::SolutionEvaluator;
use rideshare_ga::ga::{IndexCrossover, MutationKind, MutationOperator, PopulationManager};
use rideshare_ga::models::{Destination, Passenger, ProblemData, Solution, Vehicle};

/// Passengers and vehicle starts in a one-degree square; the destination is
/// far enough away that every non-empty route is long.
fn problem_strategy() -> impl Strategy<Value = ProblemData> {
    (
        prop::collection::vec((0.0..1.0f64, 0.0..1.0f64), 0..16),
        prop::collection::vec((0.0..1.0f64, 0.0..1.0f64, 1u32..5), 1..5),
    )
        .prop_map(|(passengers, vehicles)| {
            ProblemData::new(
                passengers
                    .into_iter()
                    .enumerate()
                    .map(|(i, (lat, lng))| Passenger::new(i, format!("p{i}"), lat, lng))
                    .collect(),
                vehicles
                    .into_iter()
                    .enumerate()
                    .map(|(i, (lat, lng, cap))| Vehicle::new(i, cap, lat, lng))
                    .collect(),
                Destination::new(10.0, 10.0, 480),
            )
            .expect("generated input is valid")
        })
}

fn assert_conserved(solution: &Solution, problem: &ProblemData) {
    assert!(!solution.has_duplicate_assignments());
    let known: Vec<usize> = problem.passengers().iter().map(|p| p.id()).collect();
    for id in solution.assigned_ids() {
        assert!(known.contains(&id), "unknown passenger {id}");
    }
}

fn loads(solution: &Solution) -> Vec<usize> {
    solution.vehicles().iter().map(|v| v.len()).collect()
}

proptest! {
    #[test]
    fn seeded_population_places_everyone_once(problem in problem_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let population = PopulationManager::new(&problem).initial_population(5, &mut rng);
        for solution in &population {
            assert_conserved(solution, &problem);
            prop_assert_eq!(solution.assigned_count(), problem.num_passengers());
            prop_assert_eq!(solution.num_vehicles(), problem.num_vehicles());
        }
    }

    #[test]
    fn route_distance_zero_iff_empty(problem in problem_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let solution = PopulationManager::new(&problem).random_solution(&mut rng);
        let routes = RouteCalculator::new(&problem);
        for vehicle in solution.vehicles() {
            let d = routes.route_distance(vehicle);
            prop_assert!(d >= 0.0);
            prop_assert_eq!(d == 0.0, vehicle.is_empty());
        }
    }

    #[test]
    fn crossover_child_covers_every_passenger(problem in problem_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let manager = PopulationManager::new(&problem);
        let p1 = manager.random_solution(&mut rng);
        let p2 = manager.random_solution(&mut rng);
        let child = IndexCrossover::new(&problem).crossover(&p1, &p2, &mut rng);
        assert_conserved(&child, &problem);
        prop_assert_eq!(child.assigned_count(), problem.num_passengers());
    }

    #[test]
    fn swap_and_reorder_keep_vehicle_loads(problem in problem_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut solution = PopulationManager::new(&problem).random_solution(&mut rng);
        let mutation = MutationOperator::new(&problem);
        for kind in [MutationKind::Swap, MutationKind::Reorder] {
            let before = loads(&solution);
            mutation.apply(kind, &mut solution, &mut rng);
            prop_assert_eq!(loads(&solution), before);
            assert_conserved(&solution, &problem);
        }
    }

    #[test]
    fn optimize_capacity_never_overfills(problem in problem_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut solution = PopulationManager::new(&problem).greedy_solution();
        let before = loads(&solution);
        MutationOperator::new(&problem).apply(
            MutationKind::OptimizeCapacity,
            &mut solution,
            &mut rng,
        );
        for (vehicle, start) in solution.vehicles().iter().zip(before) {
            // overloaded vehicles only shrink, others never pass capacity
            if start > vehicle.capacity() as usize {
                prop_assert!(vehicle.len() <= start);
            } else {
                prop_assert!(vehicle.len() <= vehicle.capacity() as usize);
            }
        }
        assert_conserved(&solution, &problem);
    }

    #[test]
    fn any_mutation_conserves_passengers(problem in problem_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut solution = PopulationManager::new(&problem).random_solution(&mut rng);
        let mutation = MutationOperator::new(&problem);
        for _ in 0..10 {
            mutation.mutate(&mut solution, &mut rng);
            assert_conserved(&solution, &problem);
            prop_assert_eq!(solution.assigned_count(), problem.num_passengers());
        }
    }

    #[test]
    fn unassigning_a_passenger_costs_at_least_900(
        problem in problem_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut solution = PopulationManager::new(&problem).random_solution(&mut rng);
        let evaluator = SolutionEvaluator::new(&problem);
        let full = evaluator.evaluate(&mut solution);

        let target = solution
            .vehicles()
            .iter()
            .position(|v| !v.is_empty() && !v.is_overloaded());
        if let Some(idx) = target {
            let mut reduced = solution.clone();
            reduced.vehicles_mut()[idx].passengers_mut().pop();
            let partial = evaluator.evaluate(&mut reduced);
            prop_assert!(full - partial >= 900.0, "drop was {}", full - partial);
        }
    }

    #[test]
    fn recompute_all_is_idempotent(problem in problem_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut solution = PopulationManager::new(&problem).random_solution(&mut rng);
        let routes = RouteCalculator::new(&problem);
        routes.recompute_all(&mut solution);
        let first: Vec<f64> = solution.vehicles().iter().map(|v| v.total_distance()).collect();
        routes.recompute_all(&mut solution);
        let second: Vec<f64> = solution.vehicles().iter().map(|v| v.total_distance()).collect();
        prop_assert_eq!(first, second);
    }
}
