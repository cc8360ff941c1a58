//! Index-aligned vehicle crossover.
//!
//! # Algorithm
//!
//! Pick a split point `k` in `[1, vehicles - 1]`. The child inherits the pickup
//! lists of vehicles `[0, k)` from the first parent and `[k, n)` from the
//! second, skipping passengers already placed and stopping at each vehicle's
//! capacity. Passengers left over are then placed by cheapest append:
//!
//! 1. Among vehicles with a free seat, the one with the lowest marginal
//!    insertion cost.
//! 2. If every vehicle is full, the one with the lowest marginal insertion
//!    cost, ties broken by fewest passengers (this overloads it).
//!
//! Every problem passenger ends up in the child exactly once.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;

use crate::distance::RouteCalculator;
use crate::evaluation::SolutionEvaluator;
use crate::models::{Passenger, ProblemData, Solution, Vehicle};

/// Combines two parents into one scored child.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use rideshare_ga::models::{Destination, Passenger, ProblemData, Solution, Vehicle};
/// use rideshare_ga::ga::IndexCrossover;
///
/// let problem = ProblemData::new(
///     vec![Passenger::new(1, "Ada", 0.0, 1.0), Passenger::new(2, "Bo", 0.0, 2.0)],
///     vec![Vehicle::new(0, 2, 0.0, 0.0), Vehicle::new(1, 2, 0.0, 0.0)],
///     Destination::new(0.0, 3.0, 480),
/// )
/// .unwrap();
/// let empty = Solution::new(problem.vehicles().to_vec());
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let child = IndexCrossover::new(&problem).crossover(&empty, &empty, &mut rng);
/// assert_eq!(child.assigned_count(), 2);
/// ```
pub struct IndexCrossover<'a> {
    problem: &'a ProblemData,
    routes: RouteCalculator<'a>,
    evaluator: SolutionEvaluator<'a>,
}

impl<'a> IndexCrossover<'a> {
    pub fn new(problem: &'a ProblemData) -> Self {
        Self {
            problem,
            routes: RouteCalculator::new(problem),
            evaluator: SolutionEvaluator::new(problem),
        }
    }

    /// Builds and scores a child of `parent1` and `parent2`.
    pub fn crossover<R: Rng>(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        rng: &mut R,
    ) -> Solution {
        let mut vehicles = self.routes.deep_copy_vehicles();
        let n = vehicles.len();
        let split = if n > 1 { rng.random_range(1..n) } else { n };

        let mut placed = HashSet::new();
        for (idx, child_vehicle) in vehicles.iter_mut().enumerate() {
            let parent = if idx < split { parent1 } else { parent2 };
            let Some(source) = parent.vehicles().get(idx) else {
                continue;
            };
            for passenger in source.passengers() {
                if !child_vehicle.has_spare_capacity() {
                    break;
                }
                if placed.insert(passenger.id()) {
                    child_vehicle.push_passenger(passenger.clone());
                }
            }
        }

        for passenger in self.problem.passengers() {
            if !placed.contains(&passenger.id()) {
                place_cheapest(&self.routes, &mut vehicles, passenger.clone());
            }
        }

        let mut child = Solution::new(vehicles);
        self.evaluator.evaluate(&mut child);
        child
    }
}

/// Appends `passenger` to the vehicle with the cheapest marginal insertion
/// cost, preferring vehicles with a free seat. Falls back to overloading the
/// cheapest vehicle (fewest passengers on ties) when all are full.
///
/// Does nothing if there are no vehicles.
pub(crate) fn place_cheapest(
    routes: &RouteCalculator,
    vehicles: &mut [Vehicle],
    passenger: Arc<Passenger>,
) {
    let cost = |v: &Vehicle| routes.marginal_insertion_cost(v, &passenger);

    let with_seat = vehicles
        .iter()
        .enumerate()
        .filter(|(_, v)| v.has_spare_capacity())
        .min_by(|(_, a), (_, b)| cost(a).total_cmp(&cost(b)))
        .map(|(idx, _)| idx);

    let target = with_seat.or_else(|| {
        vehicles
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                cost(a)
                    .total_cmp(&cost(b))
                    .then_with(|| a.len().cmp(&b.len()))
            })
            .map(|(idx, _)| idx)
    });

    if let Some(idx) = target {
        vehicles[idx].push_passenger(passenger);
    }
}
