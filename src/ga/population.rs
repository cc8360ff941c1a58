//! Initial population seeding.
//!
//! The first individual is built greedily (farthest passengers first, nearest
//! vehicle with a free seat), the second spreads passengers evenly over the
//! fleet, and the rest are random partitions repaired by cheapest append.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use super::crossover::place_cheapest;
use crate::distance::{haversine_km, RouteCalculator};
use crate::evaluation::SolutionEvaluator;
use crate::models::{Passenger, ProblemData, Solution, Vehicle};

/// Builds scored initial populations.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use rideshare_ga::models::{Destination, Passenger, ProblemData, Vehicle};
/// use rideshare_ga::ga::PopulationManager;
///
/// let problem = ProblemData::new(
///     vec![Passenger::new(1, "Ada", 0.0, 1.0), Passenger::new(2, "Bo", 0.0, 2.0)],
///     vec![Vehicle::new(0, 2, 0.0, 0.0)],
///     Destination::new(0.0, 3.0, 480),
/// )
/// .unwrap();
/// let mut rng = StdRng::seed_from_u64(5);
/// let population = PopulationManager::new(&problem).initial_population(50, &mut rng);
/// assert_eq!(population.len(), 50);
/// ```
pub struct PopulationManager<'a> {
    problem: &'a ProblemData,
    routes: RouteCalculator<'a>,
    evaluator: SolutionEvaluator<'a>,
}

impl<'a> PopulationManager<'a> {
    pub fn new(problem: &'a ProblemData) -> Self {
        Self {
            problem,
            routes: RouteCalculator::new(problem),
            evaluator: SolutionEvaluator::new(problem),
        }
    }

    /// Creates `size` scored solutions: greedy, even, then random.
    pub fn initial_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Solution> {
        let mut population = Vec::with_capacity(size);
        if size >= 1 {
            population.push(self.greedy_solution());
        }
        if size >= 2 {
            population.push(self.even_solution());
        }
        while population.len() < size {
            population.push(self.random_solution(rng));
        }
        population
    }

    /// Farthest-from-destination passengers first, each to the vehicle with a
    /// free seat whose start is nearest; when all are full, to the vehicle with
    /// the fewest passengers.
    pub fn greedy_solution(&self) -> Solution {
        let destination = self.problem.destination().position();
        let mut order: Vec<&Arc<Passenger>> = self.problem.passengers().iter().collect();
        order.sort_by(|a, b| {
            haversine_km(b.position(), destination)
                .total_cmp(&haversine_km(a.position(), destination))
        });

        let mut vehicles = self.routes.deep_copy_vehicles();
        for passenger in order {
            let target = nearest_with_seat(&vehicles, passenger)
                .or_else(|| least_loaded(&vehicles));
            if let Some(idx) = target {
                vehicles[idx].push_passenger(passenger.clone());
            }
        }
        self.scored(vehicles)
    }

    /// Gives every vehicle the same number of nearby passengers, then places
    /// the leftovers.
    pub fn even_solution(&self) -> Solution {
        let mut vehicles = self.routes.deep_copy_vehicles();
        if vehicles.is_empty() {
            return self.scored(vehicles);
        }

        let count = vehicles.len();
        let min_capacity = vehicles
            .iter()
            .map(|v| v.capacity() as usize)
            .min()
            .unwrap_or(0);
        let per_vehicle = (self.problem.num_passengers() / count)
            .min(self.problem.total_capacity() / count)
            .min(min_capacity);

        let mut remaining: Vec<Arc<Passenger>> = self.problem.passengers().to_vec();
        for vehicle in vehicles.iter_mut() {
            let start = vehicle.start();
            remaining.sort_by(|a, b| {
                haversine_km(start, a.position()).total_cmp(&haversine_km(start, b.position()))
            });
            let take = per_vehicle.min(remaining.len());
            for passenger in remaining.drain(..take) {
                vehicle.push_passenger(passenger);
            }
        }

        for passenger in remaining {
            let target = nearest_with_seat(&vehicles, &passenger)
                .or_else(|| least_loaded(&vehicles));
            if let Some(idx) = target {
                vehicles[idx].push_passenger(passenger);
            }
        }
        self.scored(vehicles)
    }

    /// Shuffles passengers, hands each vehicle a random-sized prefix within its
    /// capacity, then places the rest by cheapest append.
    pub fn random_solution<R: Rng>(&self, rng: &mut R) -> Solution {
        let mut shuffled: Vec<Arc<Passenger>> = self.problem.passengers().to_vec();
        shuffled.shuffle(rng);

        let mut vehicles = self.routes.deep_copy_vehicles();
        let mut rest = shuffled.into_iter();
        for vehicle in vehicles.iter_mut() {
            let upper = (vehicle.capacity() as usize).min(rest.len());
            let take = rng.random_range(0..=upper);
            for passenger in rest.by_ref().take(take) {
                vehicle.push_passenger(passenger);
            }
        }

        for passenger in rest {
            place_cheapest(&self.routes, &mut vehicles, passenger);
        }
        self.scored(vehicles)
    }

    fn scored(&self, vehicles: Vec<Vehicle>) -> Solution {
        let mut solution = Solution::new(vehicles);
        self.evaluator.evaluate(&mut solution);
        solution
    }
}

/// Vehicle with a free seat whose start is closest to `passenger`.
fn nearest_with_seat(vehicles: &[Vehicle], passenger: &Passenger) -> Option<usize> {
    vehicles
        .iter()
        .enumerate()
        .filter(|(_, v)| v.has_spare_capacity())
        .min_by(|(_, a), (_, b)| {
            haversine_km(a.start(), passenger.position())
                .total_cmp(&haversine_km(b.start(), passenger.position()))
        })
        .map(|(idx, _)| idx)
}

/// Vehicle with the fewest passengers (first on ties).
fn least_loaded(vehicles: &[Vehicle]) -> Option<usize> {
    vehicles
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| v.len())
        .map(|(idx, _)| idx)
}
