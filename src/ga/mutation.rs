//! Mutation operators.
//!
//! One of five perturbations is drawn uniformly per call:
//!
//! - [`MutationKind::Swap`]: exchange one passenger between two used vehicles
//! - [`MutationKind::Reorder`]: reverse a random segment of one pickup order
//! - [`MutationKind::Move`]: relocate one passenger to another vehicle
//! - [`MutationKind::OptimizeRoutes`]: a few random 2-opt trials, keep the best
//! - [`MutationKind::OptimizeCapacity`]: shed overload onto vehicles with seats
//!
//! A mutation whose precondition does not hold (e.g. Swap with fewer than two
//! used vehicles) leaves the assignment unchanged. The solution is rescored
//! either way.

use rand::Rng;

use crate::distance::RouteCalculator;
use crate::evaluation::SolutionEvaluator;
use crate::models::{ProblemData, Solution, Vehicle};

/// Segment reversals tried by [`MutationKind::OptimizeRoutes`].
const ROUTE_TRIALS: usize = 10;

/// The perturbation applied by [`MutationOperator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Swap,
    Reorder,
    Move,
    OptimizeRoutes,
    OptimizeCapacity,
}

impl MutationKind {
    pub const ALL: [MutationKind; 5] = [
        MutationKind::Swap,
        MutationKind::Reorder,
        MutationKind::Move,
        MutationKind::OptimizeRoutes,
        MutationKind::OptimizeCapacity,
    ];

    /// Draws a kind uniformly at random.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Applies randomized local perturbations in place.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use rideshare_ga::models::{Destination, Passenger, ProblemData};
/// use rideshare_ga::models::Vehicle;
/// use rideshare_ga::ga::{MutationKind, MutationOperator, PopulationManager};
///
/// let problem = ProblemData::new(
///     vec![Passenger::new(1, "Ada", 0.0, 1.0), Passenger::new(2, "Bo", 0.0, 2.0)],
///     vec![Vehicle::new(0, 2, 0.0, 0.0)],
///     Destination::new(0.0, 3.0, 480),
/// )
/// .unwrap();
/// let mut sol = PopulationManager::new(&problem).greedy_solution();
///
/// let mut rng = StdRng::seed_from_u64(0);
/// MutationOperator::new(&problem).apply(MutationKind::Reorder, &mut sol, &mut rng);
/// assert_eq!(sol.assigned_count(), 2);
/// ```
pub struct MutationOperator<'a> {
    routes: RouteCalculator<'a>,
    evaluator: SolutionEvaluator<'a>,
    allow_capacity_increasing_moves: bool,
}

impl<'a> MutationOperator<'a> {
    pub fn new(problem: &'a ProblemData) -> Self {
        Self {
            routes: RouteCalculator::new(problem),
            evaluator: SolutionEvaluator::new(problem),
            allow_capacity_increasing_moves: true,
        }
    }

    /// When `false`, Move only targets vehicles with a free seat.
    pub fn with_capacity_increasing_moves(mut self, allow: bool) -> Self {
        self.allow_capacity_increasing_moves = allow;
        self
    }

    /// Applies one uniformly drawn mutation and rescores. Returns the kind drawn.
    pub fn mutate<R: Rng>(&self, solution: &mut Solution, rng: &mut R) -> MutationKind {
        let kind = MutationKind::random(rng);
        self.apply(kind, solution, rng);
        kind
    }

    /// Applies the given mutation and rescores. Returns `true` if the
    /// assignment changed.
    pub fn apply<R: Rng>(&self, kind: MutationKind, solution: &mut Solution, rng: &mut R) -> bool {
        let changed = match kind {
            MutationKind::Swap => swap(solution, rng),
            MutationKind::Reorder => reorder(solution, rng),
            MutationKind::Move => self.relocate(solution, rng),
            MutationKind::OptimizeRoutes => self.optimize_routes(solution, rng),
            MutationKind::OptimizeCapacity => optimize_capacity(solution),
        };
        self.evaluator.evaluate(solution);
        changed
    }

    fn relocate<R: Rng>(&self, solution: &mut Solution, rng: &mut R) -> bool {
        let vehicles = solution.vehicles_mut();
        let sources = indices_with_at_least(vehicles, 1);
        if sources.is_empty() || vehicles.len() < 2 {
            return false;
        }
        let from = sources[rng.random_range(0..sources.len())];

        let to = if self.allow_capacity_increasing_moves {
            let mut to = rng.random_range(0..vehicles.len() - 1);
            if to >= from {
                to += 1;
            }
            to
        } else {
            let targets: Vec<usize> = (0..vehicles.len())
                .filter(|&i| i != from && vehicles[i].has_spare_capacity())
                .collect();
            if targets.is_empty() {
                return false;
            }
            targets[rng.random_range(0..targets.len())]
        };

        let pos = rng.random_range(0..vehicles[from].len());
        let passenger = vehicles[from].passengers_mut().remove(pos);
        vehicles[to].push_passenger(passenger);
        true
    }

    fn optimize_routes<R: Rng>(&self, solution: &mut Solution, rng: &mut R) -> bool {
        let vehicles = solution.vehicles_mut();
        let candidates = indices_with_at_least(vehicles, 4);
        if candidates.is_empty() {
            return false;
        }
        let vehicle = &mut vehicles[candidates[rng.random_range(0..candidates.len())]];
        let start = vehicle.start();

        let mut best = vehicle.passengers().to_vec();
        let original = self.routes.sequence_distance(start, &best);
        let mut best_distance = original;
        for _ in 0..ROUTE_TRIALS {
            let (i, j) = distinct_positions(best.len(), rng);
            let mut trial = best.clone();
            trial[i..=j].reverse();
            let distance = self.routes.sequence_distance(start, &trial);
            if distance < best_distance {
                best = trial;
                best_distance = distance;
            }
        }

        if best_distance < original {
            *vehicle.passengers_mut() = best;
            true
        } else {
            false
        }
    }
}

fn swap<R: Rng>(solution: &mut Solution, rng: &mut R) -> bool {
    let vehicles = solution.vehicles_mut();
    let used = indices_with_at_least(vehicles, 1);
    if used.len() < 2 {
        return false;
    }
    let (a, b) = distinct_positions(used.len(), rng);
    let (a, b) = (used[a], used[b]);
    let pa = rng.random_range(0..vehicles[a].len());
    let pb = rng.random_range(0..vehicles[b].len());

    // a < b, so split the slice to borrow both vehicles
    let (left, right) = vehicles.split_at_mut(b);
    std::mem::swap(
        &mut left[a].passengers_mut()[pa],
        &mut right[0].passengers_mut()[pb],
    );
    true
}

fn reorder<R: Rng>(solution: &mut Solution, rng: &mut R) -> bool {
    let vehicles = solution.vehicles_mut();
    let candidates = indices_with_at_least(vehicles, 2);
    if candidates.is_empty() {
        return false;
    }
    let passengers = vehicles[candidates[rng.random_range(0..candidates.len())]].passengers_mut();
    if passengers.len() > 2 {
        let (i, j) = distinct_positions(passengers.len(), rng);
        passengers[i..=j].reverse();
        true
    } else if rng.random_bool(0.5) {
        passengers.swap(0, 1);
        true
    } else {
        false
    }
}

/// Moves the most recently added passengers out of overloaded vehicles
/// (most overloaded first) into the least-loaded vehicles with a free seat.
fn optimize_capacity(solution: &mut Solution) -> bool {
    let vehicles = solution.vehicles_mut();
    let mut overloaded: Vec<usize> = (0..vehicles.len())
        .filter(|&i| vehicles[i].is_overloaded())
        .collect();
    overloaded.sort_by_key(|&i| std::cmp::Reverse(vehicles[i].overload()));

    let mut changed = false;
    for from in overloaded {
        while vehicles[from].is_overloaded() {
            let target = (0..vehicles.len())
                .filter(|&i| i != from && vehicles[i].has_spare_capacity())
                .min_by_key(|&i| vehicles[i].len());
            let Some(to) = target else {
                // no free seat anywhere
                return changed;
            };
            if let Some(passenger) = vehicles[from].passengers_mut().pop() {
                vehicles[to].push_passenger(passenger);
                changed = true;
            }
        }
    }
    changed
}

fn indices_with_at_least(vehicles: &[Vehicle], passengers: usize) -> Vec<usize> {
    vehicles
        .iter()
        .enumerate()
        .filter(|(_, v)| v.len() >= passengers)
        .map(|(idx, _)| idx)
        .collect()
}

/// Two different positions in `0..len` as `(low, high)`. Requires `len >= 2`.
fn distinct_positions<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(0..len);
    let mut j = rng.random_range(0..len - 1);
    if j >= i {
        j += 1;
    }
    (i.min(j), i.max(j))
}
