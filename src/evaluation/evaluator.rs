//! Solution fitness evaluator.

use serde::{Deserialize, Serialize};

use crate::distance::RouteCalculator;
use crate::models::{ProblemData, Solution};

const DISTANCE_NUMERATOR: f64 = 1500.0;
const ASSIGNED_REWARD: f64 = 100.0;
const USED_VEHICLE_PENALTY: f64 = -10.0;
const OVERLOADED_VEHICLE_PENALTY: f64 = -200.0;
const EXCESS_PASSENGER_PENALTY: f64 = -300.0;
const UNASSIGNED_PENALTY: f64 = -1000.0;

/// Raw counts and weighted terms behind a fitness score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Sum of used vehicles' route distances (km).
    pub total_distance: f64,
    /// Passengers assigned across all vehicles.
    pub assigned: usize,
    /// Problem passengers not assigned to any vehicle.
    pub unassigned: usize,
    /// Vehicles with at least one passenger.
    pub used_vehicles: usize,
    /// Vehicles carrying more passengers than seats.
    pub overloaded_vehicles: usize,
    /// Sum of `assigned - capacity` over overloaded vehicles.
    pub capacity_violation: usize,
    pub distance_score: f64,
    pub assignment_score: f64,
    pub vehicle_utilization: f64,
    pub overload_penalty: f64,
    pub capacity_penalty: f64,
    pub unassigned_penalty: f64,
}

impl ScoreBreakdown {
    /// Sum of the six weighted terms.
    pub fn score(&self) -> f64 {
        self.distance_score
            + self.assignment_score
            + self.vehicle_utilization
            + self.overload_penalty
            + self.capacity_penalty
            + self.unassigned_penalty
    }
}

/// Scores solutions; higher is better.
///
/// Each unassigned passenger costs 1000 points, which outweighs every other
/// term, so covering all passengers dominates route efficiency.
///
/// # Examples
///
/// ```
/// use rideshare_ga::models::{Destination, Passenger, ProblemData, Solution, Vehicle};
/// use rideshare_ga::evaluation::SolutionEvaluator;
///
/// let problem = ProblemData::new(
///     vec![Passenger::new(1, "Ada", 0.0, 1.0)],
///     vec![Vehicle::new(0, 2, 0.0, 0.0)],
///     Destination::new(0.0, 3.0, 480),
/// )
/// .unwrap();
/// let evaluator = SolutionEvaluator::new(&problem);
///
/// let mut sol = Solution::new(problem.vehicles().to_vec());
/// assert_eq!(evaluator.evaluate(&mut sol), -1000.0);
///
/// sol.vehicles_mut()[0].push_passenger(problem.passengers()[0].clone());
/// assert!(evaluator.evaluate(&mut sol) > 0.0);
/// ```
pub struct SolutionEvaluator<'a> {
    problem: &'a ProblemData,
    routes: RouteCalculator<'a>,
}

impl<'a> SolutionEvaluator<'a> {
    pub fn new(problem: &'a ProblemData) -> Self {
        Self {
            problem,
            routes: RouteCalculator::new(problem),
        }
    }

    /// Scores the solution, storing the score and refreshing every vehicle's
    /// cached distance. Returns the score.
    pub fn evaluate(&self, solution: &mut Solution) -> f64 {
        self.routes.recompute_all(solution);
        let score = self.breakdown(solution).score();
        solution.set_score(score);
        score
    }

    /// Computes the score terms without touching the solution.
    pub fn breakdown(&self, solution: &Solution) -> ScoreBreakdown {
        let mut total_distance = 0.0;
        let mut assigned = 0;
        let mut used_vehicles = 0;
        let mut overloaded_vehicles = 0;
        let mut capacity_violation = 0;

        for vehicle in solution.vehicles() {
            assigned += vehicle.len();
            if vehicle.is_empty() {
                continue;
            }
            used_vehicles += 1;
            total_distance += self.routes.route_distance(vehicle);
            if vehicle.is_overloaded() {
                overloaded_vehicles += 1;
                capacity_violation += vehicle.overload();
            }
        }

        let total = self.problem.num_passengers();
        // may go negative if a caller assigns passengers outside the problem
        let unassigned_count = total as f64 - assigned as f64;

        ScoreBreakdown {
            total_distance,
            assigned,
            unassigned: total.saturating_sub(assigned),
            used_vehicles,
            overloaded_vehicles,
            capacity_violation,
            distance_score: if total_distance > 0.0 {
                DISTANCE_NUMERATOR / total_distance
            } else {
                0.0
            },
            assignment_score: assigned as f64 * ASSIGNED_REWARD,
            vehicle_utilization: used_vehicles as f64 * USED_VEHICLE_PENALTY,
            overload_penalty: overloaded_vehicles as f64 * OVERLOADED_VEHICLE_PENALTY,
            capacity_penalty: capacity_violation as f64 * EXCESS_PASSENGER_PENALTY,
            unassigned_penalty: unassigned_count * UNASSIGNED_PENALTY,
        }
    }
}
