//! Route distance model for a fixed pickup sequence.

use std::sync::Arc;

use super::haversine_km;
use crate::models::{Passenger, ProblemData, Solution, Vehicle};

/// Computes straight-line route distances against a problem's destination.
///
/// A route is `start → passenger[0] → … → passenger[n-1] → destination`, in
/// assignment order. The order is not optimized here; that is left to the
/// mutation operators.
///
/// # Examples
///
/// ```
/// use rideshare_ga::models::{Destination, Passenger, ProblemData, Vehicle};
/// use rideshare_ga::distance::RouteCalculator;
///
/// let problem = ProblemData::new(
///     vec![Passenger::new(1, "Ada", 0.0, 1.0)],
///     vec![Vehicle::new(0, 2, 0.0, 0.0)],
///     Destination::new(0.0, 3.0, 480),
/// )
/// .unwrap();
/// let calc = RouteCalculator::new(&problem);
///
/// let mut vehicles = calc.deep_copy_vehicles();
/// assert_eq!(calc.route_distance(&vehicles[0]), 0.0);
///
/// vehicles[0].push_passenger(problem.passengers()[0].clone());
/// assert!(calc.route_distance(&vehicles[0]) > 0.0);
/// ```
pub struct RouteCalculator<'a> {
    problem: &'a ProblemData,
}

impl<'a> RouteCalculator<'a> {
    pub fn new(problem: &'a ProblemData) -> Self {
        Self { problem }
    }

    /// Route distance (km) of the vehicle's current pickup order.
    ///
    /// Zero when no passenger is assigned.
    pub fn route_distance(&self, vehicle: &Vehicle) -> f64 {
        self.sequence_distance(vehicle.start(), vehicle.passengers())
    }

    /// Route distance (km) of an arbitrary pickup order starting at `start`.
    pub fn sequence_distance(&self, start: (f64, f64), passengers: &[Arc<Passenger>]) -> f64 {
        let (first, last) = match (passengers.first(), passengers.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        let mut dist = haversine_km(start, first.position());
        for pair in passengers.windows(2) {
            dist += haversine_km(pair[0].position(), pair[1].position());
        }
        dist + haversine_km(last.position(), self.destination())
    }

    /// Approximate extra distance (km) of appending `passenger` to the end of
    /// the vehicle's pickup order. The vehicle is not modified.
    ///
    /// Measured against the old last leg to the destination rather than a
    /// full re-route.
    pub fn marginal_insertion_cost(&self, vehicle: &Vehicle, passenger: &Passenger) -> f64 {
        let destination = self.destination();
        let to_destination = haversine_km(passenger.position(), destination);
        match vehicle.passengers().last() {
            None => haversine_km(vehicle.start(), passenger.position()) + to_destination,
            Some(last) => {
                haversine_km(last.position(), passenger.position()) + to_destination
                    - haversine_km(last.position(), destination)
            }
        }
    }

    /// Refreshes every vehicle's cached distance.
    pub fn recompute_all(&self, solution: &mut Solution) {
        for vehicle in solution.vehicles_mut() {
            let dist = self.route_distance(vehicle);
            vehicle.set_total_distance(dist);
        }
    }

    /// Fresh, empty copies of the problem's vehicle templates.
    ///
    /// The only way new solutions acquire vehicles.
    pub fn deep_copy_vehicles(&self) -> Vec<Vehicle> {
        self.problem
            .vehicles()
            .iter()
            .map(Vehicle::empty_copy)
            .collect()
    }

    fn destination(&self) -> (f64, f64) {
        self.problem.destination().position()
    }
}
