//! Candidate assignment of passengers to vehicles.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Passenger, ProblemData, Vehicle};

/// One candidate assignment plus its fitness score (higher is better).
///
/// A solution owns its vehicles outright; cloning a solution clones the
/// vehicles and their pickup lists, while passengers stay shared.
/// Each passenger appears at most once across all vehicles. Passengers that
/// appear nowhere are unassigned, which the evaluator penalises.
///
/// # Examples
///
/// ```
/// use rideshare_ga::models::{Solution, Vehicle};
///
/// let sol = Solution::new(vec![Vehicle::new(0, 4, 0.0, 0.0)]);
/// assert_eq!(sol.num_vehicles(), 1);
/// assert_eq!(sol.assigned_count(), 0);
/// assert_eq!(sol.score(), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    vehicles: Vec<Vehicle>,
    score: f64,
    #[serde(default)]
    has_capacity_issue: bool,
}

impl Solution {
    /// Creates an unscored solution from owned vehicles.
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles,
            score: 0.0,
            has_capacity_issue: false,
        }
    }

    /// A solution with no vehicles, returned for infeasible input.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicles_mut(&mut self) -> &mut [Vehicle] {
        &mut self.vehicles
    }

    /// Looks up a vehicle by its ID.
    pub fn vehicle(&self, id: usize) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Fitness score as last computed by the evaluator.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// `true` when the problem this solution answers had fewer seats than
    /// passengers. Set by the optimizer on its final result.
    pub fn has_capacity_issue(&self) -> bool {
        self.has_capacity_issue
    }

    pub fn set_capacity_issue(&mut self, flag: bool) {
        self.has_capacity_issue = flag;
    }

    /// Passengers assigned across all vehicles.
    pub fn assigned_count(&self) -> usize {
        self.vehicles.iter().map(|v| v.len()).sum()
    }

    /// Sum of the vehicles' cached route distances (km).
    pub fn total_distance(&self) -> f64 {
        self.vehicles.iter().map(|v| v.total_distance()).sum()
    }

    /// Vehicles carrying more passengers than seats.
    pub fn overloaded_vehicles(&self) -> usize {
        self.vehicles.iter().filter(|v| v.is_overloaded()).count()
    }

    pub fn has_overload(&self) -> bool {
        self.vehicles.iter().any(|v| v.is_overloaded())
    }

    /// `true` if any passenger ID is assigned more than once.
    pub fn has_duplicate_assignments(&self) -> bool {
        let mut seen = HashSet::new();
        self.vehicles
            .iter()
            .flat_map(|v| v.passengers())
            .any(|p| !seen.insert(p.id()))
    }

    /// IDs of every assigned passenger.
    pub fn assigned_ids(&self) -> HashSet<usize> {
        self.vehicles
            .iter()
            .flat_map(|v| v.passengers())
            .map(|p| p.id())
            .collect()
    }

    /// Problem passengers that no vehicle picks up.
    pub fn unassigned_passengers(&self, problem: &ProblemData) -> Vec<Arc<Passenger>> {
        let assigned = self.assigned_ids();
        problem
            .passengers()
            .iter()
            .filter(|p| !assigned.contains(&p.id()))
            .cloned()
            .collect()
    }
}
