//! Problem snapshot: passengers, vehicle templates, and the shared destination.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Passenger, Vehicle};
use crate::error::ValidationError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Where every vehicle ends up, and when it should arrive.
///
/// # Examples
///
/// ```
/// use rideshare_ga::models::Destination;
///
/// let d = Destination::new(52.09, 5.12, 8 * 60 + 30);
/// assert_eq!(d.target_time_minutes(), 510);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    latitude: f64,
    longitude: f64,
    target_time_minutes: u32,
}

impl Destination {
    /// Creates a destination; `target_time_minutes` counts from midnight.
    pub fn new(latitude: f64, longitude: f64, target_time_minutes: u32) -> Self {
        Self {
            latitude,
            longitude,
            target_time_minutes,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Desired arrival time in minutes since midnight.
    pub fn target_time_minutes(&self) -> u32 {
        self.target_time_minutes
    }
}

/// Read-only input of one optimization run.
///
/// Vehicle templates are never mutated: solutions obtain their own empty
/// copies through [`RouteCalculator::deep_copy_vehicles`](crate::distance::RouteCalculator::deep_copy_vehicles).
///
/// # Examples
///
/// ```
/// use rideshare_ga::models::{Destination, Passenger, ProblemData, Vehicle};
///
/// let problem = ProblemData::new(
///     vec![Passenger::new(1, "Ada", 0.0, 1.0)],
///     vec![Vehicle::new(0, 2, 0.0, 0.0)],
///     Destination::new(0.0, 3.0, 480),
/// )
/// .unwrap();
/// assert_eq!(problem.num_passengers(), 1);
/// assert_eq!(problem.total_capacity(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemData {
    passengers: Vec<Arc<Passenger>>,
    vehicles: Vec<Vehicle>,
    destination: Destination,
}

impl ProblemData {
    /// Validates and freezes the input.
    ///
    /// Empty passenger or vehicle lists are accepted; the optimizer answers
    /// them with an empty solution.
    pub fn new(
        passengers: Vec<Passenger>,
        vehicles: Vec<Vehicle>,
        destination: Destination,
    ) -> Result<Self, ValidationError> {
        check_position(
            "destination",
            destination.latitude(),
            destination.longitude(),
        )?;
        if destination.target_time_minutes() >= MINUTES_PER_DAY {
            return Err(ValidationError::TargetTimeOutOfRange(
                destination.target_time_minutes(),
            ));
        }

        let mut ids = HashSet::new();
        for p in &passengers {
            check_position(
                &format!("passenger {}", p.id()),
                p.latitude(),
                p.longitude(),
            )?;
            if !ids.insert(p.id()) {
                return Err(ValidationError::DuplicatePassenger(p.id()));
            }
        }

        let mut ids = HashSet::new();
        for v in &vehicles {
            if v.capacity() == 0 {
                return Err(ValidationError::ZeroCapacity { vehicle_id: v.id() });
            }
            check_position(
                &format!("vehicle {}", v.id()),
                v.start_latitude(),
                v.start_longitude(),
            )?;
            if !ids.insert(v.id()) {
                return Err(ValidationError::DuplicateVehicle(v.id()));
            }
        }

        Ok(Self {
            passengers: passengers.into_iter().map(Arc::new).collect(),
            vehicles: vehicles.iter().map(Vehicle::empty_copy).collect(),
            destination,
        })
    }

    pub fn passengers(&self) -> &[Arc<Passenger>] {
        &self.passengers
    }

    /// Vehicle templates (always empty).
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn num_passengers(&self) -> usize {
        self.passengers.len()
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Sum of all vehicle capacities.
    pub fn total_capacity(&self) -> usize {
        self.vehicles.iter().map(|v| v.capacity() as usize).sum()
    }

    /// `true` when there are not enough seats for every passenger.
    pub fn has_capacity_issue(&self) -> bool {
        self.total_capacity() < self.num_passengers()
    }
}

fn check_position(what: &str, latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(ValidationError::NonFiniteCoordinate {
            what: what.to_string(),
            latitude,
            longitude,
        });
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::CoordinateOutOfRange {
            what: what.to_string(),
            latitude,
            longitude,
        });
    }
    Ok(())
}
