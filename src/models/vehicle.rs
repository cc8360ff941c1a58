//! Vehicle type with seat capacity and an ordered pickup list.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Passenger;

/// A car with a driver, a start position, and a number of passenger seats.
///
/// `assigned_passengers` is the pickup order: the vehicle drives from its
/// start to each passenger in sequence, then to the destination. Every
/// [`Solution`](super::Solution) owns its own copies of the vehicles.
///
/// # Examples
///
/// ```
/// use rideshare_ga::models::Vehicle;
///
/// let v = Vehicle::new(0, 4, 52.0, 4.0).with_driver_name("Dee");
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 4);
/// assert_eq!(v.driver_name(), "Dee");
/// assert!(v.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    capacity: u32,
    start_latitude: f64,
    start_longitude: f64,
    #[serde(default)]
    start_address: Option<String>,
    #[serde(default)]
    driver_name: String,
    #[serde(default)]
    assigned_passengers: Vec<Arc<Passenger>>,
    #[serde(default)]
    total_distance: f64,
    #[serde(default)]
    departure_time: Option<u32>,
    #[serde(default)]
    total_time: Option<f64>,
}

impl Vehicle {
    /// Creates a vehicle starting at the given position (degrees).
    pub fn new(id: usize, capacity: u32, start_latitude: f64, start_longitude: f64) -> Self {
        Self {
            id,
            capacity,
            start_latitude,
            start_longitude,
            start_address: None,
            driver_name: String::new(),
            assigned_passengers: Vec::new(),
            total_distance: 0.0,
            departure_time: None,
            total_time: None,
        }
    }

    pub fn with_driver_name(mut self, name: impl Into<String>) -> Self {
        self.driver_name = name.into();
        self
    }

    pub fn with_start_address(mut self, address: impl Into<String>) -> Self {
        self.start_address = Some(address.into());
        self
    }

    /// Copy of this vehicle with no passengers and zero distance.
    ///
    /// Downstream timing fields are cleared as well.
    pub fn empty_copy(&self) -> Self {
        Self {
            assigned_passengers: Vec::new(),
            total_distance: 0.0,
            departure_time: None,
            total_time: None,
            ..self.clone()
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum number of passengers.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn start_latitude(&self) -> f64 {
        self.start_latitude
    }

    pub fn start_longitude(&self) -> f64 {
        self.start_longitude
    }

    /// `(latitude, longitude)` of the start position.
    pub fn start(&self) -> (f64, f64) {
        (self.start_latitude, self.start_longitude)
    }

    pub fn start_address(&self) -> Option<&str> {
        self.start_address.as_deref()
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Passengers in pickup order.
    pub fn passengers(&self) -> &[Arc<Passenger>] {
        &self.assigned_passengers
    }

    /// Mutable pickup list. Callers must refresh the distance afterwards.
    pub fn passengers_mut(&mut self) -> &mut Vec<Arc<Passenger>> {
        &mut self.assigned_passengers
    }

    /// Appends a passenger to the end of the pickup order.
    pub fn push_passenger(&mut self, passenger: Arc<Passenger>) {
        self.assigned_passengers.push(passenger);
    }

    /// Number of assigned passengers.
    pub fn len(&self) -> usize {
        self.assigned_passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_passengers.is_empty()
    }

    /// Seats still free, zero when full or overloaded.
    pub fn spare_capacity(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.len())
    }

    pub fn has_spare_capacity(&self) -> bool {
        self.len() < self.capacity as usize
    }

    /// Passengers assigned beyond capacity.
    pub fn overload(&self) -> usize {
        self.len().saturating_sub(self.capacity as usize)
    }

    pub fn is_overloaded(&self) -> bool {
        self.overload() > 0
    }

    /// Route distance in kilometres (set by the route calculator).
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn set_total_distance(&mut self, km: f64) {
        self.total_distance = km;
    }

    /// Departure time in minutes since midnight, set after routing.
    pub fn departure_time(&self) -> Option<u32> {
        self.departure_time
    }

    pub fn set_departure_time(&mut self, minutes: u32) {
        self.departure_time = Some(minutes);
    }

    /// Total driving time in minutes, set after routing.
    pub fn total_time(&self) -> Option<f64> {
        self.total_time
    }

    pub fn set_total_time(&mut self, minutes: f64) {
        self.total_time = Some(minutes);
    }
}
