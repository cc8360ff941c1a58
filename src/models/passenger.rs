//! Passenger type.

use serde::{Deserialize, Serialize};

/// A rider waiting to be picked up and driven to the shared destination.
///
/// Passengers are shared between candidate solutions as `Arc<Passenger>` and
/// are never modified while an optimization runs. The estimated pickup time is
/// filled in afterwards by whoever turns the assignment into directions.
///
/// # Examples
///
/// ```
/// use rideshare_ga::models::Passenger;
///
/// let p = Passenger::new(7, "Ada", 52.37, 4.89).with_address("Dam 1");
/// assert_eq!(p.id(), 7);
/// assert_eq!(p.name(), "Ada");
/// assert_eq!(p.address(), Some("Dam 1"));
/// assert!(p.estimated_pickup_time().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    id: usize,
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    estimated_pickup_time: Option<u32>,
}

impl Passenger {
    /// Creates a passenger at the given position (degrees).
    pub fn new(id: usize, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
            address: None,
            estimated_pickup_time: None,
        }
    }

    /// Sets a street address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the estimated pickup time in minutes since midnight.
    pub fn with_estimated_pickup_time(mut self, minutes: u32) -> Self {
        self.estimated_pickup_time = Some(minutes);
        self
    }

    /// Unique, stable passenger ID.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Pickup time in minutes since midnight, once known.
    pub fn estimated_pickup_time(&self) -> Option<u32> {
        self.estimated_pickup_time
    }

    /// `(latitude, longitude)` pair.
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
