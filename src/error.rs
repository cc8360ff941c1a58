//! Validation errors raised at the crate boundary.

/// Rejected problem input or configuration.
///
/// Infeasible but well-formed input (no passengers, no vehicles, not enough
/// seats) is not an error; see [`Optimizer`](crate::ga::Optimizer).
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("vehicle {vehicle_id} has zero capacity")]
    ZeroCapacity { vehicle_id: usize },

    #[error("{what} has a non-finite coordinate ({latitude}, {longitude})")]
    NonFiniteCoordinate {
        what: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("{what} has an out-of-range coordinate ({latitude}, {longitude})")]
    CoordinateOutOfRange {
        what: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("target time {0} is not within a day (0..1440 minutes)")]
    TargetTimeOutOfRange(u32),

    #[error("passenger id {0} appears more than once")]
    DuplicatePassenger(usize),

    #[error("vehicle id {0} appears more than once")]
    DuplicateVehicle(usize),

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("tournament size must be at least 1")]
    ZeroTournamentSize,

    #[cfg(feature = "json")]
    #[error("malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),
}
