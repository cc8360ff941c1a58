//! # rideshare-ga
//!
//! Assigns ride-sharing passengers to a fleet of capacity-constrained
//! vehicles heading to one shared destination, using a genetic algorithm that
//! favours serving every passenger first and short total driving distance
//! second.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Passenger, Vehicle, Solution, ProblemData)
//! - [`distance`] — Great-circle distance and route distance model
//! - [`evaluation`] — Fitness score of a candidate assignment
//! - [`ga`] — Population seeding, selection, crossover, mutation, and the optimizer loop
//! - `json` — JSON input/output (feature `json`)

pub mod distance;
mod error;
pub mod evaluation;
pub mod ga;
#[cfg(feature = "json")]
pub mod json;
pub mod models;

pub use error::ValidationError;
