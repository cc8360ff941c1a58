//! Domain model types for the ride-sharing assignment problem.
//!
//! Passengers waiting at pickup points, vehicles with a seat capacity and an
//! ordered pickup list, candidate solutions, and the read-only problem
//! snapshot that ties them to a shared destination.

mod passenger;
mod problem;
mod solution;
mod vehicle;

pub use passenger::Passenger;
pub use problem::{Destination, ProblemData};
pub use solution::Solution;
pub use vehicle::Vehicle;
