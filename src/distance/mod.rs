//! Distance model.
//!
//! Great-circle distances between coordinates and route distances for a
//! vehicle's fixed pickup order.

mod great_circle;
mod route;

pub use great_circle::haversine_km;
pub use route::RouteCalculator;
