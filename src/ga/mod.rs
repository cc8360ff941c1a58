//! Genetic algorithm for assigning passengers to vehicles.
//!
//! - [`GaConfig`] — Run parameters and the seeded random generator
//! - [`PopulationManager`] — Greedy, even, and random initial solutions
//! - [`TournamentSelection`] — Parent selection
//! - [`IndexCrossover`] — Vehicle-slot crossover with cheapest-append repair
//! - [`MutationOperator`] — Swap, reorder, move, route and capacity repair
//! - [`Optimizer`] — Generational loop with elitism and early stopping

mod config;
mod crossover;
mod mutation;
mod optimizer;
mod population;
mod selection;

pub use config::{GaConfig, MIN_POPULATION_SIZE};
pub use crossover::IndexCrossover;
pub use mutation::{MutationKind, MutationOperator};
pub use optimizer::{OptimizationStats, Optimizer};
pub use population::PopulationManager;
pub use selection::TournamentSelection;
