//! Genetic algorithm configuration.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Smallest population the optimizer will run with.
pub const MIN_POPULATION_SIZE: usize = 50;

/// Parameters of one optimization run.
///
/// # Examples
///
/// ```
/// use rideshare_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_mutation_rate(0.5)
///     .with_seed(42);
/// assert_eq!(config.population_size, 50); // floored
/// assert_eq!(config.seed, Some(42));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation, at least [`MIN_POPULATION_SIZE`].
    pub population_size: usize,
    /// Probability that a child is mutated.
    pub mutation_rate: f64,
    /// Fraction of the population carried over unchanged.
    pub elitism_rate: f64,
    /// Competitors drawn per tournament.
    pub tournament_size: usize,
    /// Generations without a new global best before stopping early.
    pub max_generations_without_improvement: usize,
    /// Seed for the run's random generator; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Whether the Move mutation may put a passenger into a full vehicle.
    pub allow_capacity_increasing_moves: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: MIN_POPULATION_SIZE,
            mutation_rate: 0.3,
            elitism_rate: 0.2,
            tournament_size: 5,
            max_generations_without_improvement: 20,
            seed: None,
            allow_capacity_increasing_moves: true,
        }
    }
}

impl GaConfig {
    /// Sets the population size, floored at [`MIN_POPULATION_SIZE`].
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(MIN_POPULATION_SIZE);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_elitism_rate(mut self, rate: f64) -> Self {
        self.elitism_rate = rate;
        self
    }

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    pub fn with_max_generations_without_improvement(mut self, generations: usize) -> Self {
        self.max_generations_without_improvement = generations;
        self
    }

    /// Makes the run replayable.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_capacity_increasing_moves(mut self, allow: bool) -> Self {
        self.allow_capacity_increasing_moves = allow;
        self
    }

    /// Population size actually used, applying the floor to values that
    /// bypassed the builder (e.g. deserialized configs).
    pub fn effective_population_size(&self) -> usize {
        self.population_size.max(MIN_POPULATION_SIZE)
    }

    /// Number of elites copied into each new generation.
    pub fn elite_count(&self) -> usize {
        (self.effective_population_size() as f64 * self.elitism_rate) as usize
    }

    /// Checks rates and tournament size.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("elitism_rate", self.elitism_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidRate { name, value });
            }
        }
        if self.tournament_size == 0 {
            return Err(ValidationError::ZeroTournamentSize);
        }
        Ok(())
    }

    /// Creates the run's random generator.
    pub fn create_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
