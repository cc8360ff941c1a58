//! Generational loop.
//!
//! # Algorithm
//!
//! 1. Empty input (no passengers or no vehicles) yields an empty solution.
//! 2. Seed the population (caller-supplied or [`PopulationManager`]).
//! 3. Each generation keeps the top `elitism_rate` share unchanged and fills
//!    the rest with children of two distinct tournament winners, each mutated
//!    with probability `mutation_rate`.
//! 4. The generation's best replaces the global best only if it scores higher
//!    and carries no overload, unless the fleet has fewer seats than there are
//!    passengers, in which case overloaded solutions are accepted too.
//! 5. Stop after the generation budget or after
//!    `max_generations_without_improvement` generations without a new best.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, instrument, warn, Level};

use super::config::GaConfig;
use super::crossover::IndexCrossover;
use super::mutation::MutationOperator;
use super::population::PopulationManager;
use super::selection::TournamentSelection;
use crate::distance::RouteCalculator;
use crate::evaluation::SolutionEvaluator;
use crate::models::{ProblemData, Solution};

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationStats {
    /// Generations actually evolved.
    pub generations_run: usize,
    /// `true` if the no-improvement limit ended the run.
    pub stopped_early: bool,
    pub best_score: f64,
    /// Fewer seats than passengers in the problem.
    pub has_capacity_issue: bool,
}

/// Genetic algorithm for one optimization run.
///
/// Consumed by [`run`](Self::run); build a fresh optimizer per run.
///
/// # Examples
///
/// ```
/// use rideshare_ga::models::{Destination, Passenger, ProblemData, Vehicle};
/// use rideshare_ga::ga::{GaConfig, Optimizer};
///
/// let problem = ProblemData::new(
///     vec![Passenger::new(1, "Ada", 0.0, 1.0), Passenger::new(2, "Bo", 0.0, 2.0)],
///     vec![Vehicle::new(0, 2, 0.0, 0.0)],
///     Destination::new(0.0, 3.0, 480),
/// )
/// .unwrap();
/// let config = GaConfig::default().with_seed(42);
///
/// let best = Optimizer::new(problem, config).unwrap().run(30);
/// assert_eq!(best.assigned_count(), 2);
/// assert!(!best.has_overload());
/// ```
pub struct Optimizer {
    problem: ProblemData,
    config: GaConfig,
    rng: StdRng,
    initial_population: Vec<Solution>,
}

impl Optimizer {
    /// Validates the configuration and prepares the run's random generator.
    pub fn new(problem: ProblemData, config: GaConfig) -> Result<Self, crate::ValidationError> {
        config.validate()?;
        let rng = config.create_rng();
        Ok(Self {
            problem,
            config,
            rng,
            initial_population: Vec::new(),
        })
    }

    /// Starts from the given solutions instead of seeding a new population.
    /// Ignored if empty. Solutions are rescored against this problem.
    pub fn with_initial_population(mut self, population: Vec<Solution>) -> Self {
        self.initial_population = population;
        self
    }

    pub fn problem(&self) -> &ProblemData {
        &self.problem
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Evolves for at most `generations` generations and returns the best
    /// solution found.
    pub fn run(self, generations: usize) -> Solution {
        self.run_with_stats(generations).0
    }

    /// Like [`run`](Self::run), also returning run statistics.
    #[instrument(skip(self), level = Level::INFO)]
    pub fn run_with_stats(self, generations: usize) -> (Solution, OptimizationStats) {
        let Self {
            problem,
            config,
            mut rng,
            initial_population,
        } = self;

        let has_capacity_issue = problem.has_capacity_issue();
        let mut stats = OptimizationStats {
            generations_run: 0,
            stopped_early: false,
            best_score: 0.0,
            has_capacity_issue,
        };

        if problem.num_passengers() == 0 || problem.num_vehicles() == 0 {
            info!(
                passengers = problem.num_passengers(),
                vehicles = problem.num_vehicles(),
                "nothing to assign"
            );
            let mut empty = Solution::empty();
            empty.set_capacity_issue(has_capacity_issue);
            return (empty, stats);
        }

        if has_capacity_issue {
            warn!(
                capacity = problem.total_capacity(),
                passengers = problem.num_passengers(),
                "fleet capacity is below passenger count, accepting overloaded solutions"
            );
        }

        let population_size = config.effective_population_size();
        info!(
            passengers = problem.num_passengers(),
            vehicles = problem.num_vehicles(),
            population_size,
            seed = ?config.seed,
            "starting optimization"
        );

        let evaluator = SolutionEvaluator::new(&problem);
        let mut population = if initial_population.is_empty() {
            PopulationManager::new(&problem).initial_population(population_size, &mut rng)
        } else {
            let mut supplied = initial_population;
            for solution in &mut supplied {
                evaluator.evaluate(solution);
            }
            supplied
        };

        let Some(best) = best_of(&population).cloned() else {
            return (Solution::empty(), stats);
        };
        let mut tracker = BestTracker::new(best, has_capacity_issue);

        let breeder = Breeder {
            config: &config,
            selection: TournamentSelection::new(config.tournament_size),
            crossover: IndexCrossover::new(&problem),
            mutation: MutationOperator::new(&problem)
                .with_capacity_increasing_moves(config.allow_capacity_increasing_moves),
        };

        for generation in 0..generations {
            population = breeder.next_generation(&population, population_size, &mut rng);
            stats.generations_run = generation + 1;

            if let Some(candidate) = best_of(&population) {
                tracker.offer(candidate);
                debug!(
                    generation,
                    generation_best = candidate.score(),
                    global_best = tracker.best.score(),
                    stagnation = tracker.stagnation,
                    "generation done"
                );
            }

            if tracker.stagnation >= config.max_generations_without_improvement {
                stats.stopped_early = true;
                break;
            }
        }

        let mut best = tracker.best;
        finalize(&problem, &mut best, has_capacity_issue);
        stats.best_score = best.score();
        info!(
            best_score = best.score(),
            generations = stats.generations_run,
            stopped_early = stats.stopped_early,
            "optimization finished"
        );
        (best, stats)
    }
}

/// Global best so far and the number of generations since it last changed.
struct BestTracker {
    best: Solution,
    stagnation: usize,
    has_capacity_issue: bool,
}

impl BestTracker {
    fn new(best: Solution, has_capacity_issue: bool) -> Self {
        Self {
            best,
            stagnation: 0,
            has_capacity_issue,
        }
    }

    /// Offers a generation's best. Returns `true` if it became the global best.
    fn offer(&mut self, candidate: &Solution) -> bool {
        if accepts(candidate, self.best.score(), self.has_capacity_issue) {
            self.best = candidate.clone();
            self.stagnation = 0;
            true
        } else {
            self.stagnation += 1;
            false
        }
    }
}

/// Strictly better, and overload-free unless the fleet is short of seats.
fn accepts(candidate: &Solution, best_score: f64, has_capacity_issue: bool) -> bool {
    candidate.score() > best_score && (!candidate.has_overload() || has_capacity_issue)
}

/// Operators that turn one generation into the next.
struct Breeder<'a> {
    config: &'a GaConfig,
    selection: TournamentSelection,
    crossover: IndexCrossover<'a>,
    mutation: MutationOperator<'a>,
}

impl Breeder<'_> {
    fn next_generation<R: Rng>(
        &self,
        population: &[Solution],
        size: usize,
        rng: &mut R,
    ) -> Vec<Solution> {
        let mut ranked: Vec<&Solution> = population.iter().collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));

        let elites = self.config.elite_count().min(ranked.len());
        let mut next: Vec<Solution> = ranked[..elites].iter().map(|s| (*s).clone()).collect();

        while next.len() < size {
            let Some((a, b)) = self.selection.select_pair(population, rng) else {
                break;
            };
            let mut child = self
                .crossover
                .crossover(&population[a], &population[b], rng);
            if rng.random_bool(self.config.mutation_rate) {
                self.mutation.mutate(&mut child, rng);
            }
            next.push(child);
        }
        next
    }
}

/// Refreshes route distances of the final answer and reports leftover overload.
fn finalize(problem: &ProblemData, best: &mut Solution, has_capacity_issue: bool) {
    RouteCalculator::new(problem).recompute_all(best);
    best.set_capacity_issue(has_capacity_issue);

    if best.has_overload() {
        warn!(
            overloaded_vehicles = best.overloaded_vehicles(),
            "best solution still exceeds vehicle capacity"
        );
    }
    debug_assert!(!best.has_duplicate_assignments());
}

fn best_of(population: &[Solution]) -> Option<&Solution> {
    population
        .iter()
        .reduce(|best, s| if s.score() > best.score() { s } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rand::SeedableRng;

    use crate::models::{Destination, Passenger, Vehicle};

    fn config() -> GaConfig {
        GaConfig::default().with_seed(17)
    }

    fn ids(solution: &Solution, vehicle: usize) -> Vec<usize> {
        solution.vehicles()[vehicle]
            .passengers()
            .iter()
            .map(|p| p.id())
            .collect()
    }

    #[test]
    fn test_empty_passengers() {
        let problem = ProblemData::new(
            vec![],
            vec![Vehicle::new(0, 4, 0.0, 0.0), Vehicle::new(1, 4, 0.0, 0.0)],
            Destination::new(0.0, 3.0, 480),
        )
        .expect("valid");
        let (sol, stats) = Optimizer::new(problem, config())
            .expect("valid config")
            .run_with_stats(100);
        assert!(sol.is_empty());
        assert_eq!(sol.assigned_count(), 0);
        assert_eq!(stats.generations_run, 0);
    }

    #[test]
    fn test_empty_vehicles() {
        let problem = ProblemData::new(
            vec![Passenger::new(1, "a", 0.0, 1.0)],
            vec![],
            Destination::new(0.0, 3.0, 480),
        )
        .expect("valid");
        let sol = Optimizer::new(problem, config()).expect("valid config").run(10);
        assert!(sol.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let problem = ProblemData::new(vec![], vec![], Destination::new(0.0, 0.0, 0))
            .expect("valid");
        assert!(Optimizer::new(problem, GaConfig::default().with_mutation_rate(-0.1)).is_err());
    }

    #[test]
    fn test_trivial_ordering() {
        let problem = ProblemData::new(
            vec![Passenger::new(1, "a", 0.0, 1.0), Passenger::new(2, "b", 0.0, 2.0)],
            vec![Vehicle::new(0, 2, 0.0, 0.0)],
            Destination::new(0.0, 3.0, 480),
        )
        .expect("valid");
        let sol = Optimizer::new(problem, config()).expect("valid config").run(20);
        assert_eq!(ids(&sol, 0), vec![1, 2]);
        assert!(sol.vehicles()[0].total_distance() > 0.0);
    }

    #[test]
    fn test_zero_generations_returns_seed_best() {
        let problem = ProblemData::new(
            vec![Passenger::new(1, "a", 0.0, 1.0), Passenger::new(2, "b", 0.0, 2.0)],
            vec![Vehicle::new(0, 2, 0.0, 0.0), Vehicle::new(1, 2, 0.0, 0.5)],
            Destination::new(0.0, 3.0, 480),
        )
        .expect("valid");
        let (sol, stats) = Optimizer::new(problem, config())
            .expect("valid config")
            .run_with_stats(0);
        assert_eq!(stats.generations_run, 0);
        assert_eq!(sol.assigned_count(), 2);
    }

    #[test]
    fn test_same_seed_same_result() {
        let build = || {
            ProblemData::new(
                (1..=8)
                    .map(|i| {
                        let lng = 0.07 * (i * i % 5) as f64;
                        Passenger::new(i, format!("p{i}"), 0.1 * i as f64, lng)
                    })
                    .collect(),
                vec![
                    Vehicle::new(0, 3, 0.0, 0.0),
                    Vehicle::new(1, 3, 0.5, 0.2),
                    Vehicle::new(2, 3, 0.9, 0.1),
                ],
                Destination::new(1.0, 1.0, 480),
            )
            .expect("valid")
        };
        let a = Optimizer::new(build(), config()).expect("valid config").run(15);
        let b = Optimizer::new(build(), config()).expect("valid config").run(15);
        assert_eq!(a, b);
    }

    #[test]
    fn test_early_stop() {
        let problem = ProblemData::new(
            vec![Passenger::new(1, "a", 0.0, 1.0)],
            vec![Vehicle::new(0, 2, 0.0, 0.0)],
            Destination::new(0.0, 3.0, 480),
        )
        .expect("valid");
        let (_, stats) = Optimizer::new(
            problem,
            config().with_max_generations_without_improvement(3),
        )
        .expect("valid config")
        .run_with_stats(1000);
        // a single passenger has one possible assignment
        assert!(stats.stopped_early);
        assert_eq!(stats.generations_run, 3);
    }

    #[test]
    fn test_warm_start_is_rescored() {
        let problem = ProblemData::new(
            vec![Passenger::new(1, "a", 0.0, 1.0), Passenger::new(2, "b", 0.0, 2.0)],
            vec![Vehicle::new(0, 2, 0.0, 0.0)],
            Destination::new(0.0, 3.0, 480),
        )
        .expect("valid");
        let mut seed = Solution::new(problem.vehicles().to_vec());
        seed.vehicles_mut()[0].push_passenger(problem.passengers()[0].clone());
        seed.vehicles_mut()[0].push_passenger(problem.passengers()[1].clone());
        seed.set_score(f64::MAX);

        let (sol, stats) = Optimizer::new(problem, config())
            .expect("valid config")
            .with_initial_population(vec![seed])
            .run_with_stats(5);
        assert!(stats.best_score < 1000.0);
        assert_eq!(ids(&sol, 0), vec![1, 2]);
    }

    #[test]
    fn test_capacity_issue_flag() {
        let problem = ProblemData::new(
            vec![
                Passenger::new(1, "a", 0.0, 1.0),
                Passenger::new(2, "b", 0.0, 2.0),
                Passenger::new(3, "c", 0.0, 2.5),
            ],
            vec![Vehicle::new(0, 1, 0.0, 0.0)],
            Destination::new(0.0, 3.0, 480),
        )
        .expect("valid");
        let (sol, stats) = Optimizer::new(problem, config())
            .expect("valid config")
            .run_with_stats(10);
        assert!(stats.has_capacity_issue);
        assert!(sol.has_capacity_issue());
        assert!(sol.num_vehicles() <= 1);
    }

    /// One vehicle of capacity 1, carrying `riders` passengers, with a fixed score.
    fn scored(riders: usize, score: f64) -> Solution {
        let mut vehicle = Vehicle::new(0, 1, 0.0, 0.0);
        for i in 0..riders {
            vehicle.push_passenger(Arc::new(Passenger::new(i, "p", 0.0, 1.0)));
        }
        let mut sol = Solution::new(vec![vehicle]);
        sol.set_score(score);
        sol
    }

    #[test]
    fn test_accepts_rejects_overload_when_seats_suffice() {
        let overloaded = scored(2, 500.0);
        assert!(overloaded.has_overload());
        assert!(!accepts(&overloaded, 100.0, false));
        assert!(accepts(&scored(1, 500.0), 100.0, false));
    }

    #[test]
    fn test_accepts_overload_when_short_of_seats() {
        assert!(accepts(&scored(2, 500.0), 100.0, true));
        assert!(!accepts(&scored(2, 50.0), 100.0, true));
    }

    #[test]
    fn test_equal_score_counts_as_stagnation() {
        let mut tracker = BestTracker::new(scored(1, 100.0), false);
        let tie = scored(0, 100.0);

        assert!(!tracker.offer(&tie));
        assert_eq!(tracker.stagnation, 1);
        assert_eq!(tracker.best.assigned_count(), 1);

        assert!(!tracker.offer(&scored(2, 900.0)));
        assert_eq!(tracker.stagnation, 2);

        assert!(tracker.offer(&scored(1, 100.5)));
        assert_eq!(tracker.stagnation, 0);
        assert!((tracker.best.score() - 100.5).abs() < 1e-10);
    }

    #[test]
    fn test_next_generation_keeps_elites() {
        let problem = ProblemData::new(
            (1..=6)
                .map(|i| Passenger::new(i, format!("p{i}"), 0.1 * i as f64, 0.2))
                .collect(),
            vec![Vehicle::new(0, 3, 0.0, 0.0), Vehicle::new(1, 3, 0.5, 0.5)],
            Destination::new(1.0, 1.0, 480),
        )
        .expect("valid");
        let config = config();
        let size = config.effective_population_size();
        let mut rng = StdRng::seed_from_u64(3);

        let mut population = PopulationManager::new(&problem).initial_population(size, &mut rng);
        // distinct scores so the ranking is unambiguous
        for (i, sol) in population.iter_mut().enumerate() {
            sol.set_score(i as f64);
        }

        let breeder = Breeder {
            config: &config,
            selection: TournamentSelection::new(config.tournament_size),
            crossover: IndexCrossover::new(&problem),
            mutation: MutationOperator::new(&problem),
        };
        let next = breeder.next_generation(&population, size, &mut rng);

        assert_eq!(next.len(), size);
        let elites = config.elite_count();
        assert_eq!(elites, 10);
        for (rank, elite) in next[..elites].iter().enumerate() {
            let expected = &population[size - 1 - rank];
            assert_eq!(elite, expected);
            assert!((elite.score() - (size - 1 - rank) as f64).abs() < 1e-10);
        }
    }
}
