//! Tournament selection.

use rand::Rng;

use crate::models::Solution;

/// Picks parents by sampling competitors with replacement and keeping the
/// best-scoring one.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use rideshare_ga::models::Solution;
/// use rideshare_ga::ga::TournamentSelection;
///
/// let mut population = vec![Solution::empty(), Solution::empty()];
/// population[1].set_score(10.0);
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let selection = TournamentSelection::new(50);
/// // tournament size is capped at the population size
/// let winner = selection.select(&population, &mut rng).unwrap();
/// assert!(winner.score() <= 10.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    pub fn new(tournament_size: usize) -> Self {
        Self {
            tournament_size: tournament_size.max(1),
        }
    }

    /// Index of the tournament winner, or `None` for an empty population.
    ///
    /// The first competitor drawn wins ties.
    pub fn select_index<R: Rng>(&self, population: &[Solution], rng: &mut R) -> Option<usize> {
        if population.is_empty() {
            return None;
        }
        let rounds = self.tournament_size.min(population.len());
        let mut best = rng.random_range(0..population.len());
        for _ in 1..rounds {
            let challenger = rng.random_range(0..population.len());
            if population[challenger].score() > population[best].score() {
                best = challenger;
            }
        }
        Some(best)
    }

    /// Clone of the tournament winner.
    pub fn select<R: Rng>(&self, population: &[Solution], rng: &mut R) -> Option<Solution> {
        self.select_index(population, rng)
            .map(|idx| population[idx].clone())
    }

    /// Indices of two parents. The second is redrawn until it differs from
    /// the first, unless the population has a single member.
    pub fn select_pair<R: Rng>(
        &self,
        population: &[Solution],
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        let first = self.select_index(population, rng)?;
        let mut second = self.select_index(population, rng)?;
        if population.len() > 1 {
            while second == first {
                second = self.select_index(population, rng)?;
            }
        }
        Some((first, second))
    }
}
