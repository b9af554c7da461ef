use super::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Crossover used by strategies that breed a single offspring.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Crossover {
    OnePoint,
    #[default]
    TwoPoint,
}

/// Parameters of a genetic algorithm run.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub population_size: usize,
    /// Probability that a non-elite individual gets one gene rewritten.
    pub mutation_rate: f64,
    /// Probability that an individual mates.
    pub crossover_rate: f64,
    /// Number of top ranked individuals protected from mutation.
    pub elitism_count: usize,
    /// Share of makespan in fitness, the rest goes to cost.
    pub time_weight: f64,
    /// Size the population is truncated to after breeding.
    /// Defaults to `population_size`.
    pub target_size: Option<usize>,
    pub max_generations: usize,
    /// Wall clock budget in seconds.
    pub time_limit: Option<f64>,
    /// Seed of the random generator, entropy if missing.
    pub seed: Option<u64>,
    /// Evaluate individuals on the rayon thread pool.
    pub parallel: bool,
    pub crossover: Crossover,
    /// Let the previous generation compete with its offspring when truncating.
    pub merge_parents: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_rate: 0.1,
            crossover_rate: 0.9,
            elitism_count: 2,
            time_weight: 0.5,
            target_size: None,
            max_generations: 500,
            time_limit: None,
            seed: None,
            parallel: false,
            crossover: Crossover::default(),
            merge_parents: true,
        }
    }
}

impl Config {
    /// Size the population returns to at the end of every generation.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target_size.unwrap_or(self.population_size)
    }

    /// Wall clock budget, if any. Limits beyond `Duration::MAX` saturate.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.time_limit
            .map(|limit| Duration::try_from_secs_f64(limit).unwrap_or(Duration::MAX))
    }

    /// Checks that the parameters describe a runnable algorithm.
    ///
    /// # Errors
    /// - If the population is empty.
    /// - If a rate or the time weight is outside of [0, 1].
    /// - If the elitism count is not below the population and target sizes.
    /// - If the target size exceeds the population size.
    /// - If the time limit is negative, not finite or does not fit a `Duration`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.population_size == 0 {
            return Err(Error::EmptyPopulation);
        }

        let rates = [
            ("mutation rate", self.mutation_rate),
            ("crossover rate", self.crossover_rate),
            ("time weight", self.time_weight),
        ];
        if let Some(&(name, value)) = rates.iter().find(|(_, v)| !(0.0..=1.0).contains(v)) {
            return Err(Error::InvalidRate { name, value });
        }

        if self.elitism_count >= self.population_size {
            return Err(Error::Elitism {
                elitism: self.elitism_count,
                size: self.population_size,
            });
        }

        let target = self.target();
        if self.elitism_count >= target || target > self.population_size {
            return Err(Error::TargetSize {
                target,
                elitism: self.elitism_count,
                size: self.population_size,
            });
        }

        match self.time_limit {
            Some(limit) if Duration::try_from_secs_f64(limit).is_err() => {
                Err(Error::InvalidTimeLimit(limit))
            }
            _ => Ok(()),
        }
    }
}
