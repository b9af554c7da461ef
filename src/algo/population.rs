use super::{Fitness, Individual};
use ahash::{HashSet, HashSetExt};
use rand::Rng;
use rayon::prelude::*;

/// The individuals evolved together, with their summed fitness.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
    fitness: f64,
}

impl Population {
    /// Creates a population from individuals.
    /// The aggregate fitness is taken from their cached values.
    #[must_use]
    pub fn new(individuals: Vec<Individual>) -> Self {
        let mut population = Self {
            individuals,
            fitness: 0.0,
        };
        population.refresh_fitness();
        population
    }

    /// Creates `size` individuals with uniformly random genes.
    pub fn random(size: usize, length: usize, max_value: usize, rng: &mut impl Rng) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::random(length, max_value, rng))
            .collect();
        Self::new(individuals)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    /// Sum of the members' fitness at the last evaluation.
    #[must_use]
    pub const fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn mean_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            0.0
        } else {
            self.fitness / self.individuals.len() as f64
        }
    }

    /// Returns the individual at the given rank. Requires a prior sort.
    #[must_use]
    pub fn fittest(&self, rank: usize) -> &Individual {
        &self.individuals[rank]
    }

    pub fn fittest_mut(&mut self, rank: usize) -> &mut Individual {
        &mut self.individuals[rank]
    }

    /// Adds an individual without touching the aggregate fitness.
    pub fn push(&mut self, individual: Individual) {
        self.individuals.push(individual);
    }

    /// Moves every individual of `other` to the end of this population.
    pub fn append(&mut self, other: Self) {
        self.individuals.extend(other.individuals);
    }

    /// Orders individuals by non-increasing fitness, keeping ties in place.
    pub fn sort(&mut self) {
        self.individuals
            .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }

    /// Keeps only the `size` first individuals.
    pub fn truncate(&mut self, size: usize) {
        self.individuals.truncate(size);
        self.refresh_fitness();
    }

    /// Evaluates every member and recomputes the aggregate fitness.
    pub fn evaluate_all(&mut self, fitness: &Fitness<'_>, parallel: bool) {
        if parallel {
            self.individuals.par_iter_mut().for_each(|individual| {
                fitness.evaluate(individual);
            });
        } else {
            for individual in &mut self.individuals {
                fitness.evaluate(individual);
            }
        }
        self.refresh_fitness();
    }

    /// Recomputes the aggregate fitness from the cached values.
    pub fn refresh_fitness(&mut self) {
        self.fitness = self.individuals.iter().map(Individual::fitness).sum();
    }

    /// Returns whether a member is a duplicate of the individual.
    #[must_use]
    pub fn contains_duplicate(&self, individual: &Individual) -> bool {
        self.individuals.iter().any(|other| other.is_duplicate(individual))
    }

    /// Number of different chromosomes.
    #[must_use]
    pub fn distinct(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.individuals.len());
        for individual in &self.individuals {
            seen.insert(individual.chromosome());
        }
        seen.len()
    }
}
