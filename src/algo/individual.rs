use rand::Rng;
use serde::{Deserialize, Serialize};

/// A candidate placement. Gene `i` is the node job `i` runs on.
///
/// Fitness, makespan and cost are cached from the last evaluation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Individual {
    chromosome: Vec<usize>,
    max_value: usize,
    fitness: f64,
    time: f64,
    cost: f64,
}

impl Individual {
    /// Creates a not yet evaluated individual from its genes.
    #[must_use]
    pub fn new(chromosome: Vec<usize>, max_value: usize) -> Self {
        debug_assert!(
            chromosome.iter().all(|&gene| gene <= max_value),
            "Gene out of range: {chromosome:?} > {max_value}"
        );
        Self {
            chromosome,
            max_value,
            fitness: 0.0,
            time: 0.0,
            cost: 0.0,
        }
    }

    /// Creates an individual with every gene drawn uniformly from `[0, max_value]`.
    pub fn random(length: usize, max_value: usize, rng: &mut impl Rng) -> Self {
        let chromosome = (0..length).map(|_| rng.gen_range(0..=max_value)).collect();
        Self::new(chromosome, max_value)
    }

    #[must_use]
    pub fn chromosome(&self) -> &[usize] {
        &self.chromosome
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chromosome.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chromosome.is_empty()
    }

    #[must_use]
    pub fn gene(&self, index: usize) -> usize {
        self.chromosome[index]
    }

    /// Overwrites one gene. Cached values are left untouched until the next evaluation.
    pub fn set_gene(&mut self, index: usize, value: usize) {
        debug_assert!(value <= self.max_value, "Gene {value} > {}", self.max_value);
        self.chromosome[index] = value;
    }

    /// Highest node index a gene may hold.
    #[must_use]
    pub const fn max_value(&self) -> usize {
        self.max_value
    }

    #[must_use]
    pub const fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Cached makespan.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Cached total cost.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    pub(crate) fn record(&mut self, fitness: f64, time: f64, cost: f64) {
        self.fitness = fitness;
        self.time = time;
        self.cost = cost;
    }

    /// Returns whether both individuals place every job on the same node.
    #[must_use]
    pub fn same_genes(&self, other: &Self) -> bool {
        self.chromosome == other.chromosome
    }

    /// Returns whether the individuals share both fitness and genes.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_duplicate(&self, other: &Self) -> bool {
        self.fitness == other.fitness && self.same_genes(other)
    }

    /// Groups job indices by the node they are placed on.
    #[must_use]
    pub fn placement(&self) -> Vec<Vec<usize>> {
        let mut nodes = vec![Vec::new(); self.max_value + 1];
        for (job, &node) in self.chromosome.iter().enumerate() {
            nodes[node].push(job);
        }
        nodes
    }
}
