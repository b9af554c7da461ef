use super::{operators, Fitness, GenerationStrategy, Individual, Population};
use crate::core::{Bounds, Config, Crossover, Error, Instance};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Why a run stopped.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Serialize, PartialEq)]
pub enum StopReason {
    /// An individual reached both lower bounds.
    Optimal,
    GenerationBudget,
    TimeBudget,
}

/// Result of a run.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Outcome {
    pub strategy: String,
    pub generations: usize,
    pub stop: StopReason,
    pub bounds: Bounds,
    pub best: Individual,
    /// Jobs placed on every node by the best individual.
    pub placement: Vec<Vec<usize>>,
}

/// Performs a genetic algorithm placing the jobs of an instance on its nodes.
#[derive(Clone, Debug)]
pub struct GeneticAlgorithm<'a> {
    config: Config,
    fitness: Fitness<'a>,
    rng: StdRng,
}

impl<'a> GeneticAlgorithm<'a> {
    /// Creates a genetic algorithm seeded from the configuration, or from entropy.
    ///
    /// # Errors
    /// - If the configuration or the instance is invalid.
    pub fn new(config: Config, instance: &'a Instance) -> Result<Self, Error> {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::with_rng(config, instance, rng)
    }

    /// Creates a genetic algorithm drawing from the given generator.
    ///
    /// # Errors
    /// - If the configuration or the instance is invalid.
    pub fn with_rng(config: Config, instance: &'a Instance, rng: StdRng) -> Result<Self, Error> {
        config.validate()?;
        let fitness = Fitness::new(instance, config.time_weight)?;
        Ok(Self {
            config,
            fitness,
            rng,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn fitness(&self) -> &Fitness<'a> {
        &self.fitness
    }

    /// Creates the first generation for the instance.
    pub fn init_population(&mut self) -> Population {
        let instance = self.fitness.instance();
        self.init_population_with(instance.jobs.len(), instance.max_node())
    }

    /// Creates `population_size` individuals with genes uniform in `[0, max_value]`.
    pub fn init_population_with(&mut self, length: usize, max_value: usize) -> Population {
        Population::random(self.config.population_size, length, max_value, &mut self.rng)
    }

    /// Creates, ranks and truncates the first generation to the target size.
    pub fn first_generation(&mut self) -> Population {
        let mut population = self.init_population();
        self.evaluate(&mut population);
        population.truncate(self.config.target());
        population
    }

    /// Evaluates and ranks the population.
    pub fn evaluate(&self, population: &mut Population) {
        population.evaluate_all(&self.fitness, self.config.parallel);
        population.sort();
    }

    /// Evaluates a single individual and returns its fitness.
    pub fn evaluate_individual(&self, individual: &mut Individual) -> f64 {
        self.fitness.evaluate(individual)
    }

    /// Returns whether an individual reached both lower bounds.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_termination_condition_met(&self, population: &Population) -> bool {
        population.iter().any(|individual| individual.fitness() == 1.0)
    }

    /// Picks a parent by roulette wheel.
    ///
    /// # Panics
    /// - If the population is empty.
    pub fn select_individual<'p>(&mut self, population: &'p Population) -> &'p Individual {
        let Some(individual) = operators::roulette(population, &mut self.rng) else {
            unreachable!("Selection from an empty population");
        };
        individual
    }

    /// Returns `true` with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    /// Breeds one offspring with the configured single offspring crossover.
    pub fn crossover(&mut self, first: &Individual, second: &Individual) -> Individual {
        match self.config.crossover {
            Crossover::OnePoint => self.crossover_one_point(first, second),
            Crossover::TwoPoint => self.crossover_two_point(first, second),
        }
    }

    pub fn crossover_one_point(&mut self, first: &Individual, second: &Individual) -> Individual {
        operators::one_point(first, second, &mut self.rng)
    }

    pub fn crossover_two_point(&mut self, first: &Individual, second: &Individual) -> Individual {
        operators::two_point(first, second, &mut self.rng)
    }

    pub fn crossover_two_point_pair(
        &mut self,
        first: &Individual,
        second: &Individual,
    ) -> (Individual, Individual) {
        operators::two_point_pair(first, second, &mut self.rng)
    }

    /// Mutates every individual ranked at or after the elitism count
    /// with probability `mutation_rate`.
    pub fn mutate_population(&mut self, population: &mut Population) {
        for rank in self.config.elitism_count..population.len() {
            if self.rng.gen_bool(self.config.mutation_rate) {
                operators::mutate(population.fittest_mut(rank), &mut self.rng);
            }
        }
    }

    /// Evolves a population with the strategy until it reaches the bounds
    /// or runs out of generations or time.
    pub fn run(&mut self, strategy: &dyn GenerationStrategy) -> Outcome {
        let start = Instant::now();
        let deadline = self.config.deadline();
        let bounds = self.fitness.bounds();

        info!(
            strategy = strategy.name(),
            jobs = self.fitness.instance().jobs.len(),
            nodes = self.fitness.instance().nodes.len(),
            min_time = bounds.time,
            min_cost = bounds.cost,
            "Starting genetic algorithm"
        );

        let mut population = self.first_generation();

        let mut generations = 0;
        let stop = loop {
            if self.is_termination_condition_met(&population) {
                break StopReason::Optimal;
            }
            if generations >= self.config.max_generations {
                break StopReason::GenerationBudget;
            }
            if deadline.is_some_and(|limit| start.elapsed() >= limit) {
                break StopReason::TimeBudget;
            }

            population = strategy.next_generation(self, population);
            generations += 1;

            debug!(
                generation = generations,
                best = population.fittest(0).fitness(),
                mean = population.mean_fitness(),
                distinct = population.distinct(),
                "Generation evolved"
            );
        };

        let best = population.fittest(0).clone();
        info!(
            ?stop,
            generations,
            fitness = best.fitness(),
            makespan = best.time(),
            cost = best.cost(),
            seconds = start.elapsed().as_secs_f64(),
            "Genetic algorithm finished"
        );

        Outcome {
            strategy: strategy.name().into(),
            generations,
            stop,
            bounds,
            placement: best.placement(),
            best,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algo::{GrowTruncate, ReplaceInPlace};
    use crate::core::{Job, Node};

    fn instance() -> Instance {
        Instance::new(
            (0..10).map(|i| Job::with_length(f64::from(i % 4 + 1) * 10.0)).collect(),
            vec![
                Node {
                    cost_per_second: 1.0,
                    ..Node::free(10.0)
                },
                Node {
                    cost_per_second: 4.0,
                    ..Node::free(25.0)
                },
                Node {
                    cost_per_second: 0.5,
                    ..Node::free(5.0)
                },
            ],
        )
    }

    fn config() -> Config {
        Config {
            population_size: 20,
            elitism_count: 2,
            max_generations: 30,
            seed: Some(42),
            ..Config::default()
        }
    }

    #[test]
    fn initial_population_has_valid_genes() -> anyhow::Result<()> {
        let instance = instance();
        let mut ga = GeneticAlgorithm::new(config(), &instance)?;
        let population = ga.init_population();

        assert_eq!(population.len(), 20);
        for individual in population.iter() {
            assert_eq!(individual.len(), 10);
            assert!(individual.chromosome().iter().all(|&g| g <= 2));
        }
        Ok(())
    }

    #[test]
    fn first_generation_is_truncated_to_target() -> anyhow::Result<()> {
        let instance = instance();
        let config = Config {
            target_size: Some(8),
            ..config()
        };
        let mut ga = GeneticAlgorithm::new(config, &instance)?;
        let population = ga.first_generation();

        assert_eq!(population.len(), 8);
        for rank in 1..population.len() {
            assert!(population.fittest(rank - 1).fitness() >= population.fittest(rank).fitness());
        }
        Ok(())
    }

    #[test]
    fn zero_mutation_rate_changes_nothing() -> anyhow::Result<()> {
        let instance = instance();
        let config = Config {
            population_size: 4,
            elitism_count: 1,
            mutation_rate: 0.0,
            ..config()
        };
        let mut ga = GeneticAlgorithm::new(config, &instance)?;
        let mut population = ga.init_population();
        ga.evaluate(&mut population);

        let before = population.clone();
        ga.mutate_population(&mut population);
        assert_eq!(population, before);
        Ok(())
    }

    #[test]
    fn elites_are_never_mutated() -> anyhow::Result<()> {
        let instance = instance();
        let config = Config {
            mutation_rate: 1.0,
            elitism_count: 3,
            ..config()
        };
        let mut ga = GeneticAlgorithm::new(config, &instance)?;
        let mut population = ga.init_population();
        ga.evaluate(&mut population);

        let before = population.clone();
        ga.mutate_population(&mut population);
        for rank in 0..3 {
            assert_eq!(population.fittest(rank), before.fittest(rank));
        }
        Ok(())
    }

    #[test]
    fn termination_needs_a_perfect_individual() -> anyhow::Result<()> {
        let instance = Instance::new(vec![Job::with_length(10.0); 2], vec![Node::free(10.0); 2]);
        let ga = GeneticAlgorithm::new(config(), &instance)?;

        let mut population = Population::new(vec![
            Individual::new(vec![0, 0], 1),
            Individual::new(vec![1, 1], 1),
        ]);
        ga.evaluate(&mut population);
        assert!(!ga.is_termination_condition_met(&population));

        population.push(Individual::new(vec![0, 1], 1));
        ga.evaluate(&mut population);
        assert!(ga.is_termination_condition_met(&population));
        assert_eq!(population.fittest(0).chromosome(), &[0, 1]);
        Ok(())
    }

    #[test]
    fn run_stops_at_generation_budget() -> anyhow::Result<()> {
        let instance = instance();
        for strategy in [&ReplaceInPlace as &dyn GenerationStrategy, &GrowTruncate] {
            let mut ga = GeneticAlgorithm::new(config(), &instance)?;
            let outcome = ga.run(strategy);

            assert_eq!(outcome.stop, StopReason::GenerationBudget);
            assert_eq!(outcome.generations, 30);
            assert_eq!(outcome.best.len(), 10);
            assert!(outcome.best.fitness() > 0.0 && outcome.best.fitness() <= 1.0);
            assert!(outcome.best.time() >= outcome.bounds.time - 1e-9);
            assert!(outcome.best.cost() >= outcome.bounds.cost - 1e-9);
            assert_eq!(outcome.placement.iter().map(Vec::len).sum::<usize>(), 10);
        }
        Ok(())
    }

    #[test]
    fn run_stops_early_on_optimal_placement() -> anyhow::Result<()> {
        // A single free node: every placement is optimal.
        let instance = Instance::new(vec![Job::with_length(3.0); 4], vec![Node::free(1.0)]);
        let mut ga = GeneticAlgorithm::new(config(), &instance)?;
        let outcome = ga.run(&ReplaceInPlace);

        assert_eq!(outcome.stop, StopReason::Optimal);
        assert_eq!(outcome.generations, 0);
        assert_eq!(outcome.placement, vec![vec![0, 1, 2, 3]]);
        Ok(())
    }

    #[test]
    fn run_respects_time_budget() -> anyhow::Result<()> {
        let instance = instance();
        let config = Config {
            max_generations: usize::MAX,
            time_limit: Some(0.0),
            ..config()
        };
        let mut ga = GeneticAlgorithm::new(config, &instance)?;
        let outcome = ga.run(&GrowTruncate);

        assert_eq!(outcome.stop, StopReason::TimeBudget);
        assert_eq!(outcome.generations, 0);
        Ok(())
    }

    #[test]
    fn seeded_runs_are_reproducible() -> anyhow::Result<()> {
        let instance = instance();
        let first = GeneticAlgorithm::new(config(), &instance)?.run(&GrowTruncate);
        let second = GeneticAlgorithm::new(config(), &instance)?.run(&GrowTruncate);

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn invalid_configuration_fails_fast() {
        let instance = instance();
        let config = Config {
            elitism_count: 20,
            ..config()
        };

        assert_eq!(
            GeneticAlgorithm::new(config, &instance).err(),
            Some(Error::Elitism {
                elitism: 20,
                size: 20
            })
        );
    }
}
