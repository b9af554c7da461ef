use super::{GenerationStrategy, GeneticAlgorithm, Population};
use tracing::trace;

/// Keeps the population size fixed. Every individual may be replaced by its
/// offspring, but only by one at least as fit that is not already present.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplaceInPlace;

impl GenerationStrategy for ReplaceInPlace {
    fn next_generation(&self, ga: &mut GeneticAlgorithm<'_>, population: Population) -> Population {
        let rate = ga.config().crossover_rate;
        let mut next = Vec::with_capacity(population.len());

        for rank in 0..population.len() {
            let parent = population.fittest(rank);

            if !ga.chance(rate) {
                next.push(parent.clone());
                continue;
            }

            let mate = ga.select_individual(&population);
            let mut offspring = ga.crossover(parent, mate);
            ga.evaluate_individual(&mut offspring);

            if offspring.fitness() >= parent.fitness() && !population.contains_duplicate(&offspring)
            {
                next.push(offspring);
            } else {
                trace!(rank, fitness = offspring.fitness(), "Offspring rejected");
                next.push(parent.clone());
            }
        }

        let mut next = Population::new(next);
        ga.mutate_population(&mut next);
        ga.evaluate(&mut next);
        next.truncate(ga.config().target());
        next
    }

    fn name(&self) -> &'static str {
        "ReplaceInPlace"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::STRATEGIES)]
static INSTANCE: fn() -> Box<dyn GenerationStrategy> = || Box::new(ReplaceInPlace);
