use super::{GenerationStrategy, GeneticAlgorithm, Population};

/// Breeds a full generation of copies and unconditionally accepted offspring,
/// then keeps the fittest of the merged pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrowTruncate;

impl GenerationStrategy for GrowTruncate {
    fn next_generation(
        &self,
        ga: &mut GeneticAlgorithm<'_>,
        mut population: Population,
    ) -> Population {
        let config = ga.config();
        let (elitism, target, merge) = (config.elitism_count, config.target(), config.merge_parents);

        let size = population.len();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pairs = (size as f64 * config.crossover_rate / 2.0).floor() as usize;
        let copies = size - 2 * pairs;

        let mut next = Population::default();

        // Elites come first so that mutation skips them.
        for rank in 0..elitism {
            next.push(population.fittest(rank).clone());
        }
        for _ in 0..copies.saturating_sub(elitism) {
            next.push(ga.select_individual(&population).clone());
        }

        for _ in 0..pairs {
            let first = ga.select_individual(&population);
            let mut second = ga.select_individual(&population);
            // Bounded so that a converged population cannot stall the loop.
            for _ in 0..size {
                if !second.same_genes(first) {
                    break;
                }
                second = ga.select_individual(&population);
            }

            let (left, right) = ga.crossover_two_point_pair(first, second);
            next.push(left);
            next.push(right);
        }

        ga.mutate_population(&mut next);

        if merge {
            population.append(next);
            next = population;
        }

        ga.evaluate(&mut next);
        next.truncate(target);
        next
    }

    fn name(&self) -> &'static str {
        "GrowTruncate"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::STRATEGIES)]
static INSTANCE: fn() -> Box<dyn GenerationStrategy> = || Box::new(GrowTruncate);
