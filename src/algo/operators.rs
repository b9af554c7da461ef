//! Selection, crossover and mutation operators.
//!
//! Every operator takes the random generator explicitly so that runs can be
//! replayed from a seed.

use super::{Individual, Population};
use rand::Rng;

/// Roulette wheel selection: picks an individual with probability
/// proportional to its fitness.
///
/// A population with no positive aggregate fitness is sampled uniformly.
/// Returns `None` only for an empty population.
pub fn roulette<'a>(population: &'a Population, rng: &mut impl Rng) -> Option<&'a Individual> {
    let individuals = population.individuals();
    let total = population.fitness();

    if individuals.is_empty() {
        return None;
    }
    if !(total > 0.0 && total.is_finite()) {
        return individuals.get(rng.gen_range(0..individuals.len()));
    }

    let position = rng.gen::<f64>() * total;
    let mut wheel = 0.0;
    for individual in individuals {
        wheel += individual.fitness();
        if wheel >= position {
            return Some(individual);
        }
    }

    individuals.last()
}

/// Single cut crossover. Genes before the cut come from the first parent.
pub fn one_point(first: &Individual, second: &Individual, rng: &mut impl Rng) -> Individual {
    debug_assert_eq!(first.len(), second.len());

    let cut = rng.gen_range(0..=first.len());
    let chromosome = (0..first.len())
        .map(|i| if i < cut { first.gene(i) } else { second.gene(i) })
        .collect();

    Individual::new(chromosome, first.max_value())
}

/// Returns whether `index` lies in the circular segment `[start, end)`.
/// `end` may exceed `length`, in which case the segment wraps around.
#[must_use]
pub const fn in_segment(index: usize, start: usize, end: usize, length: usize) -> bool {
    if end >= length {
        index >= start || index < end - length
    } else {
        index >= start && index < end
    }
}

fn cut_points(length: usize, span: usize, rng: &mut impl Rng) -> (usize, usize) {
    let start = rng.gen_range(0..length);
    let end = rng.gen_range(start + 1..=start + span.max(1));
    (start, end)
}

/// Two cut crossover producing one offspring.
/// The circular segment between the cuts comes from the second parent.
pub fn two_point(first: &Individual, second: &Individual, rng: &mut impl Rng) -> Individual {
    debug_assert_eq!(first.len(), second.len());

    let length = first.len();
    if length == 0 {
        return first.clone();
    }

    let (start, end) = cut_points(length, length, rng);
    let chromosome = (0..length)
        .map(|i| {
            if in_segment(i, start, end, length) {
                second.gene(i)
            } else {
                first.gene(i)
            }
        })
        .collect();

    Individual::new(chromosome, first.max_value())
}

/// Two cut crossover producing two complementary offspring.
///
/// The segment never covers the whole chromosome, so a pair is never a plain
/// copy of its parents unless the chromosome has a single gene.
pub fn two_point_pair(
    first: &Individual,
    second: &Individual,
    rng: &mut impl Rng,
) -> (Individual, Individual) {
    debug_assert_eq!(first.len(), second.len());

    let length = first.len();
    if length == 0 {
        return (first.clone(), second.clone());
    }

    let (start, end) = cut_points(length, length - 1, rng);
    let mut left = Vec::with_capacity(length);
    let mut right = Vec::with_capacity(length);

    for i in 0..length {
        if in_segment(i, start, end, length) {
            left.push(second.gene(i));
            right.push(first.gene(i));
        } else {
            left.push(first.gene(i));
            right.push(second.gene(i));
        }
    }

    (
        Individual::new(left, first.max_value()),
        Individual::new(right, first.max_value()),
    )
}

/// Rewrites one random gene with a random node index.
/// The new value may equal the old one.
pub fn mutate(individual: &mut Individual, rng: &mut impl Rng) {
    if individual.is_empty() {
        return;
    }

    let index = rng.gen_range(0..individual.len());
    let value = rng.gen_range(0..=individual.max_value());
    individual.set_gene(index, value);
}
