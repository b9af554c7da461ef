mod fitness;
mod genetic;
mod individual;
pub mod operators;
mod population;
mod replace;
mod truncate;

pub use fitness::{Fitness, Measure};
pub use genetic::{GeneticAlgorithm, Outcome, StopReason};
pub use individual::Individual;
pub use population::Population;
pub use replace::ReplaceInPlace;
pub use truncate::GrowTruncate;

/// Produces one generation from the previous one.
pub trait GenerationStrategy {
    /// Breeds the next generation.
    /// The result is evaluated, ranked and of the configured target size.
    fn next_generation(&self, ga: &mut GeneticAlgorithm<'_>, population: Population) -> Population;

    /// Returns the name of the strategy.
    fn name(&self) -> &'static str;
}

/// Every available generation strategy.
#[allow(unsafe_code)]
#[linkme::distributed_slice]
pub static STRATEGIES: [fn() -> Box<dyn GenerationStrategy>];

/// Finds a registered strategy by name.
#[must_use]
pub fn strategy(name: &str) -> Option<Box<dyn GenerationStrategy>> {
    STRATEGIES
        .iter()
        .map(|init| init())
        .find(|strategy| strategy.name() == name)
}
