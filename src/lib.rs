#![deny(clippy::all, clippy::cargo, clippy::expect_used, clippy::unwrap_used)]
#![deny(clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(clippy::unimplemented, clippy::redundant_type_annotations)]
#![allow(clippy::cast_precision_loss, clippy::multiple_crate_versions)]

use anyhow::Result;
use std::io::BufRead;

pub mod algo;
pub mod core;
pub mod data;

/// Runs the genetic algorithm on the instance read from reader and writes the outcome to stdout.
/// Returns an error if the instance could not be read or the outcome could not be written.
///
/// # Errors
/// - If the instance could not be read from the reader.
/// - If the instance or the configuration is invalid.
/// - If the outcome could not be serialized.
///
/// # Panics
///  - If the best placement breaks the gene range in debug mode.
pub fn run_reader(
    config: core::Config,
    strategy: &dyn algo::GenerationStrategy,
    reader: &mut impl BufRead,
) -> Result<algo::Outcome> {
    let instance: core::Instance = data::deserialize(reader)?;
    let outcome = algo::GeneticAlgorithm::new(config, &instance)?.run(strategy);

    debug_assert!(
        outcome.best.chromosome().iter().all(|&node| node < instance.nodes.len()),
        "Placement is invalid: {outcome:?}"
    );

    println!("{}", data::to_string(&outcome)?);

    Ok(outcome)
}
