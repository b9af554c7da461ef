use crate::algo::{GenerationStrategy, GeneticAlgorithm};
use crate::core::{Config, Instance};
use crate::data::deserialize;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Report of running a directory of instances.
#[derive(Debug, Deserialize, Serialize)]
pub struct Report {
    strategy: String,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Create a new report.
    fn new(strategy: String) -> Self {
        let entries = Vec::new();
        Self { strategy, entries }
    }

    /// Get the strategy name.
    #[must_use]
    pub fn strategy_name(&self) -> &str {
        &self.strategy
    }

    /// Get the entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Strategy: {}", self.strategy)?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "-------------------")
    }
}

/// Report of running a single instance.
#[non_exhaustive]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub fitness: f64,
    pub makespan: f64,
    pub cost: f64,
    pub generations: usize,
    pub time: f64,
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{}: fitness {:.4}, makespan {:.3}, cost {:.3} after {} generations in {:.2} sec",
            self.name, self.fitness, self.makespan, self.cost, self.generations, self.time
        )
    }
}

/// Run the strategy on every `*.json` instance in the `dir` directory.
/// Entries are ordered by file name.
///
/// # Errors
/// - If a file cannot be read or parsed.
/// - If an instance or the configuration is invalid.
pub fn run(
    dir: impl AsRef<Path>,
    config: &Config,
    strategy: &dyn GenerationStrategy,
) -> anyhow::Result<Report> {
    let mut report = Report::new(strategy.name().into());

    let mut files: Vec<_> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<_>>()?;
    files.retain(|path| path.extension().is_some_and(|ext| ext == "json"));
    files.sort();

    for path in files {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let instance: Instance = deserialize(&mut BufReader::new(File::open(&path)?))?;

        let time = std::time::Instant::now();
        let outcome = GeneticAlgorithm::new(config.clone(), &instance)?.run(strategy);
        let time = time.elapsed().as_secs_f64();

        report.entries.push(ReportEntry {
            name,
            fitness: outcome.best.fitness(),
            makespan: outcome.best.time(),
            cost: outcome.best.cost(),
            generations: outcome.generations,
            time,
        });
    }

    Ok(report)
}
