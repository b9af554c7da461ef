use clap::{Parser, ValueEnum};
use fog_placement_ga::algo::{self, GenerationStrategy};
use fog_placement_ga::core::{Config, Instance, Job, Node};
use fog_placement_ga::{data, run_reader};
use rand::prelude::*;
use std::fs::File;
use std::io::{BufReader, Write};
use std::num::NonZero;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Name of a registered generation strategy, offered as a command line choice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct StrategyName(&'static str);

impl StrategyName {
    fn build(self) -> anyhow::Result<Box<dyn GenerationStrategy>> {
        algo::strategy(self.0).ok_or_else(|| anyhow::anyhow!("Unknown strategy {}", self.0))
    }
}

impl ValueEnum for StrategyName {
    fn value_variants<'a>() -> &'a [Self] {
        static NAMES: std::sync::LazyLock<Vec<StrategyName>> = std::sync::LazyLock::new(|| {
            algo::STRATEGIES
                .iter()
                .map(|init| StrategyName(init().name()))
                .collect()
        });

        NAMES.as_slice()
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.0))
    }
}

/// Parameters shared by the commands running the algorithm.
#[derive(Debug, clap::Args)]
struct RunArgs {
    /// JSON file with algorithm parameters. Missing fields take defaults.
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Seed of the random generator.
    #[clap(short, long)]
    seed: Option<u64>,
    /// Maximum number of generations.
    #[clap(short, long)]
    generations: Option<usize>,
    /// Wall clock budget in seconds.
    #[clap(short, long)]
    time_limit: Option<f64>,
    /// Evaluate individuals in parallel.
    #[clap(short, long)]
    parallel: bool,
}

impl RunArgs {
    fn load(&self) -> anyhow::Result<Config> {
        let mut config: Config = match &self.config {
            Some(path) => data::deserialize(&mut BufReader::new(File::open(path)?))?,
            None => Config::default(),
        };

        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(generations) = self.generations {
            config.max_generations = generations;
        }
        if self.time_limit.is_some() {
            config.time_limit = self.time_limit;
        }
        config.parallel |= self.parallel;

        Ok(config)
    }
}

/// Application placing jobs on heterogeneous nodes with a genetic algorithm.
#[derive(Debug, Parser)]
enum Application {
    /// Run one strategy on an instance read from stdin.
    Run {
        strategy: StrategyName,
        #[clap(flatten)]
        args: RunArgs,
    },
    /// Run every strategy on a directory of instances.
    Bench {
        /// The input directory.
        input: PathBuf,
        /// Exclude strategies.
        #[clap(short, long, value_delimiter = ',')]
        exclude: Vec<StrategyName>,
        #[clap(flatten)]
        args: RunArgs,
    },
    /// Generate random instances.
    Gen {
        /// The number of nodes.
        nodes: NonZero<usize>,
        /// The number of jobs.
        jobs: NonZero<usize>,
        /// The maximum length of a job.
        #[clap(short, long, default_value = "10000")]
        max_length: NonZero<u64>,
        /// Number of instances to generate.
        #[clap(short, long, default_value = "1")]
        amount: NonZero<u64>,
        /// Path to output the generated instances. If the directory does not exist, it will be created.
        #[clap(short, long, default_value = "output")]
        output: PathBuf,
    },
}

fn strategies(exclude: &[StrategyName]) -> anyhow::Result<Vec<Box<dyn GenerationStrategy>>> {
    StrategyName::value_variants()
        .iter()
        .filter(|name| !exclude.contains(name))
        .map(|name| name.build())
        .collect()
}

fn gen_jobs(jobs: usize, max_length: u64, rng: &mut impl Rng) -> Vec<Job> {
    (0..jobs)
        .map(|_| Job {
            length: rng.gen_range(1..=max_length) as f64,
            memory: rng.gen_range(8.0..512.0),
            input_size: rng.gen_range(0.0..1000.0),
            output_size: rng.gen_range(0.0..1000.0),
            parallelism: 1,
        })
        .collect()
}

fn gen_nodes(nodes: usize, rng: &mut impl Rng) -> Vec<Node> {
    (0..nodes)
        .map(|_| Node {
            capacity: rng.gen_range(100.0..2000.0),
            cost_per_second: rng.gen_range(0.0..1.0),
            cost_per_memory: rng.gen_range(0.0..0.1),
            cost_per_bandwidth: rng.gen_range(0.0..0.1),
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("fog_placement_ga=info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Application::parse() {
        Application::Run { strategy, args } => {
            let strategy = strategy.build()?;
            run_reader(args.load()?, strategy.as_ref(), &mut std::io::stdin().lock())?;
            Ok(())
        }
        Application::Bench {
            input,
            exclude,
            args,
        } => {
            let config = args.load()?;
            for strategy in strategies(&exclude)? {
                println!("{}", data::run(&input, &config, strategy.as_ref())?);
            }
            Ok(())
        }
        Application::Gen {
            nodes,
            jobs,
            max_length,
            amount,
            output,
        } => {
            if !output.try_exists()? {
                std::fs::create_dir_all(&output)?;
            }

            let mut rng = thread_rng();
            for i in 0..amount.get() {
                let instance = Instance::new(
                    gen_jobs(jobs.get(), max_length.get(), &mut rng),
                    gen_nodes(nodes.get(), &mut rng),
                );
                let filename = format!("{nodes}_{jobs}_{i}.json");
                File::create(output.join(filename))?
                    .write_all(data::to_string(&instance)?.as_bytes())?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_choice_builds_its_strategy() -> anyhow::Result<()> {
        for name in StrategyName::value_variants() {
            assert_eq!(name.build()?.name(), name.0);
        }
        assert!(StrategyName("Missing").build().is_err());
        Ok(())
    }

    #[test]
    fn excluded_strategies_are_skipped() -> anyhow::Result<()> {
        let all = strategies(&[])?;
        assert_eq!(all.len(), algo::STRATEGIES.len());

        let rest = strategies(&[StrategyName("GrowTruncate")])?;
        assert_eq!(rest.len(), all.len() - 1);
        assert!(rest.iter().all(|strategy| strategy.name() != "GrowTruncate"));
        Ok(())
    }

    #[test]
    fn strategy_names_parse_from_the_command_line() {
        let app = Application::try_parse_from(["fog_placement_ga", "run", "ReplaceInPlace", "-s", "7"]);
        assert!(matches!(
            app,
            Ok(Application::Run { strategy: StrategyName("ReplaceInPlace"), .. })
        ));
        assert!(Application::try_parse_from(["fog_placement_ga", "run", "Genetic"]).is_err());
    }
}
