use super::Error;
use serde::{Deserialize, Serialize};

/// A job. Contains the amount of work and the data it moves.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct Job {
    /// Computation units.
    pub length: f64,
    #[serde(default)]
    pub memory: f64,
    #[serde(default)]
    pub input_size: f64,
    #[serde(default)]
    pub output_size: f64,
    #[serde(default = "one")]
    pub parallelism: u32,
}

const fn one() -> u32 {
    1
}

impl Job {
    /// Creates a job with only a length, no memory or transfer demands.
    #[must_use]
    pub const fn with_length(length: f64) -> Self {
        Self {
            length,
            memory: 0.0,
            input_size: 0.0,
            output_size: 0.0,
            parallelism: 1,
        }
    }

    /// Bytes moved in and out of the node running the job.
    #[must_use]
    pub fn transfer(&self) -> f64 {
        self.input_size + self.output_size
    }

    fn check(&self, job: usize) -> Result<(), Error> {
        let fields = [
            ("length", self.length),
            ("memory", self.memory),
            ("input size", self.input_size),
            ("output size", self.output_size),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            Some((name, value)) => Err(Error::InvalidJob {
                job,
                reason: format!("{name} must be finite and non-negative, got {value}"),
            }),
            None => Ok(()),
        }
    }
}

/// A worker node. Contains its processing capacity and its prices.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct Node {
    /// Computation units per second.
    pub capacity: f64,
    #[serde(default)]
    pub cost_per_second: f64,
    #[serde(default)]
    pub cost_per_memory: f64,
    #[serde(default)]
    pub cost_per_bandwidth: f64,
}

impl Node {
    /// Creates a node that costs nothing to use.
    #[must_use]
    pub const fn free(capacity: f64) -> Self {
        Self {
            capacity,
            cost_per_second: 0.0,
            cost_per_memory: 0.0,
            cost_per_bandwidth: 0.0,
        }
    }

    fn check(&self, node: usize) -> Result<(), Error> {
        if !self.capacity.is_finite() || self.capacity <= 0.0 {
            return Err(Error::InvalidNode {
                node,
                reason: format!("capacity must be finite and positive, got {}", self.capacity),
            });
        }

        let prices = [
            ("cost per second", self.cost_per_second),
            ("cost per memory", self.cost_per_memory),
            ("cost per bandwidth", self.cost_per_bandwidth),
        ];
        match prices.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            Some((name, value)) => Err(Error::InvalidNode {
                node,
                reason: format!("{name} must be finite and non-negative, got {value}"),
            }),
            None => Ok(()),
        }
    }
}

/// An instance of the placement problem.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Instance {
    pub jobs: Vec<Job>,
    pub nodes: Vec<Node>,
}

impl Instance {
    /// Creates a new instance of the placement problem.
    #[must_use]
    pub const fn new(jobs: Vec<Job>, nodes: Vec<Node>) -> Self {
        Self { jobs, nodes }
    }

    /// Highest node index a gene may hold.
    /// Only meaningful for a validated instance.
    #[must_use]
    pub fn max_node(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Checks that the instance can be evaluated.
    ///
    /// # Errors
    /// - If there are no jobs or no nodes.
    /// - If a node has a non-positive capacity or a negative price.
    /// - If a job has a negative or non-finite demand.
    pub fn validate(&self) -> Result<(), Error> {
        if self.jobs.is_empty() {
            return Err(Error::NoJobs);
        }
        if self.nodes.is_empty() {
            return Err(Error::NoNodes);
        }

        for (i, node) in self.nodes.iter().enumerate() {
            node.check(i)?;
        }
        for (i, job) in self.jobs.iter().enumerate() {
            job.check(i)?;
        }

        Ok(())
    }
}
