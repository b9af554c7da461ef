use thiserror::Error;

/// Configuration and validation failures.
/// All of them are detected before the first evaluation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("instance has no jobs")]
    NoJobs,

    #[error("instance has no nodes")]
    NoNodes,

    #[error("total node capacity must be positive, got {0}")]
    ZeroCapacity(f64),

    #[error("node {node} is invalid: {reason}")]
    InvalidNode { node: usize, reason: String },

    #[error("job {job} is invalid: {reason}")]
    InvalidJob { job: usize, reason: String },

    #[error("population size must be positive")]
    EmptyPopulation,

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("elitism count {elitism} must be below population size {size}")]
    Elitism { elitism: usize, size: usize },

    #[error("target size {target} must be above elitism count {elitism} and at most {size}")]
    TargetSize {
        target: usize,
        elitism: usize,
        size: usize,
    },

    #[error("time limit must be finite and non-negative, got {0}")]
    InvalidTimeLimit(f64),
}
