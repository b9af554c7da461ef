use super::{Error, Instance, Job, Node};
use serde::{Deserialize, Serialize};

/// Price of running the job on the node: processing, memory and transfer.
#[must_use]
pub fn cost(job: &Job, node: &Node) -> f64 {
    node.cost_per_second * job.length / node.capacity
        + node.cost_per_memory * job.memory
        + node.cost_per_bandwidth * job.transfer()
}

/// Makespan under perfect, infinitely divisible load balancing.
///
/// # Errors
/// - If either list is empty.
/// - If the total capacity is not positive.
pub fn min_time(jobs: &[Job], nodes: &[Node]) -> Result<f64, Error> {
    check_lists(jobs, nodes)?;

    let length: f64 = jobs.iter().map(|job| job.length).sum();
    let capacity: f64 = nodes.iter().map(|node| node.capacity).sum();

    if capacity > 0.0 && capacity.is_finite() {
        Ok(length / capacity)
    } else {
        Err(Error::ZeroCapacity(capacity))
    }
}

/// Total cost when every job runs on its own cheapest node.
///
/// # Errors
/// - If either list is empty.
/// - If the total capacity is not positive.
pub fn min_cost(jobs: &[Job], nodes: &[Node]) -> Result<f64, Error> {
    check_lists(jobs, nodes)?;

    let capacity: f64 = nodes.iter().map(|node| node.capacity).sum();
    if capacity <= 0.0 {
        return Err(Error::ZeroCapacity(capacity));
    }

    Ok(jobs
        .iter()
        .map(|job| {
            nodes
                .iter()
                .map(|node| cost(job, node))
                .fold(f64::INFINITY, f64::min)
        })
        .sum())
}

fn check_lists(jobs: &[Job], nodes: &[Node]) -> Result<(), Error> {
    if jobs.is_empty() {
        Err(Error::NoJobs)
    } else if nodes.is_empty() {
        Err(Error::NoNodes)
    } else {
        Ok(())
    }
}

/// Theoretical lower bounds of an instance, used to normalize fitness.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct Bounds {
    pub time: f64,
    pub cost: f64,
}

impl Bounds {
    /// Computes both bounds of the instance.
    ///
    /// # Errors
    /// - If the instance has no jobs, no nodes or zero capacity.
    pub fn compute(instance: &Instance) -> Result<Self, Error> {
        Ok(Self {
            time: min_time(&instance.jobs, &instance.nodes)?,
            cost: min_cost(&instance.jobs, &instance.nodes)?,
        })
    }
}
