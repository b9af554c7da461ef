use super::Individual;
use crate::core::{cost, Bounds, Error, Instance};

/// Makespan and total cost of one placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measure {
    pub makespan: f64,
    pub cost: f64,
}

/// Scores placements of an instance against its lower bounds.
///
/// Holds no mutable state, so one value can be shared by concurrent evaluations.
#[derive(Clone, Debug)]
pub struct Fitness<'a> {
    instance: &'a Instance,
    bounds: Bounds,
    time_weight: f64,
    costs: Vec<f64>,
}

impl<'a> Fitness<'a> {
    /// Validates the instance and computes its lower bounds and cost table.
    ///
    /// # Errors
    /// - If the instance is empty, malformed or has zero capacity.
    pub fn new(instance: &'a Instance, time_weight: f64) -> Result<Self, Error> {
        instance.validate()?;
        let bounds = Bounds::compute(instance)?;

        let costs = instance
            .jobs
            .iter()
            .flat_map(|job| instance.nodes.iter().map(move |node| cost(job, node)))
            .collect();

        Ok(Self {
            instance,
            bounds,
            time_weight,
            costs,
        })
    }

    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub const fn instance(&self) -> &'a Instance {
        self.instance
    }

    fn cost_of(&self, job: usize, node: usize) -> f64 {
        self.costs[job * self.instance.nodes.len() + node]
    }

    /// Computes makespan and cost of the placement.
    /// Per node accumulators live only for the duration of the call.
    #[must_use]
    pub fn measure(&self, chromosome: &[usize]) -> Measure {
        debug_assert_eq!(chromosome.len(), self.instance.jobs.len());

        let nodes = &self.instance.nodes;
        let mut lengths = vec![0.0; nodes.len()];
        let mut costs = vec![0.0; nodes.len()];

        for (job, &node) in chromosome.iter().enumerate() {
            lengths[node] += self.instance.jobs[job].length;
            costs[node] += self.cost_of(job, node);
        }

        let makespan = lengths
            .iter()
            .zip(nodes)
            .map(|(length, node)| length / node.capacity)
            .fold(0.0, f64::max);

        Measure {
            makespan,
            cost: costs.iter().sum(),
        }
    }

    /// Weighted sum of how close makespan and cost are to their bounds.
    #[must_use]
    pub fn score(&self, measure: Measure) -> f64 {
        let time = ratio(self.bounds.time, measure.makespan);
        let cost = ratio(self.bounds.cost, measure.cost);
        self.time_weight * time + (1.0 - self.time_weight) * cost
    }

    /// Evaluates the individual and caches the result on it.
    pub fn evaluate(&self, individual: &mut Individual) -> f64 {
        let measure = self.measure(individual.chromosome());
        let fitness = self.score(measure);
        debug_assert!(fitness.is_finite(), "Non finite fitness for {individual:?}");
        individual.record(fitness, measure.makespan, measure.cost);
        fitness
    }
}

/// Bound over actual value, 1 when nothing was spent at all.
fn ratio(bound: f64, actual: f64) -> f64 {
    if actual > 0.0 {
        (bound / actual).min(1.0)
    } else {
        1.0
    }
}
