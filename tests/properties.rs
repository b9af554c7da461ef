// Property based tests of the placement operators.

use fog_placement_ga::algo::{operators, Fitness, Individual, Population};
use fog_placement_ga::core::{Instance, Job, Node};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn node_strategy() -> impl Strategy<Value = Node> {
    (1.0..50.0, 0.1..5.0, 0.0..1.0, 0.0..1.0).prop_map(
        |(capacity, cost_per_second, cost_per_memory, cost_per_bandwidth)| Node {
            capacity,
            cost_per_second,
            cost_per_memory,
            cost_per_bandwidth,
        },
    )
}

fn job_strategy() -> impl Strategy<Value = Job> {
    (1.0..100.0, 0.0..64.0, 0.0..10.0, 0.0..10.0).prop_map(
        |(length, memory, input_size, output_size)| Job {
            length,
            memory,
            input_size,
            output_size,
            parallelism: 1,
        },
    )
}

prop_compose! {
    fn instance_strategy()(
        jobs in prop::collection::vec(job_strategy(), 1..20),
        nodes in prop::collection::vec(node_strategy(), 1..6),
    ) -> Instance {
        Instance::new(jobs, nodes)
    }
}

prop_compose! {
    fn placed_instance()(instance in instance_strategy())(
        genes in prop::collection::vec(0..instance.nodes.len(), instance.jobs.len()),
        instance in Just(instance),
    ) -> (Instance, Vec<usize>) {
        (instance, genes)
    }
}

prop_compose! {
    fn parents()(length in 1usize..40, max_value in 1usize..6)(
        first in prop::collection::vec(0..=max_value, length),
        second in prop::collection::vec(0..=max_value, length),
        max_value in Just(max_value),
    ) -> (Individual, Individual) {
        (Individual::new(first, max_value), Individual::new(second, max_value))
    }
}

proptest! {
    #[test]
    fn random_individuals_respect_gene_range(
        seed in any::<u64>(),
        length in 0usize..50,
        max_value in 0usize..10,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let individual = Individual::random(length, max_value, &mut rng);

        prop_assert_eq!(individual.len(), length);
        prop_assert!(individual.chromosome().iter().all(|&gene| gene <= max_value));
    }

    #[test]
    fn bounds_are_never_beaten((instance, genes) in placed_instance(), weight in 0.0..=1.0) {
        let fitness = Fitness::new(&instance, weight).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let bounds = fitness.bounds();
        let mut individual = Individual::new(genes, instance.max_node());
        let score = fitness.evaluate(&mut individual);

        prop_assert!(individual.time() >= bounds.time * (1.0 - 1e-9));
        prop_assert!(individual.cost() >= bounds.cost * (1.0 - 1e-9));
        prop_assert!(score > 0.0 && score <= 1.0);
    }

    #[test]
    fn sorted_population_is_non_increasing(
        seed in any::<u64>(),
        (instance, _) in placed_instance(),
        size in 1usize..30,
    ) {
        let fitness = Fitness::new(&instance, 0.5).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut population = Population::random(size, instance.jobs.len(), instance.max_node(), &mut rng);
        population.evaluate_all(&fitness, false);
        population.sort();

        for rank in 1..population.len() {
            prop_assert!(population.fittest(rank - 1).fitness() >= population.fittest(rank).fitness());
        }
    }

    #[test]
    fn truncation_keeps_the_fittest(
        seed in any::<u64>(),
        (instance, _) in placed_instance(),
        size in 1usize..30,
        keep in 0usize..40,
    ) {
        let fitness = Fitness::new(&instance, 0.3).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut population = Population::random(size, instance.jobs.len(), instance.max_node(), &mut rng);
        population.evaluate_all(&fitness, false);
        population.sort();

        let mut scores: Vec<f64> = population.iter().map(Individual::fitness).collect();
        scores.sort_by(|a, b| b.total_cmp(a));

        population.truncate(keep);
        prop_assert_eq!(population.len(), keep.min(size));
        for (rank, individual) in population.iter().enumerate() {
            prop_assert_eq!(individual.fitness().to_bits(), scores[rank].to_bits());
        }
    }

    #[test]
    fn two_point_segment_comes_from_second_parent(seed in any::<u64>(), length in 1usize..60) {
        let first = Individual::new(vec![0; length], 1);
        let second = Individual::new(vec![1; length], 1);
        let child = operators::two_point(&first, &second, &mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(child.len(), length);
        prop_assert!(child.chromosome().contains(&1));
        let rises = (0..length)
            .filter(|&i| child.gene(i) == 0 && child.gene((i + 1) % length) == 1)
            .count();
        prop_assert!(rises <= 1);
    }

    #[test]
    fn paired_offspring_are_complements(seed in any::<u64>(), (first, second) in parents()) {
        let (left, right) = operators::two_point_pair(&first, &second, &mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(left.len(), first.len());
        prop_assert_eq!(right.len(), first.len());
        for i in 0..first.len() {
            let from_first = left.gene(i) == first.gene(i) && right.gene(i) == second.gene(i);
            let from_second = left.gene(i) == second.gene(i) && right.gene(i) == first.gene(i);
            prop_assert!(from_first || from_second);
        }
    }

    #[test]
    fn one_point_mixes_prefix_and_suffix(seed in any::<u64>(), (first, second) in parents()) {
        let child = operators::one_point(&first, &second, &mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(child.len(), first.len());
        let cut = (0..=first.len())
            .find(|&cut| (0..first.len()).all(|i| {
                child.gene(i) == if i < cut { first.gene(i) } else { second.gene(i) }
            }));
        prop_assert!(cut.is_some());
    }

    #[test]
    fn mutation_touches_at_most_one_gene(seed in any::<u64>(), (first, _) in parents()) {
        let mut mutated = first.clone();
        operators::mutate(&mut mutated, &mut StdRng::seed_from_u64(seed));

        let changed = (0..first.len()).filter(|&i| first.gene(i) != mutated.gene(i)).count();
        prop_assert!(changed <= 1);
        prop_assert!(mutated.chromosome().iter().all(|&gene| gene <= first.max_value()));
    }
}
