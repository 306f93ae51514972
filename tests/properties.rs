use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_sequencing::constructive::{greedy_build, grasp_build, RclPolicy};
use u_sequencing::evaluation::{evaluate, Evaluator};
use u_sequencing::local_search::{improve, LocalSearchConfig, Neighborhood};
use u_sequencing::models::Instance;
use u_sequencing::scoring::{self, ScoringStrategy};

/// Random instances with up to 7 jobs; precedence arcs only go from lower to
/// higher index, so the graph is always acyclic.
fn instance() -> impl Strategy<Value = Instance> {
    (1usize..8)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0u32..10, n),
                prop::collection::vec(0u32..6, n * n),
                prop::collection::vec(prop::option::weighted(0.2, 0u32..5), n * n),
            )
        })
        .prop_map(|(p, s, d)| {
            let n = p.len();
            let setup = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| if i == j { 0.0 } else { f64::from(s[i * n + j]) })
                        .collect()
                })
                .collect();
            let delay = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| match d[i * n + j] {
                            Some(v) if i < j => f64::from(v),
                            _ => -1.0,
                        })
                        .collect()
                })
                .collect();
            Instance::from_rows(p.into_iter().map(f64::from).collect(), setup, delay)
                .expect("acyclic by construction")
        })
}

/// An instance with a random permutation of its jobs.
fn instance_and_ordering() -> impl Strategy<Value = (Instance, Vec<usize>)> {
    instance().prop_flat_map(|inst| {
        let jobs: Vec<usize> = (0..inst.n()).collect();
        (Just(inst), Just(jobs).prop_shuffle())
    })
}

fn strategy_of(index: usize) -> scoring::Strategy {
    scoring::Strategy::ALL[index % scoring::Strategy::ALL.len()]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_evaluation_idempotent((inst, ordering) in instance_and_ordering()) {
        let verdict = evaluate(&inst, &ordering);
        if let Some(schedule) = verdict.schedule() {
            let again = evaluate(&inst, &schedule.sequence());
            prop_assert_eq!(&again, &verdict);
        }
    }

    #[test]
    fn prop_verification_never_fires((inst, ordering) in instance_and_ordering()) {
        let verdict = evaluate(&inst, &ordering);
        prop_assert!(verdict.violations().iter().all(|v| !v.is_timing()));
    }

    #[test]
    fn prop_feasible_orderings_respect_precedence((inst, ordering) in instance_and_ordering()) {
        let verdict = evaluate(&inst, &ordering);
        if verdict.is_feasible() {
            let mut position = vec![0; inst.n()];
            for (r, &job) in ordering.iter().enumerate() {
                position[job] = r;
            }
            for j in 0..inst.n() {
                for &(i, _) in inst.predecessors(j) {
                    prop_assert!(position[i] < position[j]);
                }
            }
        }
    }

    #[test]
    fn prop_consecutive_setup_gap((inst, ordering) in instance_and_ordering()) {
        let verdict = evaluate(&inst, &ordering);
        if let (true, Some(schedule)) = (verdict.is_feasible(), verdict.schedule()) {
            for pair in schedule.entries().windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(b.start >= a.finish + inst.setup(a.job, b.job) - 1e-9);
            }
            for entry in schedule.entries() {
                for &(i, d) in inst.predecessors(entry.job) {
                    let finish = schedule.finish(i).expect("predecessor placed");
                    prop_assert!(entry.start >= finish + d - 1e-9);
                }
            }
        }
    }

    #[test]
    fn prop_makespan_is_last_and_max_finish((inst, ordering) in instance_and_ordering()) {
        let verdict = evaluate(&inst, &ordering);
        if let (Some(makespan), Some(schedule)) = (verdict.makespan(), verdict.schedule()) {
            prop_assert_eq!(makespan, schedule.last_finish());
            prop_assert_eq!(makespan, schedule.max_finish());
        }
    }

    #[test]
    fn prop_greedy_complete_and_deterministic(inst in instance(), s in 0usize..3) {
        let strategy = strategy_of(s);
        let a = greedy_build(&inst, &strategy, &[]);
        let b = greedy_build(&inst, &strategy, &[]);
        prop_assert!(a.is_complete(), "{} blocked", strategy.name());
        prop_assert!(a.verdict.is_feasible());
        prop_assert_eq!(a.ordering, b.ordering);
    }

    #[test]
    fn prop_grasp_alpha_zero_is_greedy(inst in instance(), s in 0usize..3, seed in any::<u64>()) {
        let strategy = strategy_of(s);
        let mut rng = StdRng::seed_from_u64(seed);
        let grasp = grasp_build(&inst, &strategy, &[], RclPolicy::Threshold { alpha: 0.0 }, &mut rng);
        let greedy = greedy_build(&inst, &strategy, &[]);
        prop_assert_eq!(grasp.ordering, greedy.ordering);
    }

    #[test]
    fn prop_local_search_never_worsens(
        inst in instance(),
        s in 0usize..3,
        nb in 0usize..6,
        seed in any::<u64>(),
    ) {
        let start = greedy_build(&inst, &strategy_of(s), &[]);
        let before = start.makespan().expect("complete");
        let config = LocalSearchConfig::default().with_max_stagnation(40);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = improve(&inst, &start.ordering, Neighborhood::ALL[nb], &config, &mut rng)
            .expect("feasible start");
        prop_assert!(result.makespan <= before);
        prop_assert_eq!(result.initial_makespan, before);
        prop_assert_eq!(Evaluator::new(&inst).makespan(&result.ordering), Some(result.makespan));
    }
}
