use matchcast::engine::{
    fit, goal_probability, sample, trial_rng, HistoricalRecord, LookupTables, OutcomeSampler,
    Position, PositionWeights, SimulationContext, Tactic, TacticMultipliers, TrendCoefficients,
    GOAL_PROBABILITY_CAP,
};
use matchcast::runner::monte_carlo::{run_monte_carlo, run_monte_carlo_parallel};
use matchcast::runner::summary::summarize;
use matchcast::SimError;
use proptest::prelude::*;

/// E[max(1, round(N(3, 1)))]: the clamp at one lifts the mean slightly above 3.
const EXPECTED_OPPORTUNITIES: f64 = 3.006_445_7;

fn record(opponent_strength: f64, passes: f64) -> HistoricalRecord {
    HistoricalRecord {
        opponent_strength,
        is_home: true,
        passes,
        shots: 2.0,
        goals: 0,
    }
}

fn sample_history() -> Vec<HistoricalRecord> {
    vec![
        record(2.0, 61.0),
        record(3.0, 57.0),
        record(5.0, 49.0),
        record(6.0, 47.0),
        record(8.0, 38.0),
        record(9.0, 35.0),
    ]
}

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

#[test]
fn fit_recovers_perfect_line() {
    let trend = fit(&[record(1.0, 2.0), record(2.0, 4.0), record(3.0, 6.0)]).unwrap();
    approx_eq(trend.intercept, 0.0, 1e-9);
    approx_eq(trend.slope, 2.0, 1e-9);
}

#[test]
fn fit_with_identical_strengths_is_flat_mean() {
    let trend = fit(&[record(5.0, 20.0), record(5.0, 26.0)]).unwrap();
    assert_eq!(trend.slope, 0.0);
    approx_eq(trend.intercept, 23.0, 1e-12);
}

#[test]
fn fit_rejects_empty_and_singleton_history() {
    assert!(matches!(fit(&[]), Err(SimError::DataInsufficient { .. })));
    assert!(matches!(
        fit(&[record(3.0, 40.0)]),
        Err(SimError::DataInsufficient { .. })
    ));
}

#[test]
fn run_returns_requested_trial_count() {
    let trend = fit(&sample_history()).unwrap();
    let tables = LookupTables::default();
    for trials in [300usize, 1] {
        let ctx = SimulationContext {
            trial_count: trials,
            ..SimulationContext::default()
        };
        assert_eq!(run_monte_carlo(&trend, &ctx, &tables, 8).unwrap().len(), trials);
    }
}

#[test]
fn same_seed_gives_bit_identical_sequences() {
    let trend = fit(&sample_history()).unwrap();
    let tables = LookupTables::default();
    let ctx = SimulationContext {
        position: Position::Mediocampo,
        tactic: Tactic::Defensivo,
        is_home: false,
        ..SimulationContext::default()
    };
    let first = run_monte_carlo(&trend, &ctx, &tables, 12345).unwrap();
    let second = run_monte_carlo(&trend, &ctx, &tables, 12345).unwrap();
    let parallel = run_monte_carlo_parallel(&trend, &ctx, &tables, 12345).unwrap();
    for ((a, b), c) in first.iter().zip(&second).zip(&parallel) {
        assert_eq!(a.passes.to_bits(), b.passes.to_bits());
        assert_eq!(a.passes.to_bits(), c.passes.to_bits());
        assert_eq!((a.shots, a.goals), (b.shots, b.goals));
        assert_eq!((a.shots, a.goals), (c.shots, c.goals));
    }
    let other_seed = run_monte_carlo(&trend, &ctx, &tables, 54321).unwrap();
    assert_ne!(first, other_seed);
}

#[test]
fn mean_goals_converges_to_opportunities_times_conversion() {
    let trend = fit(&sample_history()).unwrap();
    let tables = LookupTables::default();
    let ctx = SimulationContext {
        opponent_strength: 5.0,
        position: Position::Delantero,
        tactic: Tactic::Neutral,
        trial_count: 100_000,
        ..SimulationContext::default()
    };
    let sampler = OutcomeSampler::new(&trend, &ctx, &tables).unwrap();
    approx_eq(sampler.goal_probability(), 0.1755, 1e-12);

    let outcomes = run_monte_carlo_parallel(&trend, &ctx, &tables, 2024).unwrap();
    let summary = summarize(&outcomes).unwrap();
    approx_eq(
        summary.mean_goals,
        EXPECTED_OPPORTUNITIES * sampler.goal_probability(),
        0.05,
    );
    approx_eq(summary.mean_shots, EXPECTED_OPPORTUNITIES + 1.0, 0.05);
    approx_eq(summary.mean_passes, sampler.expected_passes(), 0.1);
}

#[test]
fn stock_tables_never_exceed_goal_cap() {
    let tables = LookupTables::default();
    let trend = TrendCoefficients {
        intercept: 40.0,
        slope: 0.0,
    };
    for position in Position::ALL {
        for tactic in Tactic::ALL {
            for strength in 1..=10 {
                let ctx = SimulationContext {
                    opponent_strength: strength as f64,
                    position,
                    tactic,
                    ..SimulationContext::default()
                };
                let p = OutcomeSampler::new(&trend, &ctx, &tables)
                    .unwrap()
                    .goal_probability();
                assert!(
                    (0.0..=GOAL_PROBABILITY_CAP).contains(&p),
                    "{position}/{tactic}/{strength}: {p}"
                );
            }
        }
    }
}

#[test]
fn custom_tables_can_force_the_ceiling() {
    let mut tables = LookupTables::default();
    tables.positions.insert(
        Position::Delantero,
        PositionWeights {
            attack: 10.0,
            control: 1.0,
            midfield: 1.0,
        },
    );
    let ctx = SimulationContext {
        opponent_strength: 1.0,
        tactic: Tactic::Ofensivo,
        trial_count: 2_000,
        ..SimulationContext::default()
    };
    let trend = TrendCoefficients {
        intercept: 30.0,
        slope: 0.0,
    };
    let sampler = OutcomeSampler::new(&trend, &ctx, &tables).unwrap();
    assert_eq!(sampler.goal_probability(), GOAL_PROBABILITY_CAP);

    let outcomes = run_monte_carlo(&trend, &ctx, &tables, 6).unwrap();
    let summary = summarize(&outcomes).unwrap();
    // Goals stay a Bernoulli(0.6) count per opportunity, never more.
    assert!(summary.mean_goals < EXPECTED_OPPORTUNITIES * 0.6 + 0.15);
}

#[test]
fn unknown_tactic_in_custom_tables_fails_before_trials() {
    let mut tables = LookupTables::default();
    tables.tactics.clear();
    let trend = TrendCoefficients {
        intercept: 30.0,
        slope: 0.0,
    };
    let err = run_monte_carlo(&trend, &SimulationContext::default(), &tables, 1).unwrap_err();
    assert!(matches!(err, SimError::Configuration { ref field, .. } if field == "tactic"));
}

#[test]
fn summarize_rejects_fewer_than_two_outcomes() {
    let trend = fit(&sample_history()).unwrap();
    let mut rng = trial_rng(1, 0);
    let ctx = SimulationContext::default();
    let one = sample(&trend, &ctx, &LookupTables::default(), &mut rng).unwrap();
    assert!(matches!(summarize(&[]), Err(SimError::DataInsufficient { .. })));
    assert!(matches!(summarize(&[one]), Err(SimError::DataInsufficient { .. })));
}

fn position_strategy() -> impl Strategy<Value = Position> {
    prop::sample::select(Position::ALL.to_vec())
}

fn tactic_strategy() -> impl Strategy<Value = Tactic> {
    prop::sample::select(Tactic::ALL.to_vec())
}

proptest! {
    #[test]
    fn outcomes_are_non_negative_and_goals_bounded(
        intercept in -50.0f64..120.0,
        slope in -8.0f64..8.0,
        strength in 1.0f64..=10.0,
        is_home in any::<bool>(),
        position in position_strategy(),
        tactic in tactic_strategy(),
        seed in any::<u64>(),
    ) {
        let trend = TrendCoefficients { intercept, slope };
        let ctx = SimulationContext {
            opponent_strength: strength,
            is_home,
            position,
            tactic,
            trial_count: 64,
        };
        let tables = LookupTables::default();
        let sampler = OutcomeSampler::new(&trend, &ctx, &tables).unwrap();
        for index in 0..64usize {
            let (o, opportunities) = sampler.sample_with_opportunities(&mut trial_rng(seed, index));
            prop_assert!(o.passes >= 0.0);
            prop_assert!(opportunities >= 1);
            prop_assert!(o.goals <= opportunities);
            prop_assert!(o.shots >= opportunities && o.shots <= opportunities + 2);
        }

        let outcomes = run_monte_carlo(&trend, &ctx, &tables, seed).unwrap();
        prop_assert_eq!(outcomes.len(), 64);
        for o in outcomes {
            prop_assert!(o.passes >= 0.0);
            prop_assert!(o.shots >= 1);
        }
    }

    #[test]
    fn goal_probability_never_exceeds_cap(
        attack in 0.0f64..100.0,
        defense in 0.01f64..5.0,
        strength in 1.0f64..=10.0,
    ) {
        let p = goal_probability(
            PositionWeights { attack, control: 1.0, midfield: 1.0 },
            TacticMultipliers { opponent_attack: 1.0, opponent_defense: defense },
            strength,
        );
        prop_assert!(p >= 0.0);
        prop_assert!(p <= GOAL_PROBABILITY_CAP);
    }
}
