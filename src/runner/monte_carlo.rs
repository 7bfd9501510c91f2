use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::engine::{
    trial_rng, LookupTables, OutcomeSampler, SimulationContext, TrendCoefficients, TrialOutcome,
};
use crate::error::Result;

/// Run `ctx.trial_count` independent trials sequentially.
///
/// Trial `i` draws from its own random source seeded from `(seed, i)`, so the output depends
/// only on the inputs and the seed, never on scheduling.
pub fn run_monte_carlo(
    trend: &TrendCoefficients,
    ctx: &SimulationContext,
    tables: &LookupTables,
    seed: u64,
) -> Result<Vec<TrialOutcome>> {
    run_monte_carlo_with_parallelism(trend, ctx, tables, seed, false)
}

/// Like [run_monte_carlo] but spreads trials across Rayon workers.
/// Output is bit-identical to the sequential run for the same seed; order is trial order.
pub fn run_monte_carlo_parallel(
    trend: &TrendCoefficients,
    ctx: &SimulationContext,
    tables: &LookupTables,
    seed: u64,
) -> Result<Vec<TrialOutcome>> {
    run_monte_carlo_with_parallelism(trend, ctx, tables, seed, true)
}

/// Sequential run drawing every trial from one caller-supplied random source.
/// Reproducible when `rng` is seeded; results differ from the per-trial-seeded runners.
pub fn run_monte_carlo_with_rng<R: Rng + ?Sized>(
    trend: &TrendCoefficients,
    ctx: &SimulationContext,
    tables: &LookupTables,
    rng: &mut R,
) -> Result<Vec<TrialOutcome>> {
    ctx.validate()?;
    let sampler = OutcomeSampler::new(trend, ctx, tables)?;
    Ok((0..ctx.trial_count).map(|_| sampler.sample(rng)).collect())
}

fn run_monte_carlo_with_parallelism(
    trend: &TrendCoefficients,
    ctx: &SimulationContext,
    tables: &LookupTables,
    seed: u64,
    parallel: bool,
) -> Result<Vec<TrialOutcome>> {
    ctx.validate()?;
    let sampler = OutcomeSampler::new(trend, ctx, tables)?;

    debug!(
        trials = ctx.trial_count,
        seed,
        parallel,
        expected_passes = sampler.expected_passes(),
        goal_probability = sampler.goal_probability(),
        "starting monte carlo run"
    );

    let outcomes = run_trial_range(&sampler, seed, 0, ctx.trial_count, parallel);

    debug!(trials = outcomes.len(), "monte carlo run finished");
    Ok(outcomes)
}

/// Draw trials `start..end` of a run. Lets callers split one run into batches
/// (for progress reporting) and still get the same sequence as a single call.
pub fn run_trial_range(
    sampler: &OutcomeSampler,
    seed: u64,
    start: usize,
    end: usize,
    parallel: bool,
) -> Vec<TrialOutcome> {
    let run_one = |trial: usize| {
        let mut rng = trial_rng(seed, trial);
        sampler.sample(&mut rng)
    };

    if parallel {
        (start..end).into_par_iter().map(run_one).collect()
    } else {
        (start..end).map(run_one).collect()
    }
}
