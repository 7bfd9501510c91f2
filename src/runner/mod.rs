pub mod monte_carlo;
pub mod summary;

use serde::Serialize;
use tracing::info;

use crate::engine::{
    fit, HistoricalRecord, LookupTables, OutcomeSampler, SimulationContext, TrendCoefficients,
    TrialOutcome,
};
use crate::error::{Result, SimError};
use crate::parallel::batch_ranges;
use crate::runner::monte_carlo::run_trial_range;
use crate::runner::summary::{
    goal_histogram, passes_preview, summarize, AggregateResult, MIN_OUTCOMES, PASSES_PREVIEW_LEN,
};

/// Number of progress-reporting batches for simulate-with-progress.
const SIMULATE_PROGRESS_BATCH_COUNT: usize = 20;

#[derive(Debug, Clone)]
pub struct SimulationRequest<'a> {
    pub history: &'a [HistoricalRecord],
    pub context: SimulationContext,
    pub tables: &'a LookupTables,
    pub seed: u64,
    /// When true, trials are spread across Rayon workers. Results are identical either way.
    pub parallel: bool,
}

/// Everything a front end needs to present one run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub context: SimulationContext,
    pub seed: u64,
    pub trend: TrendCoefficients,
    pub expected_passes: f64,
    pub goal_probability: f64,
    pub summary: AggregateResult,
    /// `goal_histogram[g]` = number of trials with exactly `g` goals.
    pub goal_histogram: Vec<usize>,
    /// Passes of the first trials, for a variability chart.
    pub passes_preview: Vec<f64>,
    #[serde(skip)]
    pub outcomes: Vec<TrialOutcome>,
}

/// Fit the trend, run the trials and summarize them.
pub fn simulate_player(request: &SimulationRequest<'_>) -> Result<SimulationReport> {
    simulate_player_with_progress(request, |_, _| {})
}

/// Like [simulate_player] but runs in batches and invokes `on_progress(done, total)` after each.
pub fn simulate_player_with_progress<F>(
    request: &SimulationRequest<'_>,
    mut on_progress: F,
) -> Result<SimulationReport>
where
    F: FnMut(usize, usize),
{
    let ctx = &request.context;
    ctx.validate()?;
    if ctx.trial_count < MIN_OUTCOMES {
        return Err(SimError::DataInsufficient {
            what: "summary (trial outcomes)",
            required: MIN_OUTCOMES,
            found: ctx.trial_count,
        });
    }
    request.tables.validate()?;
    let trend = fit(request.history)?;
    let sampler = OutcomeSampler::new(&trend, ctx, request.tables)?;

    let total = ctx.trial_count;
    on_progress(0, total);

    let mut outcomes: Vec<TrialOutcome> = Vec::with_capacity(total);
    for (start, end) in batch_ranges(total, SIMULATE_PROGRESS_BATCH_COUNT) {
        outcomes.extend(run_trial_range(&sampler, request.seed, start, end, request.parallel));
        on_progress(end, total);
    }

    let summary = summarize(&outcomes)?;
    info!(
        trials = total,
        position = %ctx.position,
        tactic = %ctx.tactic,
        mean_goals = summary.mean_goals,
        scoring_probability = summary.scoring_probability,
        "simulation complete"
    );

    Ok(SimulationReport {
        context: *ctx,
        seed: request.seed,
        trend,
        expected_passes: sampler.expected_passes(),
        goal_probability: sampler.goal_probability(),
        summary,
        goal_histogram: goal_histogram(&outcomes),
        passes_preview: passes_preview(&outcomes, PASSES_PREVIEW_LEN),
        outcomes,
    })
}
