//! Reduce a trial sequence to decision-ready metrics.

use serde::{Deserialize, Serialize};

use crate::engine::TrialOutcome;
use crate::error::{Result, SimError};

pub const STANDOUT_PASS_WEIGHT: f64 = 0.05;
pub const STANDOUT_SHOT_WEIGHT: f64 = 1.0;
pub const STANDOUT_GOAL_WEIGHT: f64 = 5.0;

/// Number of leading trials kept for the passes variability chart.
pub const PASSES_PREVIEW_LEN: usize = 50;

/// Fewest outcomes the aggregator accepts.
pub const MIN_OUTCOMES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub mean_passes: f64,
    pub mean_shots: f64,
    pub mean_goals: f64,
    /// Percentage of trials with at least one goal.
    pub scoring_probability: f64,
    /// Percentage of trials whose standout score beats mean + one standard deviation.
    pub standout_probability: f64,
}

/// Fixed composite that weights goals highest, then shots, then passes.
pub fn standout_score(outcome: &TrialOutcome) -> f64 {
    outcome.passes * STANDOUT_PASS_WEIGHT
        + outcome.shots as f64 * STANDOUT_SHOT_WEIGHT
        + outcome.goals as f64 * STANDOUT_GOAL_WEIGHT
}

/// Summarize at least two outcomes.
///
/// The standout probability is an empirical heuristic: the share of trials whose composite
/// score exceeds the sample mean plus one sample standard deviation. It is descriptive only
/// and carries no calibrated statistical meaning.
pub fn summarize(outcomes: &[TrialOutcome]) -> Result<AggregateResult> {
    if outcomes.len() < MIN_OUTCOMES {
        return Err(SimError::DataInsufficient {
            what: "summary (trial outcomes)",
            required: MIN_OUTCOMES,
            found: outcomes.len(),
        });
    }

    let n = outcomes.len() as f64;
    let mean_passes = outcomes.iter().map(|o| o.passes).sum::<f64>() / n;
    let mean_shots = outcomes.iter().map(|o| o.shots as f64).sum::<f64>() / n;
    let mean_goals = outcomes.iter().map(|o| o.goals as f64).sum::<f64>() / n;

    let scoring = outcomes.iter().filter(|o| o.goals > 0).count();

    let scores: Vec<f64> = outcomes.iter().map(standout_score).collect();
    let threshold = mean(&scores) + sample_std_dev(&scores);
    let standout = scores.iter().filter(|&&s| s > threshold).count();

    Ok(AggregateResult {
        mean_passes,
        mean_shots,
        mean_goals,
        scoring_probability: 100.0 * scoring as f64 / n,
        standout_probability: 100.0 * standout as f64 / n,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Trial counts per goal tally: `histogram[g]` is how many trials ended with `g` goals.
pub fn goal_histogram(outcomes: &[TrialOutcome]) -> Vec<usize> {
    let max_goals = outcomes.iter().map(|o| o.goals).max().unwrap_or(0) as usize;
    let mut histogram = vec![0usize; max_goals + 1];
    for outcome in outcomes {
        histogram[outcome.goals as usize] += 1;
    }
    histogram
}

/// Passes of the first `limit` trials in trial order.
pub fn passes_preview(outcomes: &[TrialOutcome], limit: usize) -> Vec<f64> {
    outcomes.iter().take(limit).map(|o| o.passes).collect()
}
