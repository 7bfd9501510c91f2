//! Single-trial outcome draw: passes, shots and goals for one hypothetical match.

use rand::distributions::Bernoulli;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::engine::tables::{LookupTables, Position, PositionWeights, Tactic, TacticMultipliers};
use crate::engine::trend::TrendCoefficients;
use crate::error::{Result, SimError};

pub const DEFAULT_TRIAL_COUNT: usize = 300;

pub const HOME_PASS_FACTOR: f64 = 1.10;
pub const AWAY_PASS_FACTOR: f64 = 0.90;
pub const PASSES_STD_DEV: f64 = 5.0;
/// Defenders facing an attacking side see far more erratic passing volumes.
pub const PASSES_STD_DEV_DEFENDER_VS_OFFENSIVE: f64 = 12.0;
pub const OPPORTUNITIES_MEAN: f64 = 3.0;
pub const OPPORTUNITIES_STD_DEV: f64 = 1.0;
pub const GOAL_PROBABILITY_CAP: f64 = 0.60;
pub const MIN_OPPONENT_STRENGTH: f64 = 1.0;
pub const MAX_OPPONENT_STRENGTH: f64 = 10.0;

const STRENGTH_CEILING: f64 = 11.0;
const STRENGTH_STEP: f64 = 0.15;
const CONVERSION_SCALE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationContext {
    pub opponent_strength: f64,
    pub is_home: bool,
    pub position: Position,
    pub tactic: Tactic,
    pub trial_count: usize,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self {
            opponent_strength: 5.0,
            is_home: true,
            position: Position::Delantero,
            tactic: Tactic::Neutral,
            trial_count: DEFAULT_TRIAL_COUNT,
        }
    }
}

impl SimulationContext {
    /// Checks the per-match parameters the sampler reads.
    pub fn validate_match(&self) -> Result<()> {
        let s = self.opponent_strength;
        if !s.is_finite() || !(MIN_OPPONENT_STRENGTH..=MAX_OPPONENT_STRENGTH).contains(&s) {
            return Err(SimError::configuration(
                "opponent_strength",
                format!(
                    "must be between {MIN_OPPONENT_STRENGTH} and {MAX_OPPONENT_STRENGTH}, got {s}"
                ),
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_match()?;
        if self.trial_count == 0 {
            return Err(SimError::configuration("trial_count", "must be a positive integer"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub passes: f64,
    pub shots: u32,
    pub goals: u32,
}

/// Per-trial goal conversion probability, capped at [GOAL_PROBABILITY_CAP].
/// Scoring odds grow linearly as the opponent weakens and shrink with their defensive posture.
pub fn goal_probability(
    weights: PositionWeights,
    multipliers: TacticMultipliers,
    opponent_strength: f64,
) -> f64 {
    let strength_factor = (STRENGTH_CEILING - opponent_strength) * STRENGTH_STEP;
    let defense_inverse = 1.0 / multipliers.opponent_defense;
    let p = weights.attack * strength_factor * defense_inverse * CONVERSION_SCALE;
    p.min(GOAL_PROBABILITY_CAP)
}

/// Sampler with every lookup and distribution resolved up front, so configuration
/// problems surface before the first trial and each draw is infallible.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeSampler {
    expected_passes: f64,
    passes_std_dev: f64,
    passes: Normal<f64>,
    opportunities: Normal<f64>,
    goal: Bernoulli,
    goal_probability: f64,
}

impl OutcomeSampler {
    pub fn new(
        trend: &TrendCoefficients,
        ctx: &SimulationContext,
        tables: &LookupTables,
    ) -> Result<Self> {
        ctx.validate_match()?;
        let weights = tables.position(ctx.position)?;
        let multipliers = tables.tactic(ctx.tactic)?;

        let venue = if ctx.is_home {
            HOME_PASS_FACTOR
        } else {
            AWAY_PASS_FACTOR
        };
        let base = trend.predict(ctx.opponent_strength) * venue;
        let expected_passes = base * weights.midfield * multipliers.opponent_defense;
        if !expected_passes.is_finite() {
            return Err(SimError::configuration(
                "trend",
                format!("expected passes is not finite ({expected_passes})"),
            ));
        }

        let std_dev = if ctx.position == Position::Defensa && ctx.tactic == Tactic::Ofensivo {
            PASSES_STD_DEV_DEFENDER_VS_OFFENSIVE
        } else {
            PASSES_STD_DEV
        };
        let passes = Normal::new(expected_passes, std_dev)
            .map_err(|err| SimError::configuration("passes_distribution", err.to_string()))?;
        let opportunities = Normal::new(OPPORTUNITIES_MEAN, OPPORTUNITIES_STD_DEV)
            .map_err(|err| SimError::configuration("opportunities_distribution", err.to_string()))?;

        let goal_probability = goal_probability(weights, multipliers, ctx.opponent_strength);
        let goal = Bernoulli::new(goal_probability)
            .map_err(|err| SimError::configuration("goal_probability", err.to_string()))?;

        Ok(Self {
            expected_passes,
            passes_std_dev: std_dev,
            passes,
            opportunities,
            goal,
            goal_probability,
        })
    }

    pub fn expected_passes(&self) -> f64 {
        self.expected_passes
    }

    pub fn passes_std_dev(&self) -> f64 {
        self.passes_std_dev
    }

    pub fn goal_probability(&self) -> f64 {
        self.goal_probability
    }

    /// Draw one outcome. Draw order is passes, opportunities, per-opportunity goals, extra shots.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TrialOutcome {
        self.sample_with_opportunities(rng).0
    }

    /// Same draw as [OutcomeSampler::sample], also returning the number of scoring opportunities.
    pub fn sample_with_opportunities<R: Rng + ?Sized>(&self, rng: &mut R) -> (TrialOutcome, u32) {
        let passes = self.passes.sample(rng).max(0.0);

        let opportunities = self.opportunities.sample(rng).round().max(1.0) as u32;
        let goals = (0..opportunities)
            .filter(|_| self.goal.sample(rng))
            .count() as u32;
        let shots = opportunities + rng.gen_range(0..=2u32);

        let outcome = TrialOutcome {
            passes,
            shots,
            goals,
        };
        (outcome, opportunities)
    }
}

/// One-shot draw. Prefer building an [OutcomeSampler] once when drawing many trials.
pub fn sample<R: Rng + ?Sized>(
    trend: &TrendCoefficients,
    ctx: &SimulationContext,
    tables: &LookupTables,
    rng: &mut R,
) -> Result<TrialOutcome> {
    Ok(OutcomeSampler::new(trend, ctx, tables)?.sample(rng))
}
