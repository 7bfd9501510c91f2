pub mod rng;
pub mod sampler;
pub mod tables;
pub mod trend;

pub use rng::{trial_rng, SeedSequence, TrialRng};
pub use sampler::{
    goal_probability, sample, OutcomeSampler, SimulationContext, TrialOutcome,
    DEFAULT_TRIAL_COUNT, GOAL_PROBABILITY_CAP, OPPORTUNITIES_MEAN,
};
pub use tables::{LookupTables, Position, PositionWeights, Tactic, TacticMultipliers};
pub use trend::{fit, HistoricalRecord, TrendCoefficients, MIN_HISTORY_RECORDS};
