//! Monte Carlo estimate of a player's passes, shots and goals for an upcoming fixture.
//!
//! Pipeline: [engine::fit] a pass trend from match history, build an [engine::OutcomeSampler]
//! for the fixture, draw trials with [runner::monte_carlo], then [runner::summary::summarize].
//! [runner::simulate_player] wires the whole run together.

pub mod cli;
pub mod data;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod runner;

pub use error::{Result, SimError};
