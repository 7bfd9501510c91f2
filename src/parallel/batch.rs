//! Batch distribution for parallel simulation.
//!
//! Splits a run's trials into contiguous ranges for progress reporting. Because each trial
//! seeds its own random source, concatenating batch results gives the same sequence as a
//! single pass.

use crate::error::Result;
use crate::parallel::pool::WorkerPool;
use crate::runner::{simulate_player, SimulationReport, SimulationRequest};

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use matchcast::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Run a parallel simulation inside `pool`, so the worker count can be capped.
pub fn run_simulation_batches(
    request: &SimulationRequest<'_>,
    pool: &WorkerPool,
) -> Result<SimulationReport> {
    let request = SimulationRequest {
        parallel: true,
        ..request.clone()
    };
    pool.install(|| simulate_player(&request))?
}
