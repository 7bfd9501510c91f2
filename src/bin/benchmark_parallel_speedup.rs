//! Run Monte Carlo once in sequential and once in parallel, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [trials]

use std::time::Instant;

use matchcast::engine::{LookupTables, SimulationContext, TrendCoefficients};
use matchcast::runner::monte_carlo::{run_monte_carlo, run_monte_carlo_parallel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let trials = std::env::args()
        .nth(1)
        .map(|raw| raw.parse::<usize>())
        .transpose()?
        .unwrap_or(1_000_000);
    let seed = 12345u64;

    let trend = TrendCoefficients {
        intercept: 58.0,
        slope: -2.4,
    };
    let tables = LookupTables::default();
    let ctx = SimulationContext {
        trial_count: trials,
        ..SimulationContext::default()
    };

    println!(
        "Monte Carlo: {} trials (position={}, tactic={}, strength={})",
        trials, ctx.position, ctx.tactic, ctx.opponent_strength
    );
    println!();

    let t0 = Instant::now();
    let results_seq = run_monte_carlo(&trend, &ctx, &tables, seed)?;
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} trials/s)",
        seq_ms,
        trials as f64 / elapsed_seq.as_secs_f64()
    );

    let t0 = Instant::now();
    let results_par = run_monte_carlo_parallel(&trend, &ctx, &tables, seed)?;
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Parallel:    {:.2} ms  ({:.1} trials/s)",
        par_ms,
        trials as f64 / elapsed_par.as_secs_f64()
    );

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    if results_seq != results_par {
        return Err("sequential and parallel runs diverged".into());
    }
    println!("(Results match sequential vs parallel)");
    Ok(())
}
