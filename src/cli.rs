use std::path::Path;

use crate::data::{load_history, load_tables_or_default};
use crate::engine::{fit, HistoricalRecord, Position, SimulationContext, Tactic};
use crate::error::SimError;
use crate::parallel::{run_simulation_batches, WorkerPool};
use crate::runner::{simulate_player, SimulationReport, SimulationRequest};

const USAGE: &str = "usage: matchcast <simulate|fit|validate> <history.csv|xlsx> [options]";
const SIMULATE_USAGE: &str = "usage: matchcast simulate <history.csv|xlsx> [--strength N] \
[--away] [--position P] [--tactic T] [--trials N] [--seed N] [--tables PATH] [--parallel] \
[--workers N] [--table]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Fit,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("fit") => Some(Command::Fit),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Fit) => handle_fit(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Options accepted by `simulate`, after the history path.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateOptions {
    pub context: SimulationContext,
    pub seed: u64,
    pub tables_path: Option<String>,
    pub parallel: bool,
    pub workers: Option<usize>,
    pub as_table: bool,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            context: SimulationContext::default(),
            seed: 0,
            tables_path: None,
            parallel: false,
            workers: None,
            as_table: false,
        }
    }
}

/// Parse `simulate` flags. Unknown flags and malformed values are usage errors;
/// range checks are left to the simulation so they report the offending field.
pub fn parse_simulate_options(flags: &[String]) -> Result<SimulateOptions, String> {
    let mut options = SimulateOptions::default();
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .map(String::as_str)
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match flag.as_str() {
            "--strength" => options.context.opponent_strength = parse_value(value(flag)?, flag)?,
            "--away" => options.context.is_home = false,
            "--home" => options.context.is_home = true,
            "--position" => {
                options.context.position =
                    value(flag)?.parse::<Position>().map_err(|e| e.to_string())?
            }
            "--tactic" => {
                options.context.tactic = value(flag)?.parse::<Tactic>().map_err(|e| e.to_string())?
            }
            "--trials" => options.context.trial_count = parse_value(value(flag)?, flag)?,
            "--seed" => options.seed = parse_value(value(flag)?, flag)?,
            "--tables" => options.tables_path = Some(value(flag)?.to_string()),
            "--parallel" => options.parallel = true,
            "--workers" => {
                options.workers = Some(parse_value(value(flag)?, flag)?);
                options.parallel = true;
            }
            "--table" => options.as_table = true,
            other => return Err(format!("unknown option '{other}'")),
        }
    }
    Ok(options)
}

fn parse_value<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("invalid {name} '{raw}'"))
}

fn handle_simulate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("{SIMULATE_USAGE}");
        return 2;
    };
    let options = match parse_simulate_options(&args[3..]) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{SIMULATE_USAGE}");
            return 2;
        }
    };

    let report = match run_simulation(path, &options) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return 1;
        }
    };

    if options.as_table {
        print!("{}", format_summary_table(&report));
        return 0;
    }
    match serde_json::to_string_pretty(&report) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize simulation report: {err}");
            1
        }
    }
}

fn run_simulation(path: &str, options: &SimulateOptions) -> Result<SimulationReport, SimError> {
    let history = load_history(path)?;
    let tables = load_tables_or_default(options.tables_path.as_deref().map(Path::new))?;
    let request = SimulationRequest {
        history: &history,
        context: options.context,
        tables: &tables,
        seed: options.seed,
        parallel: options.parallel,
    };
    match options.workers {
        Some(workers) => run_simulation_batches(&request, &WorkerPool::with_workers(workers)),
        None => simulate_player(&request),
    }
}

pub fn format_summary_table(report: &SimulationReport) -> String {
    let s = &report.summary;
    format!(
        "mean_passes\tmean_shots\tmean_goals\tscoring_probability\tstandout_probability\n\
         {:.2}\t{:.2}\t{:.2}\t{:.1}\t{:.1}\n",
        s.mean_passes, s.mean_shots, s.mean_goals, s.scoring_probability, s.standout_probability
    )
}

fn load_history_or_report(args: &[String], command: &str) -> Result<Vec<HistoricalRecord>, i32> {
    let Some(path) = args.get(2) else {
        eprintln!("usage: matchcast {command} <history.csv|xlsx>");
        return Err(2);
    };
    load_history(path).map_err(|err| {
        eprintln!("failed to load history: {err}");
        1
    })
}

fn handle_fit(args: &[String]) -> i32 {
    let history = match load_history_or_report(args, "fit") {
        Ok(history) => history,
        Err(code) => return code,
    };
    let trend = match fit(&history) {
        Ok(trend) => trend,
        Err(err) => {
            eprintln!("fit failed: {err}");
            return 1;
        }
    };
    match serde_json::to_string_pretty(&trend) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize trend: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    match load_history_or_report(args, "validate") {
        Ok(history) => {
            println!("validation passed: records={}", history.len());
            if history.len() < crate::engine::MIN_HISTORY_RECORDS {
                eprintln!(
                    "warning: at least {} records are needed to simulate",
                    crate::engine::MIN_HISTORY_RECORDS
                );
            }
            0
        }
        Err(code) => code,
    }
}
