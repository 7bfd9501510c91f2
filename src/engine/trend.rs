//! Least-squares trend of passes against opponent strength.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// One past match. Only `opponent_strength` and `passes` feed the trend; the other
/// columns are carried so ingested history round-trips without loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub opponent_strength: f64,
    pub is_home: bool,
    pub passes: f64,
    pub shots: f64,
    pub goals: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendCoefficients {
    pub intercept: f64,
    pub slope: f64,
}

impl TrendCoefficients {
    pub fn predict(&self, opponent_strength: f64) -> f64 {
        self.intercept + self.slope * opponent_strength
    }
}

pub const MIN_HISTORY_RECORDS: usize = 2;

/// Ordinary least squares of passes on opponent strength.
///
/// When every record has the same opponent strength the slope is undefined; the fit then
/// falls back to a flat line at the mean of passes instead of failing.
pub fn fit(records: &[HistoricalRecord]) -> Result<TrendCoefficients> {
    if records.len() < MIN_HISTORY_RECORDS {
        return Err(SimError::DataInsufficient {
            what: "trend fit (historical records)",
            required: MIN_HISTORY_RECORDS,
            found: records.len(),
        });
    }

    let n = records.len() as f64;
    let x_mean = records.iter().map(|r| r.opponent_strength).sum::<f64>() / n;
    let y_mean = records.iter().map(|r| r.passes).sum::<f64>() / n;

    let (num, den) = records.iter().fold((0.0, 0.0), |(num, den), r| {
        let dx = r.opponent_strength - x_mean;
        (num + dx * (r.passes - y_mean), den + dx * dx)
    });

    if den == 0.0 {
        return Ok(TrendCoefficients {
            intercept: y_mean,
            slope: 0.0,
        });
    }

    let slope = num / den;
    Ok(TrendCoefficients {
        intercept: y_mean - slope * x_mean,
        slope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(opponent_strength: f64, passes: f64) -> HistoricalRecord {
        HistoricalRecord {
            opponent_strength,
            is_home: true,
            passes,
            shots: 0.0,
            goals: 0,
        }
    }

    #[test]
    fn perfectly_linear_history_recovers_line() {
        let trend = fit(&[record(1.0, 2.0), record(2.0, 4.0), record(3.0, 6.0)]).unwrap();
        assert!(trend.intercept.abs() < 1e-9, "intercept={}", trend.intercept);
        assert!((trend.slope - 2.0).abs() < 1e-9, "slope={}", trend.slope);
    }

    #[test]
    fn constant_strength_falls_back_to_mean() {
        let trend = fit(&[record(5.0, 30.0), record(5.0, 40.0), record(5.0, 50.0)]).unwrap();
        assert_eq!(trend.slope, 0.0);
        assert!((trend.intercept - 40.0).abs() < 1e-12);
    }

    #[test]
    fn fewer_than_two_records_is_rejected() {
        assert!(matches!(
            fit(&[]),
            Err(SimError::DataInsufficient { found: 0, .. })
        ));
        assert!(matches!(
            fit(&[record(4.0, 20.0)]),
            Err(SimError::DataInsufficient { found: 1, required: 2, .. })
        ));
    }

    #[test]
    fn stronger_opponents_reduce_predicted_passes() {
        let trend = fit(&[
            record(2.0, 58.0),
            record(4.0, 51.0),
            record(7.0, 40.0),
            record(9.0, 33.0),
        ])
        .unwrap();
        assert!(trend.slope < 0.0);
        assert!(trend.predict(3.0) > trend.predict(8.0));
    }
}
