//! Position and tactic factor tables consumed by the outcome sampler.
//!
//! Tables are plain values: build one with [LookupTables::default] for the stock factors or
//! load a custom set with [crate::data::tables::load_tables], then hand it to the sampler.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Portero,
    Defensa,
    Mediocampo,
    Delantero,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Self::Portero,
        Self::Defensa,
        Self::Mediocampo,
        Self::Delantero,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portero => "portero",
            Self::Defensa => "defensa",
            Self::Mediocampo => "mediocampo",
            Self::Delantero => "delantero",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Position {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                SimError::configuration(
                    "position",
                    format!(
                        "unknown position '{s}' \
                         (expected portero, defensa, mediocampo or delantero)"
                    ),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tactic {
    Defensivo,
    Neutral,
    Ofensivo,
}

impl Tactic {
    pub const ALL: [Tactic; 3] = [Self::Defensivo, Self::Neutral, Self::Ofensivo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Defensivo => "defensivo",
            Self::Neutral => "neutral",
            Self::Ofensivo => "ofensivo",
        }
    }
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tactic {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                SimError::configuration(
                    "tactic",
                    format!("unknown tactic '{s}' (expected defensivo, neutral or ofensivo)"),
                )
            })
    }
}

/// How much a position contributes to attack, ball control and midfield circulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionWeights {
    #[serde(alias = "ataque")]
    pub attack: f64,
    pub control: f64,
    #[serde(alias = "medio")]
    pub midfield: f64,
}

/// Opponent posture. `opponent_defense` scales our passing volume and divides our scoring odds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TacticMultipliers {
    #[serde(alias = "ataque_rival")]
    pub opponent_attack: f64,
    #[serde(alias = "defensa_rival")]
    pub opponent_defense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupTables {
    #[serde(default)]
    pub positions: BTreeMap<Position, PositionWeights>,
    #[serde(default)]
    pub tactics: BTreeMap<Tactic, TacticMultipliers>,
}

impl Default for LookupTables {
    fn default() -> Self {
        let weights = |attack, control, midfield| PositionWeights {
            attack,
            control,
            midfield,
        };
        let multipliers = |opponent_attack, opponent_defense| TacticMultipliers {
            opponent_attack,
            opponent_defense,
        };
        let positions = BTreeMap::from([
            (Position::Portero, weights(0.01, 0.2, 0.5)),
            (Position::Defensa, weights(0.15, 0.5, 0.8)),
            (Position::Mediocampo, weights(0.60, 1.0, 1.0)),
            (Position::Delantero, weights(1.30, 0.7, 0.9)),
        ]);
        let tactics = BTreeMap::from([
            (Tactic::Defensivo, multipliers(0.5, 1.5)),
            (Tactic::Neutral, multipliers(1.0, 1.0)),
            (Tactic::Ofensivo, multipliers(1.5, 0.8)),
        ]);
        Self { positions, tactics }
    }
}

impl LookupTables {
    pub fn position(&self, position: Position) -> Result<PositionWeights> {
        self.positions.get(&position).copied().ok_or_else(|| {
            SimError::configuration("position", format!("no weights configured for '{position}'"))
        })
    }

    pub fn tactic(&self, tactic: Tactic) -> Result<TacticMultipliers> {
        self.tactics.get(&tactic).copied().ok_or_else(|| {
            SimError::configuration("tactic", format!("no multipliers configured for '{tactic}'"))
        })
    }

    /// Check every configured entry. Weights must be finite and non-negative; tactic
    /// multipliers must be finite and strictly positive since the sampler divides by them.
    pub fn validate(&self) -> Result<()> {
        for (position, w) in &self.positions {
            for (name, value) in [
                ("attack", w.attack),
                ("control", w.control),
                ("midfield", w.midfield),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(SimError::configuration(
                        format!("positions.{position}.{name}"),
                        format!("must be a finite non-negative number, got {value}"),
                    ));
                }
            }
        }
        for (tactic, m) in &self.tactics {
            for (name, value) in [
                ("opponent_attack", m.opponent_attack),
                ("opponent_defense", m.opponent_defense),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(SimError::configuration(
                        format!("tactics.{tactic}.{name}"),
                        format!("must be a finite positive number, got {value}"),
                    ));
                }
            }
        }
        Ok(())
    }
}
