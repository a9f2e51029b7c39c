//! Walk-forward simulation: configuration, result, and the daily driver.

pub mod simulator;

pub use simulator::{run_walkforward, run_with_state};

use crate::domain::ClosedTrade;
use crate::error::SimError;
use crate::events::EngineEvent;
use crate::lifecycle::ExitRules;
use crate::portfolio::PortfolioCaps;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything a single simulation run needs, besides the injected feed,
/// signal source, and portfolio state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    /// First simulated day (inclusive).
    pub start: NaiveDate,
    /// Last simulated day (inclusive).
    pub end: NaiveDate,
    pub initial_capital: f64,
    /// Fraction of equity risked per new entry.
    pub risk_per_trade: f64,
    pub caps: PortfolioCaps,
    pub rules: ExitRules,
}

impl SimConfig {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            initial_capital: 100_000.0,
            risk_per_trade: 0.02,
            caps: PortfolioCaps::default(),
            rules: ExitRules::default(),
        }
    }

    /// The only fatal input check: an unordered date range fails before any
    /// simulation work begins.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.end < self.start {
            return Err(SimError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Output of one walk-forward run. Bit-identical across replays of identical
/// inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunResult {
    /// Append-only closed-trade log, in the order trades were produced.
    pub trades: Vec<ClosedTrade>,
    /// Simulated trading days, ascending.
    pub days: Vec<NaiveDate>,
    /// Realized account equity at the end of each simulated day.
    pub equity_curve: Vec<f64>,
    /// All lifecycle events, in emission order.
    pub events: Vec<EngineEvent>,
    /// Non-fatal notes: dropped signals, missing ticker-days, and similar.
    pub warnings: Vec<String>,
    pub final_equity: f64,
}
