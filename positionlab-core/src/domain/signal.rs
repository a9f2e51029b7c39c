//! Signal — a candidate entry produced by an external strategy scanner.

use crate::error::SignalError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A candidate long entry: ticker, proposed prices, and a quality score.
///
/// Strategies are black boxes to the engine; the strategy field is only used
/// for per-strategy caps and reporting breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub ticker: String,
    pub strategy: String,
    pub date: NaiveDate,
    /// Proposed entry price (close of the signal day).
    pub entry: f64,
    /// Initial stop price. `entry - stop` is the position's risk-per-share
    /// for its entire life.
    pub stop: f64,
    /// Optional profit target. The lifecycle engine manages exits itself;
    /// the target only participates in validation.
    pub target: Option<f64>,
    /// Quality score on a 0-10 scale. Higher scores are admitted first when
    /// slots are scarce.
    pub score: f64,
}

impl Signal {
    /// Check the price relationships: stop < entry, and entry < target when
    /// a target is set. Violating signals never reach the engine.
    pub fn validate(&self) -> Result<(), SignalError> {
        if !(self.entry.is_finite() && self.stop.is_finite()) || self.entry <= 0.0 {
            return Err(SignalError::InvalidSignal {
                ticker: self.ticker.clone(),
                detail: format!("non-finite or non-positive prices: entry={}, stop={}", self.entry, self.stop),
            });
        }
        if self.stop >= self.entry {
            return Err(SignalError::InvalidSignal {
                ticker: self.ticker.clone(),
                detail: format!("stop {} must be below entry {}", self.stop, self.entry),
            });
        }
        if let Some(target) = self.target {
            if target <= self.entry {
                return Err(SignalError::InvalidSignal {
                    ticker: self.ticker.clone(),
                    detail: format!("target {} must be above entry {}", target, self.entry),
                });
            }
        }
        Ok(())
    }

    pub fn risk_per_share(&self) -> f64 {
        self.entry - self.stop
    }
}
