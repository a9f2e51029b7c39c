//! ClosedTrade — an immutable record of liquidated shares.

use super::ids::PositionId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a liquidation happened.
///
/// The `Display` form is the stable string used in reports and CSV exports;
/// the time stop carries its threshold so `TimeStop_150d` and `TimeStop_90d`
/// runs stay distinguishable in breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    /// Close (or low, per the configured stop policy) breached the stop.
    StopLoss,
    /// The one-time profit-taking exit on part of the position.
    PartialProfit,
    /// Consecutive closes below EMA21 during the early trail phase.
    Ema21TrailEarly,
    /// Consecutive closes below MA100 during the late trail phase.
    Ma100TrailLate,
    /// Held past the maximum holding period with no pyramid adds.
    TimeStop { max_days: u32 },
    /// Simulation horizon reached with the position still open.
    EndOfBacktest,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "StopLoss"),
            ExitReason::PartialProfit => write!(f, "PartialProfit"),
            ExitReason::Ema21TrailEarly => write!(f, "EMA21_Trail_Early"),
            ExitReason::Ma100TrailLate => write!(f, "MA100_Trail_Late"),
            ExitReason::TimeStop { max_days } => write!(f, "TimeStop_{max_days}d"),
            ExitReason::EndOfBacktest => write!(f, "EndOfBacktest"),
        }
    }
}

impl ExitReason {
    /// Whether this reason terminates the position. `PartialProfit` leaves
    /// the runner open; everything else closes it.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExitReason::PartialProfit)
    }
}

/// Immutable record created whenever shares are liquidated.
///
/// A partial exit produces one record while the position stays open; the
/// final exit produces the terminal record. Records are append-only and never
/// mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosedTrade {
    pub position_id: PositionId,
    pub ticker: String,
    pub strategy: String,
    /// Shares liquidated by this record.
    pub shares: u64,
    /// Weighted entry price of the liquidated shares, drawn oldest-tranche-first.
    pub entry_price: f64,
    pub exit_price: f64,
    pub exit_date: NaiveDate,
    pub reason: ExitReason,
    /// Realized profit in account currency: (exit - basis) * shares.
    pub pnl: f64,
    /// Profit per share over the position's original risk-per-share,
    /// measured from the first tranche's entry.
    pub r_multiple: f64,
    /// Trading days between the first tranche's entry and this exit.
    pub bars_held: u32,
}

impl ClosedTrade {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
