//! Position — the mutable state of one open trade, tranche accounting included.

use super::ids::PositionId;
use super::signal::Signal;
use super::trade::{ClosedTrade, ExitReason};
use super::tranche::Tranche;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle states: OPEN (no partial taken) -> PARTIAL (runner trailing) ->
/// CLOSED (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    Partial,
    Closed,
}

/// One open trade, exclusively owned by the portfolio manager.
///
/// Tranches are the immutable acquisition record; `sold` is the cumulative
/// oldest-first liquidation cursor. Total and open share counts are always
/// derivable, and the original tranche list survives until close so the
/// share-conservation invariant can be checked against the trade log.
///
/// `entry_price`, `entry_date`, and `risk_per_share` are frozen from the
/// first tranche: pyramid adds never move the R reference or the breakeven
/// level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub id: PositionId,
    pub ticker: String,
    pub strategy: String,
    pub tranches: Vec<Tranche>,
    /// Cumulative shares liquidated, drawn from tranches oldest-first.
    pub sold: u64,
    pub stop_price: f64,
    /// First tranche's entry price, frozen.
    pub entry_price: f64,
    /// First tranche's entry date, frozen.
    pub entry_date: NaiveDate,
    /// First tranche's entry minus initial stop, frozen.
    pub risk_per_share: f64,
    pub partial_taken: bool,
    pub pyramid_count: u32,
    /// Highest close observed since the first tranche's entry.
    pub highest_close: f64,
    /// Consecutive closes below the active trail reference line.
    pub trail_breaches: u32,
    /// Trading days evaluated since entry. The entry day itself is day 0.
    pub bars_held: u32,
    pub status: PositionStatus,
}

impl Position {
    /// Create a freshly filled position from an accepted signal.
    pub fn open(id: PositionId, signal: &Signal, shares: u64) -> Self {
        Self {
            id,
            ticker: signal.ticker.clone(),
            strategy: signal.strategy.clone(),
            tranches: vec![Tranche::new(shares, signal.entry, signal.date)],
            sold: 0,
            stop_price: signal.stop,
            entry_price: signal.entry,
            entry_date: signal.date,
            risk_per_share: signal.risk_per_share(),
            partial_taken: false,
            pyramid_count: 0,
            highest_close: signal.entry,
            trail_breaches: 0,
            bars_held: 0,
            status: PositionStatus::Open,
        }
    }

    /// Total shares ever acquired, across all tranches.
    pub fn total_shares(&self) -> u64 {
        self.tranches.iter().map(|t| t.shares).sum()
    }

    /// Shares still held.
    pub fn open_shares(&self) -> u64 {
        self.total_shares() - self.sold
    }

    /// Weighted-average entry price over all tranches.
    pub fn cost_basis(&self) -> f64 {
        let total = self.total_shares();
        if total == 0 {
            return 0.0;
        }
        self.tranches.iter().map(Tranche::notional).sum::<f64>() / total as f64
    }

    /// Unrealized R-multiple at `close`, measured on the first tranche.
    pub fn unrealized_r(&self, close: f64) -> f64 {
        (close - self.entry_price) / self.risk_per_share
    }

    pub fn is_open(&self) -> bool {
        self.status != PositionStatus::Closed
    }

    /// Weighted entry price of the next `shares` to be liquidated,
    /// oldest-tranche-first from the current cursor.
    pub fn draw_basis(&self, shares: u64) -> f64 {
        debug_assert!(shares > 0 && shares <= self.open_shares());
        let mut skip = self.sold;
        let mut remaining = shares;
        let mut cost = 0.0;
        for tranche in &self.tranches {
            let skipped = skip.min(tranche.shares);
            skip -= skipped;
            let take = (tranche.shares - skipped).min(remaining);
            cost += take as f64 * tranche.entry_price;
            remaining -= take;
            if remaining == 0 {
                break;
            }
        }
        cost / shares as f64
    }

    /// Liquidate `shares` at `price`, producing the immutable trade record
    /// and advancing the oldest-first cursor. The caller owns the status
    /// transition.
    pub fn liquidate(
        &mut self,
        shares: u64,
        price: f64,
        date: NaiveDate,
        reason: ExitReason,
    ) -> ClosedTrade {
        let basis = self.draw_basis(shares);
        self.sold += shares;
        ClosedTrade {
            position_id: self.id,
            ticker: self.ticker.clone(),
            strategy: self.strategy.clone(),
            shares,
            entry_price: basis,
            exit_price: price,
            exit_date: date,
            reason,
            pnl: (price - basis) * shares as f64,
            r_multiple: (price - self.entry_price) / self.risk_per_share,
            bars_held: self.bars_held,
        }
    }
}
