//! Performance metrics — pure functions over the closed-trade log and the
//! realized equity curve.
//!
//! Every metric is a pure function: trade list and/or equity curve in,
//! scalar or table out. No dependencies on the engine or any I/O.

use positionlab_core::domain::{ClosedTrade, PositionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One row of a per-key breakdown table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakdownRow {
    pub count: usize,
    pub avg_r: f64,
    pub total_pnl: f64,
}

/// Aggregate statistics for a single run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub total_pnl: f64,
    /// Fraction of closed positions whose aggregate P&L (partials folded in
    /// at final close) came out positive.
    pub win_rate: f64,
    pub avg_r: f64,
    pub profit_factor: f64,
    pub max_drawdown: f64,
    /// Distinct positions that reached a terminal exit.
    pub position_count: usize,
    /// Trade records, partial exits included.
    pub trade_count: usize,
    pub avg_bars_held: f64,
    pub by_exit_reason: BTreeMap<String, BreakdownRow>,
    pub by_strategy: BTreeMap<String, BreakdownRow>,
    pub by_year: BTreeMap<i32, BreakdownRow>,
}

impl PerformanceSummary {
    /// Compute all metrics from a trade log and equity curve.
    pub fn compute(trades: &[ClosedTrade], equity_curve: &[f64], initial_capital: f64) -> Self {
        Self {
            total_return: total_return(equity_curve, initial_capital),
            total_pnl: trades.iter().map(|t| t.pnl).sum(),
            win_rate: win_rate(trades),
            avg_r: avg_r(trades),
            profit_factor: profit_factor(trades),
            max_drawdown: max_drawdown(equity_curve),
            position_count: closed_positions(trades).len(),
            trade_count: trades.len(),
            avg_bars_held: avg_bars_held(trades),
            by_exit_reason: breakdown(trades, |t| t.reason.to_string()),
            by_strategy: breakdown(trades, |t| t.strategy.clone()),
            by_year: breakdown(trades, |t| {
                use chrono::Datelike;
                t.exit_date.year()
            }),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction of initial capital.
pub fn total_return(equity_curve: &[f64], initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    match equity_curve.last() {
        Some(&final_eq) => (final_eq - initial_capital) / initial_capital,
        None => 0.0,
    }
}

/// Positions that have a terminal exit record.
fn closed_positions(trades: &[ClosedTrade]) -> BTreeSet<PositionId> {
    trades
        .iter()
        .filter(|t| t.reason.is_terminal())
        .map(|t| t.position_id)
        .collect()
}

/// Win rate over positions, not records: a partial exit only counts through
/// the parent position's aggregate P&L once the runner closes.
pub fn win_rate(trades: &[ClosedTrade]) -> f64 {
    let closed = closed_positions(trades);
    if closed.is_empty() {
        return 0.0;
    }
    let mut pnl_by_position: BTreeMap<PositionId, f64> = BTreeMap::new();
    for trade in trades {
        *pnl_by_position.entry(trade.position_id).or_default() += trade.pnl;
    }
    let winners = closed
        .iter()
        .filter(|id| pnl_by_position.get(id).copied().unwrap_or(0.0) > 0.0)
        .count();
    winners as f64 / closed.len() as f64
}

/// Mean R-multiple across trade records, partial exits included.
pub fn avg_r(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| t.r_multiple).sum::<f64>() / trades.len() as f64
}

/// Gross profits / gross losses, capped at 100 when losses are zero.
pub fn profit_factor(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl.abs())
        .sum();

    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

/// Maximum drawdown as a negative fraction (e.g. -0.15 for a 15% drawdown).
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let mut peak = equity_curve[0];
    let mut max_dd = 0.0_f64;
    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Mean holding period of terminal exits, in trading days.
pub fn avg_bars_held(trades: &[ClosedTrade]) -> f64 {
    let terminal: Vec<&ClosedTrade> = trades.iter().filter(|t| t.reason.is_terminal()).collect();
    if terminal.is_empty() {
        return 0.0;
    }
    terminal.iter().map(|t| t.bars_held as f64).sum::<f64>() / terminal.len() as f64
}

/// Group trades by an arbitrary key: count, mean R, total P&L per group.
pub fn breakdown<K: Ord>(
    trades: &[ClosedTrade],
    key: impl Fn(&ClosedTrade) -> K,
) -> BTreeMap<K, BreakdownRow> {
    let mut grouped: BTreeMap<K, Vec<&ClosedTrade>> = BTreeMap::new();
    for trade in trades {
        grouped.entry(key(trade)).or_default().push(trade);
    }
    grouped
        .into_iter()
        .map(|(k, group)| {
            let count = group.len();
            let avg_r = group.iter().map(|t| t.r_multiple).sum::<f64>() / count as f64;
            let total_pnl = group.iter().map(|t| t.pnl).sum();
            (
                k,
                BreakdownRow {
                    count,
                    avg_r,
                    total_pnl,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use positionlab_core::domain::ExitReason;

    fn trade(
        id: u64,
        reason: ExitReason,
        pnl: f64,
        r: f64,
        strategy: &str,
        bars: u32,
    ) -> ClosedTrade {
        ClosedTrade {
            position_id: PositionId(id),
            ticker: "NVDA".into(),
            strategy: strategy.into(),
            shares: 100,
            entry_price: 100.0,
            exit_price: 100.0 + pnl / 100.0,
            exit_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            reason,
            pnl,
            r_multiple: r,
            bars_held: bars,
        }
    }

    #[test]
    fn win_rate_folds_partials_into_the_parent() {
        // Position 0: +3R partial, then a breakeven stop-out. Aggregate is
        // positive, so it counts as one win even though the terminal record
        // itself is flat.
        let trades = vec![
            trade(0, ExitReason::PartialProfit, 1755.0, 3.0, "rs_ranker", 10),
            trade(0, ExitReason::StopLoss, 0.0, 0.0, "rs_ranker", 14),
            trade(1, ExitReason::StopLoss, -2000.0, -1.0, "rs_ranker", 5),
        ];
        assert!((win_rate(&trades) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn open_partials_do_not_count_until_final_close() {
        // Only a partial so far: no closed position, no win yet.
        let trades = vec![trade(0, ExitReason::PartialProfit, 1755.0, 3.0, "rs_ranker", 10)];
        assert_eq!(win_rate(&trades), 0.0);
        assert!(closed_positions(&trades).is_empty());
    }

    #[test]
    fn drawdown_from_realized_equity() {
        let curve = vec![100_000.0, 104_000.0, 98_800.0, 101_000.0];
        assert!((max_drawdown(&curve) - (98_800.0 - 104_000.0) / 104_000.0).abs() < 1e-12);
    }

    #[test]
    fn drawdown_is_zero_for_monotonic_equity() {
        let curve = vec![100.0, 101.0, 103.0];
        assert_eq!(max_drawdown(&curve), 0.0);
    }

    #[test]
    fn profit_factor_caps_at_100() {
        let trades = vec![trade(0, ExitReason::EndOfBacktest, 500.0, 1.0, "rs_ranker", 3)];
        assert_eq!(profit_factor(&trades), 100.0);
    }

    #[test]
    fn breakdown_by_reason_uses_display_strings() {
        let trades = vec![
            trade(0, ExitReason::StopLoss, -2000.0, -1.0, "rs_ranker", 5),
            trade(1, ExitReason::StopLoss, -1900.0, -1.0, "high52", 7),
            trade(2, ExitReason::TimeStop { max_days: 150 }, 800.0, 0.4, "rs_ranker", 150),
        ];
        let rows = breakdown(&trades, |t| t.reason.to_string());
        assert_eq!(rows["StopLoss"].count, 2);
        assert!((rows["StopLoss"].avg_r + 1.0).abs() < 1e-10);
        assert_eq!(rows["TimeStop_150d"].count, 1);
    }

    #[test]
    fn summary_computes_end_to_end() {
        let trades = vec![
            trade(0, ExitReason::PartialProfit, 1755.0, 3.0, "rs_ranker", 10),
            trade(0, ExitReason::Ema21TrailEarly, 2100.0, 1.8, "rs_ranker", 30),
            trade(1, ExitReason::StopLoss, -2000.0, -1.0, "high52", 5),
        ];
        let curve = vec![100_000.0, 101_755.0, 99_755.0, 101_855.0];
        let summary = PerformanceSummary::compute(&trades, &curve, 100_000.0);

        assert_eq!(summary.position_count, 2);
        assert_eq!(summary.trade_count, 3);
        assert!((summary.win_rate - 0.5).abs() < 1e-10);
        assert!((summary.total_pnl - 1855.0).abs() < 1e-10);
        assert!((summary.total_return - 0.01855).abs() < 1e-10);
        assert_eq!(summary.by_strategy["rs_ranker"].count, 2);
        assert!((summary.avg_bars_held - 17.5).abs() < 1e-10);
    }
}
