//! Apply a day's decision to the position it was computed for.
//!
//! `decide` is pure; this is the single place position state mutates during
//! the daily update. Each action produces at most one trade record and one
//! engine event.

use super::evaluate::{DayAction, DayOutcome};
use crate::domain::{ClosedTrade, ExitReason, Position, PositionStatus, Tranche};
use crate::events::EngineEvent;
use chrono::NaiveDate;

/// The mutations' visible output: the trade (if shares were liquidated) and
/// the event for subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub trade: Option<ClosedTrade>,
    pub event: Option<EngineEvent>,
}

/// Write back the day's bookkeeping and perform the decided action.
pub fn apply(position: &mut Position, outcome: &DayOutcome, date: NaiveDate) -> StepResult {
    position.bars_held = outcome.bars_held;
    position.highest_close = outcome.highest_close;
    position.trail_breaches = outcome.trail_breaches;

    match outcome.action {
        DayAction::Hold => StepResult {
            trade: None,
            event: None,
        },
        DayAction::TakePartial { price, shares } => {
            let trade = position.liquidate(shares, price, date, ExitReason::PartialProfit);
            // Breakeven lock: the runner can no longer turn this into a loss
            // on the first tranche.
            position.stop_price = position.entry_price;
            position.partial_taken = true;
            position.status = PositionStatus::Partial;
            StepResult {
                event: Some(EngineEvent::PartialTaken {
                    ticker: position.ticker.clone(),
                    date,
                    shares,
                    price,
                }),
                trade: Some(trade),
            }
        }
        DayAction::AddPyramid { price, shares } => {
            position.tranches.push(Tranche::new(shares, price, date));
            position.pyramid_count += 1;
            StepResult {
                trade: None,
                event: Some(EngineEvent::PyramidAdded {
                    ticker: position.ticker.clone(),
                    date,
                    shares,
                    price,
                }),
            }
        }
        DayAction::Exit { reason, price } => {
            let shares = position.open_shares();
            let trade = position.liquidate(shares, price, date, reason);
            position.status = PositionStatus::Closed;
            StepResult {
                event: Some(EngineEvent::PositionClosed {
                    ticker: position.ticker.clone(),
                    date,
                    reason,
                }),
                trade: Some(trade),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PositionId, Signal};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn position() -> Position {
        let signal = Signal {
            ticker: "NVDA".into(),
            strategy: "rs_ranker".into(),
            date: date(1),
            entry: 100.0,
            stop: 87.0,
            target: None,
            score: 8.0,
        };
        Position::open(PositionId(0), &signal, 153)
    }

    fn outcome(action: DayAction) -> DayOutcome {
        DayOutcome {
            action,
            bars_held: 12,
            highest_close: 140.0,
            trail_breaches: 0,
        }
    }

    #[test]
    fn partial_moves_stop_to_breakeven_and_sets_flag() {
        let mut pos = position();
        let result = apply(
            &mut pos,
            &outcome(DayAction::TakePartial {
                price: 139.0,
                shares: 45,
            }),
            date(18),
        );
        assert_eq!(pos.stop_price, 100.0);
        assert!(pos.partial_taken);
        assert_eq!(pos.status, PositionStatus::Partial);
        assert_eq!(pos.open_shares(), 108);

        let trade = result.trade.unwrap();
        assert_eq!(trade.reason, ExitReason::PartialProfit);
        assert_eq!(trade.shares, 45);
        assert!(matches!(result.event, Some(EngineEvent::PartialTaken { .. })));
    }

    #[test]
    fn pyramid_appends_tranche_without_touching_the_stop() {
        let mut pos = position();
        let result = apply(
            &mut pos,
            &outcome(DayAction::AddPyramid {
                price: 120.0,
                shares: 76,
            }),
            date(20),
        );
        assert_eq!(pos.tranches.len(), 2);
        assert_eq!(pos.pyramid_count, 1);
        assert_eq!(pos.stop_price, 87.0);
        assert_eq!(pos.open_shares(), 229);
        // The R reference stays on the first tranche.
        assert_eq!(pos.entry_price, 100.0);
        assert!(result.trade.is_none());
        assert!(matches!(result.event, Some(EngineEvent::PyramidAdded { .. })));
    }

    #[test]
    fn exit_liquidates_everything_and_closes() {
        let mut pos = position();
        pos.sold = 45;
        pos.partial_taken = true;
        let result = apply(
            &mut pos,
            &outcome(DayAction::Exit {
                reason: ExitReason::Ema21TrailEarly,
                price: 125.0,
            }),
            date(25),
        );
        assert_eq!(pos.status, PositionStatus::Closed);
        assert_eq!(pos.open_shares(), 0);
        let trade = result.trade.unwrap();
        assert_eq!(trade.shares, 108);
        assert_eq!(trade.reason, ExitReason::Ema21TrailEarly);
    }

    #[test]
    fn hold_still_writes_bookkeeping() {
        let mut pos = position();
        let result = apply(&mut pos, &outcome(DayAction::Hold), date(5));
        assert_eq!(pos.bars_held, 12);
        assert_eq!(pos.highest_close, 140.0);
        assert!(result.trade.is_none());
        assert!(result.event.is_none());
    }
}
