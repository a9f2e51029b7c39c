//! The daily exit evaluator — one pure decision per open position per day.
//!
//! Priority order, first match wins:
//! 1. Stop-loss
//! 2. Partial profit (fires at most once per position)
//! 3. Trailing stop (hybrid EMA21/MA100 regime)
//! 4. Time stop (pyramided positions are permanently exempt)
//! 5. Pyramid add (only when nothing above fired)
//!
//! `decide` never mutates: it returns the action plus the day's carried
//! bookkeeping (bars held, highest close, breach counter), which `apply`
//! writes back. That split is what makes the chain testable in isolation and
//! lets the simulator evaluate positions in parallel before a deterministic
//! sequential apply.

use super::rules::{ExitRules, StopTrigger};
use super::trail::TrailPhase;
use crate::domain::{ExitReason, Position};
use crate::feed::IndicatorRecord;
use crate::sizing::size_pyramid;

/// What the position does today. Prices are pinned at decision time: stop
/// exits fill at the stop level, everything else at the day's close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayAction {
    Exit { reason: ExitReason, price: f64 },
    TakePartial { price: f64, shares: u64 },
    AddPyramid { price: f64, shares: u64 },
    Hold,
}

/// The action plus the per-day bookkeeping that must be written back even
/// when the position merely holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayOutcome {
    pub action: DayAction,
    pub bars_held: u32,
    pub highest_close: f64,
    pub trail_breaches: u32,
}

/// Evaluate one open position against one day's record.
pub fn decide(position: &Position, record: &IndicatorRecord, rules: &ExitRules) -> DayOutcome {
    debug_assert!(position.is_open());
    debug_assert!(position.open_shares() > 0);

    let close = record.close;
    let bars_held = position.bars_held + 1;
    let highest_close = position.highest_close.max(close);

    // The breach counter is bookkeeping derived from the close, so it updates
    // on every evaluated day regardless of which action fires.
    let phase = TrailPhase::for_bars_held(bars_held, rules);
    let reference = phase.reference(record);
    let trail_breaches = if close < reference {
        position.trail_breaches + 1
    } else {
        0
    };

    let outcome = |action: DayAction| DayOutcome {
        action,
        bars_held,
        highest_close,
        trail_breaches,
    };

    // 1. Stop-loss: liquidate everything at the stop level.
    let stop_check = match rules.stop_trigger {
        StopTrigger::Close => close,
        StopTrigger::Low => record.low.unwrap_or(close),
    };
    if stop_check <= position.stop_price {
        return outcome(DayAction::Exit {
            reason: ExitReason::StopLoss,
            price: position.stop_price,
        });
    }

    let profit = close - position.entry_price;

    // 2. Partial profit: once per position, measured on the first tranche.
    if !position.partial_taken && profit >= rules.partial_trigger_r * position.risk_per_share {
        let shares = (position.open_shares() as f64 * rules.partial_fraction).floor() as u64;
        if shares >= 1 {
            return outcome(DayAction::TakePartial { price: close, shares });
        }
    }

    // 3. Trailing stop: the required count belongs to the phase active today.
    if trail_breaches >= phase.required_closes(rules) {
        return outcome(DayAction::Exit {
            reason: phase.exit_reason(),
            price: close,
        });
    }

    // 4. Time stop: a position that has earned a pyramid add is exempt for
    // its entire remaining life and is managed by the trail alone.
    if bars_held >= rules.max_hold_days && position.pyramid_count == 0 {
        return outcome(DayAction::Exit {
            reason: ExitReason::TimeStop {
                max_days: rules.max_hold_days,
            },
            price: close,
        });
    }

    // 5. Pyramid add: profitable enough and pulled back near EMA21.
    if position.pyramid_count < rules.pyramid_max_adds
        && profit >= rules.pyramid_trigger_r * position.risk_per_share
        && (close - record.ema21).abs() <= rules.pyramid_band_atr * record.atr
    {
        let shares = size_pyramid(position.tranches[0].shares, rules.pyramid_fraction);
        if shares >= 1 {
            return outcome(DayAction::AddPyramid { price: close, shares });
        }
    }

    outcome(DayAction::Hold)
}
