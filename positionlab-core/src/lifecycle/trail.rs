//! Trail phase — which trailing-stop regime governs the runner.
//!
//! An explicit two-variant enum rather than branching scattered through the
//! exit evaluator, so the regime selection is testable on its own and the
//! priority chain stays auditable.

use super::rules::ExitRules;
use crate::domain::ExitReason;
use crate::feed::IndicatorRecord;
use serde::{Deserialize, Serialize};

/// Early phase trails the 21-day EMA with a short breach count; the late
/// phase switches to the slower MA100 with more patience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrailPhase {
    Early,
    Late,
}

impl TrailPhase {
    /// Select the phase from elapsed holding time.
    pub fn for_bars_held(bars_held: u32, rules: &ExitRules) -> Self {
        if bars_held <= rules.trail_early_window {
            TrailPhase::Early
        } else {
            TrailPhase::Late
        }
    }

    /// The reference line the close is compared against.
    pub fn reference(&self, record: &IndicatorRecord) -> f64 {
        match self {
            TrailPhase::Early => record.ema21,
            TrailPhase::Late => record.ma100,
        }
    }

    /// Consecutive closes below the reference required to exit.
    pub fn required_closes(&self, rules: &ExitRules) -> u32 {
        match self {
            TrailPhase::Early => rules.trail_early_closes,
            TrailPhase::Late => rules.trail_late_closes,
        }
    }

    pub fn exit_reason(&self) -> ExitReason {
        match self {
            TrailPhase::Early => ExitReason::Ema21TrailEarly,
            TrailPhase::Late => ExitReason::Ma100TrailLate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(ema21: f64, ma100: f64) -> IndicatorRecord {
        IndicatorRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: 100.0,
            low: None,
            atr: 2.0,
            ema21,
            ma50: 100.0,
            ma100,
            ma200: 100.0,
            rsi14: 55.0,
            adx14: 30.0,
        }
    }

    #[test]
    fn phase_switches_after_early_window() {
        let rules = ExitRules::default();
        assert_eq!(TrailPhase::for_bars_held(1, &rules), TrailPhase::Early);
        assert_eq!(TrailPhase::for_bars_held(60, &rules), TrailPhase::Early);
        assert_eq!(TrailPhase::for_bars_held(61, &rules), TrailPhase::Late);
    }

    #[test]
    fn early_phase_uses_ema21() {
        let rules = ExitRules::default();
        let rec = record(98.0, 95.0);
        assert_eq!(TrailPhase::Early.reference(&rec), 98.0);
        assert_eq!(TrailPhase::Early.required_closes(&rules), 5);
        assert_eq!(TrailPhase::Early.exit_reason(), ExitReason::Ema21TrailEarly);
    }

    #[test]
    fn late_phase_uses_ma100() {
        let rules = ExitRules::default();
        let rec = record(98.0, 95.0);
        assert_eq!(TrailPhase::Late.reference(&rec), 95.0);
        assert_eq!(TrailPhase::Late.required_closes(&rules), 8);
        assert_eq!(TrailPhase::Late.exit_reason(), ExitReason::Ma100TrailLate);
    }
}
