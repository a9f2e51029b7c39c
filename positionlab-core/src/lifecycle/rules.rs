//! Exit-rule parameters for the position lifecycle state machine.

use serde::{Deserialize, Serialize};

/// Which price the stop-loss check compares against the stop level.
///
/// `Close` is the default: with daily decisions it keeps the run fully
/// deterministic with respect to the indicator feed. `Low` is the more
/// pessimistic intraday check; it uses the record's low when the feed carries
/// one and falls back to the close otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopTrigger {
    Close,
    Low,
}

/// Every tunable of the daily exit chain.
///
/// Defaults mirror the long-horizon position-trading profile: 30% off at
/// +3R, EMA21 trail for the first 60 days then MA100, a 150-day time stop,
/// and up to three half-size pyramid adds on pullbacks to EMA21.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExitRules {
    pub stop_trigger: StopTrigger,

    /// R-multiple on the first tranche that arms the one-time partial exit.
    pub partial_trigger_r: f64,
    /// Fraction of open shares liquidated by the partial exit.
    pub partial_fraction: f64,

    /// Bars held at or below which the early trail phase applies.
    pub trail_early_window: u32,
    /// Consecutive closes below EMA21 required to exit in the early phase.
    pub trail_early_closes: u32,
    /// Consecutive closes below MA100 required to exit in the late phase.
    pub trail_late_closes: u32,

    /// Holding period after which non-pyramided positions are closed.
    pub max_hold_days: u32,

    /// R-multiple on the first tranche that arms a pyramid add.
    pub pyramid_trigger_r: f64,
    /// Add size as a fraction of the first tranche's share count.
    pub pyramid_fraction: f64,
    pub pyramid_max_adds: u32,
    /// The close must sit within this many ATRs of EMA21 for an add.
    pub pyramid_band_atr: f64,
}

impl Default for ExitRules {
    fn default() -> Self {
        Self {
            stop_trigger: StopTrigger::Close,
            partial_trigger_r: 3.0,
            partial_fraction: 0.3,
            trail_early_window: 60,
            trail_early_closes: 5,
            trail_late_closes: 8,
            max_hold_days: 150,
            pyramid_trigger_r: 1.5,
            pyramid_fraction: 0.5,
            pyramid_max_adds: 3,
            pyramid_band_atr: 1.0,
        }
    }
}
