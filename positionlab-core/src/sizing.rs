//! Position sizing under the fixed-fractional-risk rule.
//!
//! Initial entries risk a fixed fraction of current equity against the
//! signal's per-share risk. Pyramid adds deliberately skip the risk
//! calculation: they take a fraction of the *original* tranche's share count,
//! which keeps aggregate risk bounded as later tranches fill at higher
//! prices.

use crate::domain::{Account, Signal};
use crate::error::SignalError;

/// Share count for a fresh entry: `floor(equity * risk_fraction / (entry - stop))`.
///
/// Fails with `InvalidSignal` when the per-share risk is non-positive and
/// with `ZeroSize` when the budget rounds below one share. Zero-size signals
/// are dropped, never retried.
pub fn size_entry(account: &Account, signal: &Signal) -> Result<u64, SignalError> {
    let per_share_risk = signal.risk_per_share();
    if per_share_risk <= 0.0 {
        return Err(SignalError::InvalidSignal {
            ticker: signal.ticker.clone(),
            detail: format!(
                "per-share risk must be positive (entry {}, stop {})",
                signal.entry, signal.stop
            ),
        });
    }

    let risk_amount = account.risk_amount();
    let shares = (risk_amount / per_share_risk).floor();
    if shares < 1.0 {
        return Err(SignalError::ZeroSize {
            ticker: signal.ticker.clone(),
            risk_amount,
            per_share_risk,
        });
    }
    Ok(shares as u64)
}

/// Share count for a pyramid add: a fraction of the first tranche's shares.
/// Returns 0 when the fraction rounds below one share (the add is skipped).
pub fn size_pyramid(first_tranche_shares: u64, fraction: f64) -> u64 {
    (first_tranche_shares as f64 * fraction).floor() as u64
}
