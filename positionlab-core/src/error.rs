//! Structured error types for signal intake, admission, and simulation.
//!
//! None of these abort the simulation of other positions or signals: signal
//! and admission errors drop exactly one candidate, and the only fatal error
//! is a malformed date range handed to the simulator before any work starts.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that drop a single candidate signal.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SignalError {
    #[error("invalid signal for {ticker}: {detail}")]
    InvalidSignal { ticker: String, detail: String },

    #[error("signal for {ticker} sizes to zero shares (risk budget {risk_amount:.2}, per-share risk {per_share_risk:.2})")]
    ZeroSize {
        ticker: String,
        risk_amount: f64,
        per_share_risk: f64,
    },
}

/// Admission rejections from the portfolio manager. Non-fatal: the signal is
/// simply not filled.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdmitError {
    #[error("duplicate position for {0}")]
    DuplicatePosition(String),

    #[error("strategy cap reached for {strategy} (cap {cap})")]
    StrategyCapReached { strategy: String, cap: usize },

    #[error("global position cap reached (cap {0})")]
    GlobalCapReached(usize),

    #[error(transparent)]
    Signal(#[from] SignalError),
}

/// Fatal simulator start-up errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimError {
    #[error("invalid date range: end {end} precedes start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}
