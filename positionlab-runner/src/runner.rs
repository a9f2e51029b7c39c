//! Run a configured backtest end to end: simulate, aggregate, package.

use crate::config::BacktestConfig;
use crate::metrics::PerformanceSummary;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use positionlab_core::domain::ClosedTrade;
use positionlab_core::engine::run_walkforward;
use positionlab_core::events::NullSink;
use positionlab_core::feed::IndicatorFeed;
use positionlab_core::signals::SignalSource;
use serde::{Deserialize, Serialize};

/// Version stamp for persisted result artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// A finished run: config, metrics, and the raw outputs they were computed
/// from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub schema_version: u32,
    pub run_id: String,
    pub config: BacktestConfig,
    pub metrics: PerformanceSummary,
    pub trades: Vec<ClosedTrade>,
    pub days: Vec<NaiveDate>,
    pub equity_curve: Vec<f64>,
    pub warnings: Vec<String>,
    pub final_equity: f64,
}

/// Execute one backtest against injected collaborators.
pub fn run_backtest<F, S>(
    config: &BacktestConfig,
    feed: &F,
    signals: &S,
) -> Result<BacktestResult>
where
    F: IndicatorFeed + Sync,
    S: SignalSource,
{
    let sim_config = config.to_sim_config();
    let result = run_walkforward(feed, signals, &sim_config, &mut NullSink)
        .context("walk-forward simulation failed")?;

    let metrics =
        PerformanceSummary::compute(&result.trades, &result.equity_curve, config.initial_capital);

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        config: config.clone(),
        metrics,
        trades: result.trades,
        days: result.days,
        equity_curve: result.equity_curve,
        warnings: result.warnings,
        final_equity: result.final_equity,
    })
}
