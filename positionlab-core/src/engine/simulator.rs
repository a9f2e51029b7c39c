//! The daily walk-forward driver.
//!
//! Per trading day, in order:
//! 1. Update every open position through the lifecycle state machine, in
//!    ticker order. Decisions are computed in parallel against the read-only
//!    feed, then applied sequentially, so exits free slots deterministically
//!    before entries.
//! 2. Pull the day's candidate signals.
//! 3. Admit candidates in score-descending order until slots run out.
//! 4. Append the day's trade records and settle realized P&L — entry sizing
//!    therefore uses start-of-day equity.
//!
//! The portfolio manager and account are injected so independent backtests
//! can run side by side in one process, and so a persisted snapshot can be
//! restored before resuming.

use super::{RunResult, SimConfig};
use crate::domain::{Account, ExitReason, PositionStatus};
use crate::error::{AdmitError, SimError};
use crate::events::{EngineEvent, EventSink};
use crate::feed::IndicatorFeed;
use crate::lifecycle::{apply, decide, DayOutcome};
use crate::portfolio::{sort_for_admission, PortfolioManager};
use crate::signals::SignalSource;
use rayon::prelude::*;

/// Run a full walk-forward simulation with fresh portfolio state.
pub fn run_walkforward<F, S>(
    feed: &F,
    signals: &S,
    config: &SimConfig,
    sink: &mut dyn EventSink,
) -> Result<RunResult, SimError>
where
    F: IndicatorFeed + Sync,
    S: SignalSource,
{
    config.validate()?;
    let mut portfolio = PortfolioManager::new(config.caps.clone());
    let mut account = Account::new(config.initial_capital, config.risk_per_trade);
    run_with_state(feed, signals, config, &mut portfolio, &mut account, sink)
}

/// Run against injected portfolio state, e.g. restored from a snapshot.
pub fn run_with_state<F, S>(
    feed: &F,
    signals: &S,
    config: &SimConfig,
    portfolio: &mut PortfolioManager,
    account: &mut Account,
    sink: &mut dyn EventSink,
) -> Result<RunResult, SimError>
where
    F: IndicatorFeed + Sync,
    S: SignalSource,
{
    config.validate()?;

    let days = feed.trading_days(config.start, config.end);
    let mut trades = Vec::new();
    let mut events = Vec::new();
    let mut warnings = Vec::new();
    let mut equity_curve = Vec::with_capacity(days.len());

    for (i, &day) in days.iter().enumerate() {
        let mut day_trades = Vec::new();

        // ─── Phase 1: update open positions ───
        let tickers = portfolio.tickers();
        let decisions: Vec<Option<DayOutcome>> = {
            let pm = &*portfolio;
            tickers
                .par_iter()
                .map(|ticker| {
                    let position = pm.get(ticker)?;
                    let record = feed.record(ticker, day)?;
                    Some(decide(position, &record, &config.rules))
                })
                .collect()
        };

        for (ticker, decision) in tickers.iter().zip(decisions) {
            let Some(outcome) = decision else {
                warnings.push(format!("{day}: no data for {ticker}; position carried unchanged"));
                continue;
            };
            if let Some(position) = portfolio.get_mut(ticker) {
                let step = apply(position, &outcome, day);
                let closed = position.status == PositionStatus::Closed;
                if let Some(trade) = step.trade {
                    day_trades.push(trade);
                }
                if let Some(event) = step.event {
                    sink.publish(event.clone());
                    events.push(event);
                }
                if closed {
                    portfolio.release(ticker);
                }
            }
        }

        // ─── Phases 2 + 3: pull and admit signals ───
        let mut candidates = signals.get_signals(day);
        sort_for_admission(&mut candidates);
        for signal in &candidates {
            if let Err(err) = signal.validate() {
                warnings.push(format!("{day}: dropped signal: {err}"));
                continue;
            }
            if feed.record(&signal.ticker, day).is_none() {
                warnings.push(format!(
                    "{day}: no data for {}; signal skipped",
                    signal.ticker
                ));
                continue;
            }
            match portfolio.admit(signal, account) {
                Ok(position) => {
                    let event = EngineEvent::PositionOpened {
                        ticker: position.ticker.clone(),
                        strategy: position.strategy.clone(),
                        date: day,
                        shares: position.total_shares(),
                        entry: position.entry_price,
                    };
                    sink.publish(event.clone());
                    events.push(event);
                }
                Err(AdmitError::Signal(err)) => {
                    warnings.push(format!("{day}: dropped signal: {err}"));
                }
                // Caps and duplicates are normal arbitration, not errors:
                // the signal is simply not filled.
                Err(_) => {}
            }
        }

        // ─── End of history: force-close survivors at the last close ───
        // A simulation-boundary artifact, so the pyramid exemption does not
        // apply here.
        if i + 1 == days.len() {
            for ticker in portfolio.tickers() {
                let Some(mut position) = portfolio.release(&ticker) else {
                    continue;
                };
                let shares = position.open_shares();
                let price = match feed.last_record(&ticker, day) {
                    Some(record) => record.close,
                    None => {
                        warnings.push(format!(
                            "{day}: no close available for {ticker}; closed at cost basis"
                        ));
                        position.draw_basis(shares)
                    }
                };
                let trade = position.liquidate(shares, price, day, ExitReason::EndOfBacktest);
                let event = EngineEvent::PositionClosed {
                    ticker: ticker.clone(),
                    date: day,
                    reason: ExitReason::EndOfBacktest,
                };
                sink.publish(event.clone());
                events.push(event);
                day_trades.push(trade);
            }
        }

        // ─── Phase 4: settle the day ───
        for trade in &day_trades {
            account.apply(trade);
        }
        trades.extend(day_trades);
        equity_curve.push(account.equity);
    }

    Ok(RunResult {
        trades,
        days,
        equity_curve,
        events,
        warnings,
        final_equity: account.equity,
    })
}
