//! Reporting and export — JSON, CSV, and plain-text artifact generation.
//!
//! Three export surfaces for a finished run:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: trade tape and equity curve for external analysis tools
//! - **Text**: the human-readable summary tables
//!
//! Persisted JSON includes a `schema_version` field; unknown versions are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use positionlab_core::domain::ClosedTrade;

use crate::runner::{BacktestResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the trade tape as CSV.
///
/// Columns: position_id, ticker, strategy, shares, entry_price, exit_price,
/// exit_date, reason, pnl, r_multiple, bars_held
pub fn export_trades_csv(trades: &[ClosedTrade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "position_id",
        "ticker",
        "strategy",
        "shares",
        "entry_price",
        "exit_price",
        "exit_date",
        "reason",
        "pnl",
        "r_multiple",
        "bars_held",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.position_id.to_string(),
            &t.ticker,
            &t.strategy,
            &t.shares.to_string(),
            &format!("{:.4}", t.entry_price),
            &format!("{:.4}", t.exit_price),
            &t.exit_date.to_string(),
            &t.reason.to_string(),
            &format!("{:.2}", t.pnl),
            &format!("{:.2}", t.r_multiple),
            &t.bars_held.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the realized equity curve as CSV with date and equity columns.
pub fn export_equity_csv(result: &BacktestResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "equity"])?;
    for (day, equity) in result.days.iter().zip(&result.equity_curve) {
        wtr.write_record([&day.to_string(), &format!("{equity:.2}")])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Text summary ───────────────────────────────────────────────────

/// Render the run's summary tables: overall performance, then per-strategy
/// and per-exit-reason breakdowns.
pub fn render_summary(result: &BacktestResult) -> String {
    let m = &result.metrics;
    let mut out = String::new();

    out.push_str(&format!("run {}\n", &result.run_id[..12.min(result.run_id.len())]));
    out.push_str(&format!(
        "{} to {}\n\n",
        result.config.start_date, result.config.end_date
    ));

    out.push_str("Overall\n");
    out.push_str(&format!("  positions closed   {}\n", m.position_count));
    out.push_str(&format!("  trade records      {}\n", m.trade_count));
    out.push_str(&format!("  win rate           {:.1}%\n", m.win_rate * 100.0));
    out.push_str(&format!("  avg R              {:.2}\n", m.avg_r));
    out.push_str(&format!("  profit factor      {:.2}\n", m.profit_factor));
    out.push_str(&format!("  total P&L          {:.2}\n", m.total_pnl));
    out.push_str(&format!("  total return       {:.2}%\n", m.total_return * 100.0));
    out.push_str(&format!("  max drawdown       {:.2}%\n", m.max_drawdown * 100.0));
    out.push_str(&format!("  avg days held      {:.1}\n", m.avg_bars_held));
    out.push_str(&format!("  final equity       {:.2}\n", result.final_equity));

    out.push_str("\nBy strategy\n");
    out.push_str(&format!(
        "  {:<32} {:>6} {:>8} {:>14}\n",
        "strategy", "count", "avg R", "total P&L"
    ));
    for (strategy, row) in &m.by_strategy {
        out.push_str(&format!(
            "  {:<32} {:>6} {:>8.2} {:>14.2}\n",
            strategy, row.count, row.avg_r, row.total_pnl
        ));
    }

    out.push_str("\nBy exit reason\n");
    out.push_str(&format!(
        "  {:<20} {:>6} {:>8} {:>14}\n",
        "reason", "count", "avg R", "total P&L"
    ));
    for (reason, row) in &m.by_exit_reason {
        out.push_str(&format!(
            "  {:<20} {:>6} {:>8.2} {:>14.2}\n",
            reason, row.count, row.avg_r, row.total_pnl
        ));
    }

    if !m.by_year.is_empty() {
        out.push_str("\nBy year\n");
        out.push_str(&format!(
            "  {:<6} {:>6} {:>8} {:>14}\n",
            "year", "count", "avg R", "total P&L"
        ));
        for (year, row) in &m.by_year {
            out.push_str(&format!(
                "  {:<6} {:>6} {:>8.2} {:>14.2}\n",
                year, row.count, row.avg_r, row.total_pnl
            ));
        }
    }

    if !result.warnings.is_empty() {
        out.push_str(&format!("\n{} warning(s) during the run\n", result.warnings.len()));
    }

    out
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one run.
///
/// Creates `{output_dir}/{run_id_prefix}/` containing:
/// - `manifest.json` — the full `BacktestResult`
/// - `trades.csv` — the trade tape
/// - `equity.csv` — the realized equity curve
/// - `summary.txt` — the rendered summary tables
///
/// Returns the created directory path.
pub fn save_artifacts(output_dir: &Path, result: &BacktestResult) -> Result<PathBuf> {
    let prefix = &result.run_id[..12.min(result.run_id.len())];
    let dir = output_dir.join(prefix);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create artifact dir {}", dir.display()))?;

    std::fs::write(dir.join("manifest.json"), export_json(result)?)
        .context("failed to write manifest.json")?;
    std::fs::write(dir.join("trades.csv"), export_trades_csv(&result.trades)?)
        .context("failed to write trades.csv")?;
    std::fs::write(dir.join("equity.csv"), export_equity_csv(result)?)
        .context("failed to write equity.csv")?;
    std::fs::write(dir.join("summary.txt"), render_summary(result))
        .context("failed to write summary.txt")?;

    Ok(dir)
}
