//! Serializable backtest configuration.
//!
//! Captures every parameter needed to reproduce a run. The blake3 hash of
//! the serialized config is the run id: two runs with identical configs get
//! identical ids and can share cached artifacts.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use positionlab_core::engine::SimConfig;
use positionlab_core::lifecycle::ExitRules;
use positionlab_core::portfolio::PortfolioCaps;
use serde::{Deserialize, Serialize};

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Configuration for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    /// Backtest start date (inclusive)
    pub start_date: NaiveDate,

    /// Backtest end date (inclusive)
    pub end_date: NaiveDate,

    /// Initial capital
    #[serde(default = "default_capital")]
    pub initial_capital: f64,

    /// Fraction of equity risked per trade
    #[serde(default = "default_risk")]
    pub risk_per_trade: f64,

    /// Global and per-strategy concurrency caps
    #[serde(default)]
    pub caps: PortfolioCaps,

    /// Lifecycle exit-rule parameters
    #[serde(default)]
    pub rules: ExitRules,
}

fn default_capital() -> f64 {
    100_000.0
}

fn default_risk() -> f64 {
    0.02
}

impl BacktestConfig {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            initial_capital: default_capital(),
            risk_per_trade: default_risk(),
            caps: PortfolioCaps::default(),
            rules: ExitRules::default(),
        }
    }

    /// Computes a deterministic hash id for this configuration.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Parse a config from TOML text. Omitted fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse backtest config TOML")
    }

    pub fn to_sim_config(&self) -> SimConfig {
        SimConfig {
            start: self.start_date,
            end: self.end_date,
            initial_capital: self.initial_capital,
            risk_per_trade: self.risk_per_trade,
            caps: self.caps.clone(),
            rules: self.rules.clone(),
        }
    }
}
