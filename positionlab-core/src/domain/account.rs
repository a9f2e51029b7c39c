//! Account — realized-equity ledger used for position sizing.

use super::trade::ClosedTrade;
use serde::{Deserialize, Serialize};

/// Sizing base for new trades.
///
/// Equity moves only on realized P&L from closed-trade records; open
/// positions' unrealized swings never change the size of the next entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub equity: f64,
    pub initial_capital: f64,
    /// Fraction of equity risked per trade (e.g. 0.02 for 2%).
    pub risk_per_trade: f64,
}

impl Account {
    pub fn new(initial_capital: f64, risk_per_trade: f64) -> Self {
        Self {
            equity: initial_capital,
            initial_capital,
            risk_per_trade,
        }
    }

    /// Dollar risk budget for one new trade at current equity.
    pub fn risk_amount(&self) -> f64 {
        self.equity * self.risk_per_trade
    }

    pub fn apply(&mut self, trade: &ClosedTrade) {
        self.equity += trade.pnl;
    }
}
