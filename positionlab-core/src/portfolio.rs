//! Portfolio manager — slot arbitration and exclusive ownership of open
//! positions.
//!
//! One open position per ticker, a global concurrency cap, and per-strategy
//! caps. Competing same-day signals are admitted in descending score order
//! with ticker order breaking ties, so runs are reproducible byte for byte.

use crate::domain::{Account, IdGen, Position, Signal};
use crate::error::AdmitError;
use crate::sizing::size_entry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Concurrency limits enforced at admission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioCaps {
    /// Maximum open positions across all strategies.
    pub max_total: usize,
    /// Per-strategy overrides; strategies not listed use the default.
    pub max_per_strategy: BTreeMap<String, usize>,
    pub default_per_strategy: usize,
}

impl Default for PortfolioCaps {
    fn default() -> Self {
        Self {
            max_total: 20,
            max_per_strategy: BTreeMap::new(),
            default_per_strategy: 5,
        }
    }
}

impl PortfolioCaps {
    pub fn strategy_cap(&self, strategy: &str) -> usize {
        self.max_per_strategy
            .get(strategy)
            .copied()
            .unwrap_or(self.default_per_strategy)
    }
}

/// Owns the ticker -> position mapping; everything else borrows it.
#[derive(Debug, Clone)]
pub struct PortfolioManager {
    positions: BTreeMap<String, Position>,
    caps: PortfolioCaps,
    id_gen: IdGen,
}

impl PortfolioManager {
    pub fn new(caps: PortfolioCaps) -> Self {
        Self {
            positions: BTreeMap::new(),
            caps,
            id_gen: IdGen::default(),
        }
    }

    pub fn open_count(&self) -> usize {
        self.positions.len()
    }

    pub fn strategy_count(&self, strategy: &str) -> usize {
        self.positions
            .values()
            .filter(|p| p.strategy == strategy)
            .count()
    }

    pub fn has_position(&self, ticker: &str) -> bool {
        self.positions.contains_key(ticker)
    }

    pub fn get(&self, ticker: &str) -> Option<&Position> {
        self.positions.get(ticker)
    }

    pub fn get_mut(&mut self, ticker: &str) -> Option<&mut Position> {
        self.positions.get_mut(ticker)
    }

    /// Open tickers in lexical order — the stable update order for the
    /// daily loop.
    pub fn tickers(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    pub fn caps(&self) -> &PortfolioCaps {
        &self.caps
    }

    /// Admit one signal: enforce caps, size the entry, open the position.
    pub fn admit(&mut self, signal: &Signal, account: &Account) -> Result<&Position, AdmitError> {
        if self.has_position(&signal.ticker) {
            return Err(AdmitError::DuplicatePosition(signal.ticker.clone()));
        }
        let strategy_cap = self.caps.strategy_cap(&signal.strategy);
        if self.strategy_count(&signal.strategy) >= strategy_cap {
            return Err(AdmitError::StrategyCapReached {
                strategy: signal.strategy.clone(),
                cap: strategy_cap,
            });
        }
        if self.open_count() >= self.caps.max_total {
            return Err(AdmitError::GlobalCapReached(self.caps.max_total));
        }

        let shares = size_entry(account, signal)?;
        let position = Position::open(self.id_gen.next_position_id(), signal, shares);
        Ok(self
            .positions
            .entry(signal.ticker.clone())
            .or_insert(position))
    }

    /// Free a ticker's slot once its position has closed.
    pub fn release(&mut self, ticker: &str) -> Option<Position> {
        self.positions.remove(ticker)
    }

    /// Serializable view of all open positions for the external store.
    pub fn snapshot(&self) -> Vec<Position> {
        self.positions.values().cloned().collect()
    }

    /// Resume from a previously persisted snapshot. Counts and the id
    /// counter are rebuilt from the positions themselves.
    pub fn restore(&mut self, snapshot: Vec<Position>) {
        self.positions.clear();
        for position in snapshot {
            self.id_gen.bump_past(position.id);
            self.positions.insert(position.ticker.clone(), position);
        }
    }
}

/// Admission order for same-day competition: score descending, ticker
/// ascending on ties.
pub fn sort_for_admission(signals: &mut [Signal]) {
    signals.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
}
