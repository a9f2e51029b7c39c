//! Tranche — one discrete purchase within a position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An ownership slice created at a single instant: the initial entry or one
/// pyramid add.
///
/// Tranches are the acquisition record and are never mutated after creation;
/// liquidations advance the position's oldest-first cursor instead. This is
/// what lets the weighted cost basis be re-derived exactly at any point, with
/// no drift from repeated adds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tranche {
    pub shares: u64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
}

impl Tranche {
    pub fn new(shares: u64, entry_price: f64, entry_date: NaiveDate) -> Self {
        Self {
            shares,
            entry_price,
            entry_date,
        }
    }

    pub fn notional(&self) -> f64 {
        self.shares as f64 * self.entry_price
    }
}
