//! Signal source trait and the in-memory implementation.
//!
//! Strategy scanners live outside the engine: each one is a black box that
//! produces candidate entries per scan date. The engine assumes no ordering
//! from the source; the portfolio manager re-sorts by score.

use crate::domain::Signal;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Supplies the day's candidate entries.
pub trait SignalSource {
    fn get_signals(&self, date: NaiveDate) -> Vec<Signal>;
}

/// In-memory source keyed by scan date.
#[derive(Debug, Clone, Default)]
pub struct MemorySignalSource {
    by_date: BTreeMap<NaiveDate, Vec<Signal>>,
}

impl MemorySignalSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, signal: Signal) {
        self.by_date.entry(signal.date).or_default().push(signal);
    }

    pub fn extend(&mut self, signals: impl IntoIterator<Item = Signal>) {
        for signal in signals {
            self.push(signal);
        }
    }
}

impl SignalSource for MemorySignalSource {
    fn get_signals(&self, date: NaiveDate) -> Vec<Signal> {
        self.by_date.get(&date).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(ticker: &str, day: u32) -> Signal {
        Signal {
            ticker: ticker.into(),
            strategy: "rs_ranker".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            entry: 100.0,
            stop: 90.0,
            target: None,
            score: 7.0,
        }
    }

    #[test]
    fn signals_grouped_by_date() {
        let mut source = MemorySignalSource::new();
        source.push(sig("AAPL", 3));
        source.push(sig("MSFT", 3));
        source.push(sig("NVDA", 4));

        assert_eq!(source.get_signals(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()).len(), 2);
        assert_eq!(source.get_signals(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()).len(), 1);
        assert!(source.get_signals(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()).is_empty());
    }
}
