//! Indicator feed trait and the in-memory implementation.
//!
//! The feed abstracts over wherever price history and indicator values come
//! from (a cache, a vendor API, test fixtures) so the engine can be driven
//! without any I/O. All series are pre-computed; the engine never calculates
//! an indicator itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One trading day of close price and pre-computed indicator values for a
/// single ticker.
///
/// `low` is optional: it only participates when the stop policy is configured
/// to check intraday lows, and feeds that carry close-only data leave it
/// unset. Missing dates are gaps in the series, never zero-filled records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub low: Option<f64>,
    pub atr: f64,
    pub ema21: f64,
    pub ma50: f64,
    pub ma100: f64,
    pub ma200: f64,
    pub rsi14: f64,
    pub adx14: f64,
}

/// Read-only time series keyed by (ticker, date).
///
/// Implementations must return records sorted ascending by date.
pub trait IndicatorFeed {
    /// Tickers the feed knows about, sorted ascending.
    fn tickers(&self) -> Vec<String>;

    /// All records for `ticker` in `[start, end]`, ascending by date.
    fn get_series(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<IndicatorRecord>;

    /// The record for one ticker-day, if the ticker traded that day.
    fn record(&self, ticker: &str, date: NaiveDate) -> Option<IndicatorRecord> {
        self.get_series(ticker, date, date).into_iter().next()
    }

    /// The most recent record at or before `date`. Used to value positions
    /// at the simulation horizon.
    fn last_record(&self, ticker: &str, date: NaiveDate) -> Option<IndicatorRecord> {
        self.get_series(ticker, NaiveDate::MIN, date).into_iter().next_back()
    }

    /// Union of all tickers' trading days in `[start, end]`, ascending.
    /// This is the simulator's calendar.
    fn trading_days(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = BTreeSet::new();
        for ticker in self.tickers() {
            for rec in self.get_series(&ticker, start, end) {
                days.insert(rec.date);
            }
        }
        days.into_iter().collect()
    }
}

/// In-memory feed backed by per-ticker date-ordered maps. Used by the runner
/// and by every test; deterministic iteration comes free with the BTreeMaps.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    series: BTreeMap<String, BTreeMap<NaiveDate, IndicatorRecord>>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one record, replacing any existing record for that ticker-day.
    pub fn insert(&mut self, ticker: &str, record: IndicatorRecord) {
        self.series
            .entry(ticker.to_string())
            .or_default()
            .insert(record.date, record);
    }

    pub fn insert_series(&mut self, ticker: &str, records: Vec<IndicatorRecord>) {
        for record in records {
            self.insert(ticker, record);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl IndicatorFeed for MemoryFeed {
    fn tickers(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }

    fn get_series(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<IndicatorRecord> {
        match self.series.get(ticker) {
            Some(by_date) => by_date.range(start..=end).map(|(_, r)| r.clone()).collect(),
            None => Vec::new(),
        }
    }

    fn record(&self, ticker: &str, date: NaiveDate) -> Option<IndicatorRecord> {
        self.series.get(ticker)?.get(&date).cloned()
    }

    fn last_record(&self, ticker: &str, date: NaiveDate) -> Option<IndicatorRecord> {
        self.series
            .get(ticker)?
            .range(..=date)
            .next_back()
            .map(|(_, r)| r.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn flat_record(day: NaiveDate, close: f64) -> IndicatorRecord {
        IndicatorRecord {
            date: day,
            close,
            low: None,
            atr: 2.0,
            ema21: close,
            ma50: close,
            ma100: close,
            ma200: close,
            rsi14: 55.0,
            adx14: 30.0,
        }
    }

    #[test]
    fn series_are_date_ordered() {
        let mut feed = MemoryFeed::new();
        feed.insert("SPY", flat_record(date(5), 102.0));
        feed.insert("SPY", flat_record(date(3), 101.0));
        let series = feed.get_series("SPY", date(1), date(31));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date(3));
        assert_eq!(series[1].date, date(5));
    }

    #[test]
    fn record_misses_are_gaps() {
        let mut feed = MemoryFeed::new();
        feed.insert("SPY", flat_record(date(3), 101.0));
        assert!(feed.record("SPY", date(4)).is_none());
        assert!(feed.record("QQQ", date(3)).is_none());
    }

    #[test]
    fn last_record_walks_back() {
        let mut feed = MemoryFeed::new();
        feed.insert("SPY", flat_record(date(3), 101.0));
        feed.insert("SPY", flat_record(date(8), 103.0));
        let last = feed.last_record("SPY", date(6)).unwrap();
        assert_eq!(last.date, date(3));
    }

    #[test]
    fn trading_days_union_across_tickers() {
        let mut feed = MemoryFeed::new();
        feed.insert("SPY", flat_record(date(3), 101.0));
        feed.insert("QQQ", flat_record(date(4), 300.0));
        feed.insert("QQQ", flat_record(date(3), 299.0));
        assert_eq!(feed.trading_days(date(1), date(31)), vec![date(3), date(4)]);
        assert_eq!(feed.trading_days(date(4), date(31)), vec![date(4)]);
    }
}
