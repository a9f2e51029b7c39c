//! Engine events for external notifiers.
//!
//! The engine emits lifecycle events; formatting and delivery belong to
//! whoever subscribes. `VecSink` records events for tests and reports,
//! `NullSink` discards them.

use crate::domain::ExitReason;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle notifications emitted as positions change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    PositionOpened {
        ticker: String,
        strategy: String,
        date: NaiveDate,
        shares: u64,
        entry: f64,
    },
    PartialTaken {
        ticker: String,
        date: NaiveDate,
        shares: u64,
        price: f64,
    },
    PyramidAdded {
        ticker: String,
        date: NaiveDate,
        shares: u64,
        price: f64,
    },
    PositionClosed {
        ticker: String,
        date: NaiveDate,
        reason: ExitReason,
    },
}

/// Subscriber interface for engine events.
pub trait EventSink {
    fn publish(&mut self, event: EngineEvent);
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: EngineEvent) {}
}

/// Records all events in order.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    pub events: Vec<EngineEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for VecSink {
    fn publish(&mut self, event: EngineEvent) {
        self.events.push(event);
    }
}
