//! PositionLab Core — position lifecycle engine for daily trend-following
//! simulation.
//!
//! This crate contains the heart of the system:
//! - Domain types (signals, tranches, positions, closed trades, account)
//! - Fixed-fractional-risk position sizing with the pyramid-add rule
//! - The daily exit priority chain (stop, partial, hybrid trail, time stop,
//!   pyramid) as a pure decision plus a mutating apply
//! - Portfolio manager with global and per-strategy caps and deterministic
//!   same-day signal arbitration
//! - Walk-forward simulator driving the whole system one trading day at a
//!   time
//! - External-collaborator traits: indicator feed, signal source, event sink

pub mod domain;
pub mod engine;
pub mod error;
pub mod events;
pub mod feed;
pub mod lifecycle;
pub mod portfolio;
pub mod signals;
pub mod sizing;
