//! Domain types for the position lifecycle engine.

pub mod account;
pub mod ids;
pub mod position;
pub mod signal;
pub mod trade;
pub mod tranche;

pub use account::Account;
pub use ids::{IdGen, PositionId};
pub use position::{Position, PositionStatus};
pub use signal::Signal;
pub use trade::{ClosedTrade, ExitReason};
pub use tranche::Tranche;

/// Ticker symbol type alias
pub type Ticker = String;
