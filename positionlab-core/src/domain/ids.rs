use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier tying the closed-trade log back to the position that produced it.
///
/// A partial exit and the later final exit of the same position share one id,
/// which is how the metrics layer folds partials into the parent outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Monotonic id generator owned by the portfolio manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGen {
    next_position: u64,
}

impl IdGen {
    pub fn next_position_id(&mut self) -> PositionId {
        let id = PositionId(self.next_position);
        self.next_position += 1;
        id
    }

    /// Advance the counter past every id in a restored snapshot so new
    /// positions never collide with persisted ones.
    pub fn bump_past(&mut self, id: PositionId) {
        if id.0 >= self.next_position {
            self.next_position = id.0 + 1;
        }
    }
}
