//! Position lifecycle state machine: exit rules, trail phases, the daily
//! decision, and its application.

pub mod apply;
pub mod evaluate;
pub mod rules;
pub mod trail;

pub use apply::{apply, StepResult};
pub use evaluate::{decide, DayAction, DayOutcome};
pub use rules::{ExitRules, StopTrigger};
pub use trail::TrailPhase;
