// SPDX-License-Identifier: MIT

//! Execution engine
//!
//! A per-frame state machine over an [`ActionGraph`](crate::action::graph::ActionGraph):
//! `Idle -> Running <-> Paused -> Idle`. Each tick runs the current Behavior,
//! checks its Conditions in child order and follows the first one that is met.

mod executor;
mod state;

pub use executor::ExecutionEngine;
pub use state::{EngineSnapshot, EngineState, TickOutcome};
