// SPDX-License-Identifier: MIT

//! actionflow-rs: a behavior graph engine
//!
//! Actions are graphs of alternating Behavior and Condition nodes, built in
//! code or loaded from YAML, and executed one tick at a time.

pub mod action;
pub mod error;
pub mod nodes;
