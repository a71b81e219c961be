// SPDX-License-Identifier: MIT

//! Behavior graph core
//!
//! A graph alternates Behavior and Condition nodes. The [`engine`] keeps one
//! Behavior current, ticks it, and follows the first Condition edge that
//! passes. The [`runner`] hosts a graph and engine for a frame loop.

pub mod engine;
pub mod graph;
pub mod loader;
pub mod payload;
pub mod registry;
pub mod runner;
pub mod types;
