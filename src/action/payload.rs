// SPDX-License-Identifier: MIT

//! Executable node payloads
//!
//! A node carries one of two payload kinds:
//! - [`Behavior`] - does work each tick and reports completion
//! - [`Condition`] - a gate evaluated while its owning Behavior is active
//!
//! Lifecycle guarantees made by the engine:
//! - a Behavior gets exactly one `end` or `stop` per activation, always after `start`
//! - a Condition gets `start`/`end` bracketing its owning Behavior's activation,
//!   whether or not it was evaluated

use std::fmt;

use super::graph::NodeKind;

/// A unit of work with an explicit lifecycle
pub trait Behavior: Send {
    /// Called when the owning node becomes current
    fn start(&mut self) {}

    /// Advance by `delta_time` seconds. Returns true once the work is complete.
    fn update(&mut self, delta_time: f32) -> bool;

    /// Called when the activation finished normally
    fn end(&mut self) {}

    /// Called when the activation was interrupted before completing
    fn stop(&mut self) {}
}

/// A boolean gate on a Behavior's outgoing edge
pub trait Condition: Send {
    /// Called when the owning Behavior starts
    fn start(&mut self) {}

    /// Returns true when the gate is met this tick
    fn evaluate(&mut self, delta_time: f32) -> bool;

    /// Called when the owning Behavior stops being current
    fn end(&mut self) {}

    /// Called when this gate won the transition
    fn on_success(&mut self) {}
}

/// Closed set of payload kinds
pub enum NodePayload {
    Behavior(Box<dyn Behavior>),
    Condition(Box<dyn Condition>),
}

impl NodePayload {
    pub fn behavior(behavior: impl Behavior + 'static) -> Self {
        Self::Behavior(Box::new(behavior))
    }

    pub fn condition(condition: impl Condition + 'static) -> Self {
        Self::Condition(Box::new(condition))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Behavior(_) => NodeKind::Behavior,
            NodePayload::Condition(_) => NodeKind::Condition,
        }
    }

    pub fn as_behavior_mut(&mut self) -> Option<&mut (dyn Behavior + 'static)> {
        match self {
            NodePayload::Behavior(b) => Some(b.as_mut()),
            NodePayload::Condition(_) => None,
        }
    }

    pub fn as_condition_mut(&mut self) -> Option<&mut (dyn Condition + 'static)> {
        match self {
            NodePayload::Condition(c) => Some(c.as_mut()),
            NodePayload::Behavior(_) => None,
        }
    }

    /// Unwrap a Behavior payload, handing a Condition back as the error
    pub fn into_behavior(self) -> Result<Box<dyn Behavior>, NodePayload> {
        match self {
            NodePayload::Behavior(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl fmt::Debug for NodePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePayload::{}", self.kind())
    }
}
