//! Engine run state and per-tick outcomes

use serde::{Deserialize, Serialize};

use crate::action::graph::NodeId;

/// Run state of an [`ExecutionEngine`](super::ExecutionEngine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EngineState {
    /// No active node. Initial and terminal state.
    #[default]
    Idle,
    /// A Behavior node is current and ticking
    Running,
    /// Ticking suspended, current node retained
    Paused,
}

impl EngineState {
    pub fn is_idle(self) -> bool {
        self == EngineState::Idle
    }

    /// Running or Paused: a node is current
    pub fn is_active(self) -> bool {
        !self.is_idle()
    }
}

/// Read-only view polled by an editor to highlight the current node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    /// `NodeId::NONE` while idle
    pub current_node_id: NodeId,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Engine was not Running; nothing happened
    Inactive,
    /// Stayed on the current Behavior
    Continued { node: NodeId },
    /// A Condition won and handed off to the next Behavior
    Transitioned {
        from: NodeId,
        via: NodeId,
        to: NodeId,
    },
    /// The action finished; the engine is Idle again
    Completed { node: NodeId },
    /// The current node vanished or lost its payload mid-run; the engine is Idle again
    Abandoned { node: NodeId },
}

impl TickOutcome {
    /// True when this tick ended the run
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            TickOutcome::Completed { .. } | TickOutcome::Abandoned { .. }
        )
    }
}
