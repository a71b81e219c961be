//! Transition-driven execution engine

use crate::action::graph::{ActionGraph, NodeId};

use super::state::{EngineSnapshot, EngineState, TickOutcome};

/// Walks an [`ActionGraph`] one tick at a time
///
/// The engine holds a cursor (the current node id) and the Conditions it
/// started for that node. The graph is passed into every call; the engine
/// drives payload lifecycles through it but never changes its structure.
/// Mutating the graph while the engine is Running is not supported. Edits
/// made while Paused keep the lifecycle brackets intact: only Conditions
/// started on entry are evaluated and ended, so one attached mid-activation
/// takes part from the next activation on.
#[derive(Debug, Default)]
pub struct ExecutionEngine {
    state: EngineState,
    current: NodeId,
    /// Last `update` result of the current Behavior
    completed: bool,
    /// Conditions started when the current node was entered
    active_conditions: Vec<NodeId>,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Current node, `NodeId::NONE` while idle
    pub fn current_node_id(&self) -> NodeId {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state,
            current_node_id: self.current,
        }
    }

    /// Begin at the graph's root
    ///
    /// Returns false and stays Idle when already active, or when the root is
    /// unset, not a Behavior, or has no payload.
    pub fn start(&mut self, graph: &mut ActionGraph) -> bool {
        if self.state.is_active() {
            log::warn!("Start ignored: engine is already {:?}", self.state);
            return false;
        }

        let root_id = graph.root_id();
        match graph.root() {
            Some(node) if node.is_behavior() && node.is_valid() => {}
            Some(node) => {
                log::warn!(
                    "Start ignored: root {} ({}) is not a valid Behavior",
                    root_id,
                    node.display_name()
                );
                return false;
            }
            None => {
                log::warn!("Start ignored: graph has no root");
                return false;
            }
        }

        log::info!("Starting action at node {}", root_id);
        self.state = EngineState::Running;
        self.current = root_id;
        self.completed = false;
        self.enter_node(graph, root_id);
        true
    }

    /// Advance the current Behavior by `delta_time` and resolve transitions
    pub fn tick(&mut self, graph: &mut ActionGraph, delta_time: f32) -> TickOutcome {
        if self.state != EngineState::Running {
            return TickOutcome::Inactive;
        }

        let current = self.current;
        let completed = match graph.find_mut(current).and_then(|n| n.behavior_mut()) {
            Some(behavior) => behavior.update(delta_time),
            None => {
                log::warn!("Current node {} is gone or has no payload, abandoning", current);
                self.exit_node(graph, current);
                self.reset();
                return TickOutcome::Abandoned { node: current };
            }
        };
        self.completed = completed;

        let children = child_ids(graph, current);
        let winner = Self::evaluate_transitions(
            graph,
            &children,
            &self.active_conditions,
            completed,
            delta_time,
        );

        let Some(condition_id) = winner else {
            if completed && children.is_empty() {
                log::info!("Node {} completed with no exit", current);
                return self.complete(graph, current);
            }
            return TickOutcome::Continued { node: current };
        };

        let next = graph
            .find(condition_id)
            .and_then(|c| c.children().first().copied());

        match next {
            None => {
                log::info!("Chain ended at condition {}", condition_id);
                self.complete(graph, current)
            }
            Some(next_id) if is_valid_behavior(graph, next_id) => {
                log::info!(
                    "Transition {} -> {} via condition {}",
                    current,
                    next_id,
                    condition_id
                );
                self.exit_node(graph, current);
                self.current = next_id;
                self.completed = false;
                self.enter_node(graph, next_id);
                TickOutcome::Transitioned {
                    from: current,
                    via: condition_id,
                    to: next_id,
                }
            }
            Some(next_id) => {
                log::warn!(
                    "Condition {} leads to {}, which is not a valid Behavior; completing",
                    condition_id,
                    next_id
                );
                self.complete(graph, current)
            }
        }
    }

    /// First Condition child whose gate is met, in child order
    ///
    /// When the Behavior completed this tick every Condition counts as met
    /// without being evaluated, so the first one wins. Dangling ids, non-
    /// Condition children, empty payloads and Conditions that were not
    /// started with this activation are skipped.
    fn evaluate_transitions(
        graph: &mut ActionGraph,
        children: &[NodeId],
        active: &[NodeId],
        completed: bool,
        delta_time: f32,
    ) -> Option<NodeId> {
        for &child_id in children {
            if !active.contains(&child_id) {
                continue;
            }
            let Some(node) = graph.find_mut(child_id) else {
                log::debug!("Skipping dangling child {}", child_id);
                continue;
            };
            let Some(condition) = node.condition_mut() else {
                continue;
            };

            let met = completed || condition.evaluate(delta_time);
            if met {
                log::debug!("Condition {} met", child_id);
                condition.on_success();
                return Some(child_id);
            }
        }
        None
    }

    pub fn pause(&mut self) -> bool {
        if self.state != EngineState::Running {
            return false;
        }
        self.state = EngineState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != EngineState::Paused {
            return false;
        }
        self.state = EngineState::Running;
        true
    }

    /// Pause when Running, resume when Paused
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            EngineState::Running => self.pause(),
            EngineState::Paused => self.resume(),
            EngineState::Idle => false,
        }
    }

    /// Interrupt the run. Returns false (and does nothing) when already Idle.
    pub fn stop(&mut self, graph: &mut ActionGraph) -> bool {
        if self.state.is_idle() {
            return false;
        }

        log::info!("Stopping action at node {}", self.current);
        let current = self.current;
        self.exit_node(graph, current);
        self.reset();
        true
    }

    fn complete(&mut self, graph: &mut ActionGraph, node: NodeId) -> TickOutcome {
        self.exit_node(graph, node);
        self.reset();
        TickOutcome::Completed { node }
    }

    /// `start` the Behavior, then every Condition attached to it
    fn enter_node(&mut self, graph: &mut ActionGraph, id: NodeId) {
        if let Some(behavior) = graph.find_mut(id).and_then(|n| n.behavior_mut()) {
            behavior.start();
        }
        self.active_conditions.clear();
        for child_id in child_ids(graph, id) {
            if let Some(condition) = graph.find_mut(child_id).and_then(|n| n.condition_mut()) {
                condition.start();
                self.active_conditions.push(child_id);
            }
        }
    }

    /// `end` or `stop` the Behavior, then `end` the Conditions started on entry
    fn exit_node(&mut self, graph: &mut ActionGraph, id: NodeId) {
        if let Some(behavior) = graph.find_mut(id).and_then(|n| n.behavior_mut()) {
            if self.completed {
                behavior.end();
            } else {
                behavior.stop();
            }
        }
        for child_id in std::mem::take(&mut self.active_conditions) {
            if let Some(condition) = graph.find_mut(child_id).and_then(|n| n.condition_mut()) {
                condition.end();
            }
        }
    }

    fn reset(&mut self) {
        self.state = EngineState::Idle;
        self.current = NodeId::NONE;
        self.completed = false;
        self.active_conditions.clear();
    }
}

fn child_ids(graph: &ActionGraph, id: NodeId) -> Vec<NodeId> {
    graph
        .find(id)
        .map(|n| n.children().to_vec())
        .unwrap_or_default()
}

fn is_valid_behavior(graph: &ActionGraph, id: NodeId) -> bool {
    graph
        .find(id)
        .map(|n| n.is_behavior() && n.is_valid())
        .unwrap_or(false)
}
