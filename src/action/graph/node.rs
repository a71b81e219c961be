//! A node in the action graph

use std::fmt;

use super::types::{NodeId, NodeKind, Position, TypeKey};
use crate::action::payload::{Behavior, Condition, NodePayload};
use crate::error::{ActionError, Result};

/// A Behavior or Condition node with its outgoing edges
///
/// The payload may be absent (cleared by the inspector, or never built);
/// the engine treats such nodes as invalid. When present, its kind always
/// matches [`GraphNode::kind`].
pub struct GraphNode {
    id: NodeId,
    kind: NodeKind,
    type_key: TypeKey,
    payload: Option<NodePayload>,
    /// Optional display title set by the editor
    pub title: Option<String>,
    /// Editor canvas position
    pub position: Position,
    pub(crate) children: Vec<NodeId>,
}

impl GraphNode {
    pub(crate) fn new(id: NodeId, type_key: TypeKey, payload: NodePayload, position: Position) -> Self {
        Self {
            id,
            kind: payload.kind(),
            type_key,
            payload: Some(payload),
            title: None,
            position,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_behavior(&self) -> bool {
        self.kind == NodeKind::Behavior
    }

    pub fn is_condition(&self) -> bool {
        self.kind == NodeKind::Condition
    }

    pub fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    /// Outgoing edges in evaluation order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// A node is valid for execution when it carries a payload
    pub fn is_valid(&self) -> bool {
        self.has_payload()
    }

    pub fn payload(&self) -> Option<&NodePayload> {
        self.payload.as_ref()
    }

    pub fn behavior_mut(&mut self) -> Option<&mut (dyn Behavior + 'static)> {
        self.payload.as_mut().and_then(NodePayload::as_behavior_mut)
    }

    pub fn condition_mut(&mut self) -> Option<&mut (dyn Condition + 'static)> {
        self.payload.as_mut().and_then(NodePayload::as_condition_mut)
    }

    /// Replace the payload. The new payload must have this node's kind.
    pub fn set_payload(&mut self, type_key: TypeKey, payload: NodePayload) -> Result<()> {
        if payload.kind() != self.kind {
            return Err(ActionError::KindMismatch {
                key: type_key.full_name(),
                expected: self.kind,
                found: payload.kind(),
            });
        }
        self.type_key = type_key;
        self.payload = Some(payload);
        Ok(())
    }

    /// Remove the payload, leaving an empty node of the same kind
    pub fn clear_payload(&mut self) -> Option<NodePayload> {
        self.payload.take()
    }

    /// Title, else the payload type name, else a placeholder
    pub fn display_name(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        if !self.type_key.name.is_empty() {
            return self.type_key.name.clone();
        }
        format!("Empty {}", self.kind)
    }

    /// Conditions form a chain: at most one outgoing edge
    pub fn can_add_child(&self) -> bool {
        match self.kind {
            NodeKind::Behavior => true,
            NodeKind::Condition => self.children.is_empty(),
        }
    }
}

impl fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("type_key", &self.type_key)
            .field("has_payload", &self.has_payload())
            .field("title", &self.title)
            .field("children", &self.children)
            .finish()
    }
}
