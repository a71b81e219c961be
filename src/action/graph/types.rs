//! Graph type definitions
//!
//! Identity, kind and editor-facing metadata shared by every node.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque node identifier, unique within one graph
///
/// `0` is reserved for "unset" (see [`NodeId::NONE`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The unset id
    pub const NONE: NodeId = NodeId(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// The two kinds of executable node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Behavior,
    Condition,
}

impl NodeKind {
    /// The kind a child of this kind must have
    pub fn child_kind(self) -> NodeKind {
        match self {
            NodeKind::Behavior => NodeKind::Condition,
            NodeKind::Condition => NodeKind::Behavior,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Behavior => write!(f, "Behavior"),
            NodeKind::Condition => write!(f, "Condition"),
        }
    }
}

/// Editor canvas position. Never read by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Registry key of a payload type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TypeKey {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
}

impl TypeKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// `namespace.name`, or the bare name without a namespace
    pub fn full_name(&self) -> String {
        crate::error::full_name(&self.namespace, &self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(NodeId::default().is_none());
        assert!(!NodeId::new(3).is_none());
        assert_eq!(NodeId::new(3).get(), 3);
    }

    #[test]
    fn test_child_kind_alternates() {
        assert_eq!(NodeKind::Behavior.child_kind(), NodeKind::Condition);
        assert_eq!(NodeKind::Condition.child_kind(), NodeKind::Behavior);
    }

    #[test]
    fn test_type_key_full_name() {
        assert_eq!(TypeKey::new("actionflow", "Wait").full_name(), "actionflow.Wait");
        assert_eq!(TypeKey::new("", "Wait").full_name(), "Wait");
    }

    #[test]
    fn test_node_kind_deserialize() {
        let kind: NodeKind = serde_yaml::from_str("Condition").unwrap();
        assert_eq!(kind, NodeKind::Condition);
    }
}
