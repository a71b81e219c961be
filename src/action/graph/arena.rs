//! Id-keyed node store with structural mutation

use serde_json::Value;
use std::collections::BTreeMap;

use super::node::GraphNode;
use super::types::{NodeId, NodeKind, Position, TypeKey};
use crate::action::payload::NodePayload;
use crate::action::registry::TypeRegistry;
use crate::error::{GraphError, Result};

/// Owns every node of one action plus the root designation
///
/// Edges are id lists on the parent node, so deleting a node never leaves a
/// dangling reference behind here, and a stale id in a child list can only
/// come from an external edit. Ids are handed out in increasing order and are
/// never reused, so iteration order is creation order.
#[derive(Debug, Default)]
pub struct ActionGraph {
    root_id: NodeId,
    nodes: BTreeMap<NodeId, GraphNode>,
    last_id: u32,
}

impl ActionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with a default-constructed payload of the named type
    ///
    /// Fails without touching the graph when the type cannot be resolved or
    /// is of the other kind.
    pub fn create_node(
        &mut self,
        registry: &TypeRegistry,
        kind: NodeKind,
        namespace: &str,
        name: &str,
    ) -> Result<NodeId> {
        self.create_node_with(registry, kind, namespace, name, &Value::Null, Position::default())
    }

    /// Create a node whose payload is built from `params`
    pub fn create_node_with(
        &mut self,
        registry: &TypeRegistry,
        kind: NodeKind,
        namespace: &str,
        name: &str,
        params: &Value,
        position: Position,
    ) -> Result<NodeId> {
        let payload = registry.create(kind, namespace, name, params)?;
        Ok(self.insert_node(TypeKey::new(namespace, name), payload, position))
    }

    /// Add a node around an already constructed payload
    pub fn insert_node(&mut self, type_key: TypeKey, payload: NodePayload, position: Position) -> NodeId {
        let id = self.allocate_id();
        self.nodes.insert(id, GraphNode::new(id, type_key, payload, position));
        id
    }

    fn allocate_id(&mut self) -> NodeId {
        self.last_id += 1;
        NodeId::new(self.last_id)
    }

    /// Remove a node and every edge pointing at it. Returns false if absent.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        if id == self.root_id {
            self.root_id = NodeId::NONE;
        }
        for node in self.nodes.values_mut() {
            node.children.retain(|child| *child != id);
        }
        true
    }

    /// Append an edge unless it already exists. Returns true if added.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.nodes.get_mut(&parent) {
            Some(node) if !node.children.contains(&child) => {
                node.children.push(child);
                true
            }
            _ => false,
        }
    }

    /// Remove an edge if present. Returns true if removed.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.nodes.get_mut(&parent) {
            Some(node) => {
                let before = node.children.len();
                node.children.retain(|c| *c != child);
                node.children.len() != before
            }
            None => false,
        }
    }

    /// Add an edge after checking the alternation and chain rules
    ///
    /// This is the check an editor performs before wiring two ports; the raw
    /// [`add_child`](Self::add_child) does not validate.
    pub fn connect(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let invalid = |reason: &str| GraphError::InvalidEdge {
            parent,
            child,
            reason: reason.to_string(),
        };

        if parent == child {
            return Err(invalid("a node cannot be its own child").into());
        }
        let parent_node = self.find(parent).ok_or(GraphError::NodeNotFound(parent))?;
        let child_node = self.find(child).ok_or(GraphError::NodeNotFound(child))?;

        if parent_node.children().contains(&child) {
            return Ok(());
        }
        if child_node.kind() != parent_node.kind().child_kind() {
            return Err(invalid(&format!(
                "{} nodes only connect to {} nodes",
                parent_node.kind(),
                parent_node.kind().child_kind()
            ))
            .into());
        }
        if !parent_node.can_add_child() {
            return Err(invalid("a Condition can only have one child").into());
        }

        self.add_child(parent, child);
        Ok(())
    }

    pub fn find(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    pub fn root(&self) -> Option<&GraphNode> {
        self.find(self.root_id)
    }

    /// Designate the root. Only an existing Behavior node qualifies.
    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        match self.find(id) {
            Some(node) if node.is_behavior() => {
                self.root_id = id;
                Ok(())
            }
            Some(_) => Err(GraphError::InvalidRoot(id).into()),
            None => Err(GraphError::NodeNotFound(id).into()),
        }
    }

    pub fn clear_root(&mut self) {
        self.root_id = NodeId::NONE;
    }

    /// Point the root anywhere, as a stale or hand-edited asset could
    #[cfg(test)]
    pub(crate) fn set_root_unchecked(&mut self, id: NodeId) {
        self.root_id = id;
    }

    /// Nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop child ids that no longer resolve. Returns how many were removed.
    pub fn prune_dangling_edges(&mut self) -> usize {
        let live: Vec<NodeId> = self.node_ids();
        let mut removed = 0;
        for node in self.nodes.values_mut() {
            let before = node.children.len();
            node.children.retain(|child| live.binary_search(child).is_ok());
            removed += before - node.children.len();
        }
        if removed > 0 {
            log::debug!("Pruned {} dangling edges", removed);
        }
        removed
    }
}
