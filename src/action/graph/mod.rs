// SPDX-License-Identifier: MIT

//! Action graph data model
//!
//! Nodes live in an id-keyed arena owned by [`ActionGraph`]; edges are
//! ordered id lists on the parent node. Behavior nodes point at Condition
//! nodes, Condition nodes point at (at most one) Behavior node.

mod arena;
mod node;
pub mod types;

pub use arena::ActionGraph;
pub use node::GraphNode;
pub use types::{NodeId, NodeKind, Position, TypeKey};
