//! Graph loader - YAML file loading and graph construction
//!
//! Definitions refer to nodes by string labels; building maps each label to a
//! fresh [`NodeId`] and wires edges through [`ActionGraph::connect`], so a
//! loaded graph satisfies the same structural rules as an edited one.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::graph::{ActionGraph, NodeId};
use super::registry::TypeRegistry;
use super::types::{GraphDefinition, RunnerConfig};
use crate::error::{GraphError, Result};

/// A built graph together with the metadata it was loaded with
#[derive(Debug)]
pub struct LoadedGraph {
    pub name: String,
    pub description: String,
    pub graph: ActionGraph,
    pub runner: RunnerConfig,
    /// Definition label to assigned node id
    pub labels: HashMap<String, NodeId>,
}

impl LoadedGraph {
    /// Node id for a definition label
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }
}

/// Loads graph definitions from YAML files
pub struct GraphLoader;

impl GraphLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and build a graph from a YAML file
    pub fn load_graph<P: AsRef<Path>>(&self, path: P, registry: &TypeRegistry) -> Result<LoadedGraph> {
        let path = path.as_ref();
        log::info!("Loading graph from {}", path.display());
        let content = fs::read_to_string(path)?;
        let def = Self::parse_yaml(&content)?;
        Self::build(def, registry)
    }

    /// Parse a graph definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<GraphDefinition> {
        let def: GraphDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }

    /// Build an [`ActionGraph`] from a parsed definition
    pub fn build(def: GraphDefinition, registry: &TypeRegistry) -> Result<LoadedGraph> {
        let mut graph = ActionGraph::new();
        let mut labels: HashMap<String, NodeId> = HashMap::new();

        for node_def in &def.nodes {
            if labels.contains_key(&node_def.id) {
                return Err(GraphError::DuplicateDefinition(node_def.id.clone()).into());
            }
            let id = graph.create_node_with(
                registry,
                node_def.kind,
                &node_def.namespace,
                &node_def.type_name,
                &node_def.params,
                node_def.position,
            )?;
            if let Some(node) = graph.find_mut(id) {
                node.title = node_def.title.clone();
            }
            labels.insert(node_def.id.clone(), id);
        }

        let lookup = |label: &str| -> Result<NodeId> {
            labels
                .get(label)
                .copied()
                .ok_or_else(|| GraphError::UnknownReference(label.to_string()).into())
        };

        for node_def in &def.nodes {
            let parent = lookup(&node_def.id)?;
            for child_label in &node_def.children {
                let child = lookup(child_label)?;
                graph.connect(parent, child)?;
            }
        }

        if let Some(root) = def.root.as_deref() {
            graph.set_root(lookup(root)?)?;
        }

        log::info!(
            "Built graph '{}' with {} nodes (root: {})",
            def.name,
            graph.len(),
            graph.root_id()
        );

        Ok(LoadedGraph {
            name: def.name,
            description: def.description,
            graph,
            runner: def.runner,
            labels,
        })
    }
}

impl Default for GraphLoader {
    fn default() -> Self {
        Self::new()
    }
}
