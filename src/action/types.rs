// SPDX-License-Identifier: MIT

//! YAML schema types for graph definitions and runner configuration

use serde::{Deserialize, Serialize};

use super::graph::{NodeKind, Position};

/// Top-level graph definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GraphDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Label of the root Behavior node
    pub root: Option<String>,
    /// Host settings stored alongside the graph
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

/// A node in a graph definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NodeDefinition {
    /// Unique label, local to the file
    pub id: String,
    pub kind: NodeKind,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub namespace: String,
    pub title: Option<String>,
    #[serde(default)]
    pub position: Position,
    /// Payload parameters handed to the type's factory
    #[serde(default)]
    pub params: serde_json::Value,
    /// Labels of child nodes in evaluation order
    #[serde(default)]
    pub children: Vec<String>,
}

/// Host settings for an [`ActionRunner`](super::runner::ActionRunner)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Start the action as soon as the runner is enabled
    pub auto_start: bool,
    /// Ticks per second used to derive the frame delta
    pub frame_rate: f32,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
}

impl RunnerConfig {
    /// Seconds per tick
    pub fn delta_time(&self) -> f32 {
        if self.frame_rate > 0.0 {
            1.0 / self.frame_rate
        } else {
            0.0
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            frame_rate: 60.0,
            max_ticks: None,
        }
    }
}
