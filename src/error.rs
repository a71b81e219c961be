// SPDX-License-Identifier: MIT

//! Typed error handling for actionflow-rs
//!
//! Structural and type errors are recoverable: every fallible operation
//! reports through its own `Result`, nothing here is used for control flow.

use thiserror::Error;

use crate::action::graph::{NodeId, NodeKind};

/// Top-level error type for actionflow-rs
#[derive(Debug, Error)]
pub enum ActionError {
    /// Requested payload type is not registered
    #[error("Type '{}' could not be resolved", full_name(namespace, name))]
    TypeResolution { namespace: String, name: String },

    /// Factory produced a payload of the other kind
    #[error("Type '{key}' is a {found} payload, expected {expected}")]
    KindMismatch {
        key: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// Factory rejected the supplied parameters
    #[error("Invalid parameters for '{key}': {message}")]
    InvalidParams { key: String, message: String },

    /// Graph structure errors raised by the mutation layer
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// Structural errors for graph mutation and graph definitions
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// No node with this id exists in the graph
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    /// Root must be an existing Behavior node
    #[error("Node {0} cannot be the root: not a Behavior node")]
    InvalidRoot(NodeId),

    /// Edge rejected by the alternation/chain rules
    #[error("Cannot connect {parent} -> {child}: {reason}")]
    InvalidEdge {
        parent: NodeId,
        child: NodeId,
        reason: String,
    },

    /// Two node definitions share the same label
    #[error("Duplicate node definition: {0}")]
    DuplicateDefinition(String),

    /// A definition references a label that was never defined
    #[error("Unknown node reference: {0}")]
    UnknownReference(String),
}

impl ActionError {
    /// Create a type resolution error
    pub fn type_resolution(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::TypeResolution {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create an invalid parameters error
    pub fn invalid_params(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create from a generic message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<&str> for ActionError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for ActionError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

/// `namespace.name`, or the bare name when the namespace is empty
pub(crate) fn full_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ActionError>;
