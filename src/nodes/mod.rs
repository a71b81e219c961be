// SPDX-License-Identifier: MIT

//! Built-in node library
//!
//! Registered under the `actionflow` namespace by [`register_builtins`].

pub mod behaviors;
pub mod composite;
pub mod conditions;

use std::sync::Arc;

use crate::action::graph::NodeKind;
use crate::action::registry::TypeRegistry;

pub use behaviors::{DebugLog, Wait};
pub use composite::{Parallel, Sequencer};
pub use conditions::{AlwaysTrue, EndCondition, RandomChance, Timer};

/// Namespace of the built-in types
pub const NAMESPACE: &str = "actionflow";

pub fn register_builtins(registry: &TypeRegistry) {
    registry.register_behavior::<Wait>(NAMESPACE, "Wait");
    registry.register_behavior::<DebugLog>(NAMESPACE, "DebugLog");
    registry.register_factory(
        NAMESPACE,
        "Sequencer",
        NodeKind::Behavior,
        Arc::new(composite::build_sequencer),
    );
    registry.register_factory(
        NAMESPACE,
        "Parallel",
        NodeKind::Behavior,
        Arc::new(composite::build_parallel),
    );

    registry.register_condition::<AlwaysTrue>(NAMESPACE, "AlwaysTrue");
    registry.register_condition::<EndCondition>(NAMESPACE, "EndCondition");
    registry.register_condition::<Timer>(NAMESPACE, "Timer");
    registry.register_condition::<RandomChance>(NAMESPACE, "RandomChance");
}
