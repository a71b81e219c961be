//! Behaviors that drive other behaviors inside a single node

use serde::Deserialize;
use serde_json::Value;

use crate::action::payload::{Behavior, NodePayload};
use crate::action::registry::TypeRegistry;
use crate::error::{ActionError, Result};

/// Parameters shared by the composites: the inner behaviors to build
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompositeParams {
    pub behaviors: Vec<InnerBehaviorDef>,
}

/// One inner behavior, resolved through the registry
#[derive(Debug, Clone, Deserialize)]
pub struct InnerBehaviorDef {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub params: Value,
}

fn build_inner(registry: &TypeRegistry, key: &str, params: &Value) -> Result<Vec<Box<dyn Behavior>>> {
    let parsed: CompositeParams = if params.is_null() {
        CompositeParams::default()
    } else {
        serde_json::from_value(params.clone())
            .map_err(|e| ActionError::invalid_params(key, e.to_string()))?
    };

    parsed
        .behaviors
        .iter()
        .map(|def| registry.create_behavior(&def.namespace, &def.type_name, &def.params))
        .collect()
}

/// Registry factory for [`Sequencer`]
pub fn build_sequencer(registry: &TypeRegistry, params: &Value) -> Result<NodePayload> {
    let behaviors = build_inner(registry, "Sequencer", params)?;
    Ok(NodePayload::behavior(Sequencer::new(behaviors)))
}

/// Registry factory for [`Parallel`]
pub fn build_parallel(registry: &TypeRegistry, params: &Value) -> Result<NodePayload> {
    let behaviors = build_inner(registry, "Parallel", params)?;
    Ok(NodePayload::behavior(Parallel::new(behaviors)))
}

/// Runs inner behaviors one after another
///
/// Behaviors that complete immediately are chained within the same tick.
/// Only the inner behavior that is started and unfinished receives `end`/`stop`.
#[derive(Default)]
pub struct Sequencer {
    behaviors: Vec<Box<dyn Behavior>>,
    active: Option<usize>,
}

impl Sequencer {
    pub fn new(behaviors: Vec<Box<dyn Behavior>>) -> Self {
        Self {
            behaviors,
            active: None,
        }
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl Behavior for Sequencer {
    fn start(&mut self) {
        self.active = None;
        if let Some(first) = self.behaviors.first_mut() {
            first.start();
            self.active = Some(0);
        }
    }

    fn update(&mut self, delta_time: f32) -> bool {
        while let Some(index) = self.active {
            if !self.behaviors[index].update(delta_time) {
                return false;
            }
            self.behaviors[index].end();

            let next = index + 1;
            if next < self.behaviors.len() {
                self.behaviors[next].start();
                self.active = Some(next);
            } else {
                self.active = None;
            }
        }
        true
    }

    fn end(&mut self) {
        if let Some(index) = self.active.take() {
            self.behaviors[index].end();
        }
    }

    fn stop(&mut self) {
        if let Some(index) = self.active.take() {
            self.behaviors[index].stop();
        }
    }
}

/// Runs all inner behaviors side by side
///
/// Finished inner behaviors are ended as they complete; the Parallel itself
/// reports completion on the tick after the last one finished.
#[derive(Default)]
pub struct Parallel {
    behaviors: Vec<Box<dyn Behavior>>,
    running: Vec<bool>,
}

impl Parallel {
    pub fn new(behaviors: Vec<Box<dyn Behavior>>) -> Self {
        Self {
            behaviors,
            running: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl Behavior for Parallel {
    fn start(&mut self) {
        self.running = vec![true; self.behaviors.len()];
        for behavior in &mut self.behaviors {
            behavior.start();
        }
    }

    fn update(&mut self, delta_time: f32) -> bool {
        if !self.running.iter().any(|r| *r) {
            return true;
        }

        for (behavior, running) in self.behaviors.iter_mut().zip(self.running.iter_mut()) {
            if *running && behavior.update(delta_time) {
                behavior.end();
                *running = false;
            }
        }
        false
    }

    fn end(&mut self) {
        for (behavior, running) in self.behaviors.iter_mut().zip(self.running.iter_mut()) {
            if *running {
                behavior.end();
                *running = false;
            }
        }
    }

    fn stop(&mut self) {
        for (behavior, running) in self.behaviors.iter_mut().zip(self.running.iter_mut()) {
            if *running {
                behavior.stop();
                *running = false;
            }
        }
    }
}
