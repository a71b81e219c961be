//! Built-in gates

use serde::{Deserialize, Serialize};

use crate::action::payload::Condition;

/// Always met
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AlwaysTrue;

impl Condition for AlwaysTrue {
    fn evaluate(&mut self, _delta_time: f32) -> bool {
        true
    }
}

/// Met only when the owning Behavior completes
///
/// The engine treats every Condition as met on the tick its Behavior
/// completes, so this gate only has to refuse otherwise.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EndCondition;

impl Condition for EndCondition {
    fn evaluate(&mut self, _delta_time: f32) -> bool {
        false
    }

    fn on_success(&mut self) {
        log::debug!("[EndCondition] Behavior completed");
    }
}

/// Met once `wait_time` seconds have passed since the owning Behavior started
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Timer {
    pub wait_time: f32,
    #[serde(skip)]
    elapsed: f32,
    #[serde(skip)]
    started: bool,
}

impl Timer {
    pub fn new(wait_time: f32) -> Self {
        Self {
            wait_time,
            elapsed: 0.0,
            started: false,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl Condition for Timer {
    fn start(&mut self) {
        self.elapsed = 0.0;
        self.started = true;
    }

    fn evaluate(&mut self, delta_time: f32) -> bool {
        if !self.started {
            return false;
        }
        self.elapsed += delta_time;
        self.elapsed >= self.wait_time
    }

    fn end(&mut self) {
        self.started = false;
    }

    fn on_success(&mut self) {
        log::debug!("[Timer] Elapsed after {:.2}s", self.elapsed);
    }
}

/// Met with probability `success_chance` on each evaluation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RandomChance {
    pub success_chance: f32,
}

impl Default for RandomChance {
    fn default() -> Self {
        Self {
            success_chance: 0.5,
        }
    }
}

impl Condition for RandomChance {
    fn evaluate(&mut self, _delta_time: f32) -> bool {
        rand::random::<f32>() < self.success_chance
    }

    fn on_success(&mut self) {
        log::debug!(
            "[RandomChance] Succeeded (chance: {:.0}%)",
            self.success_chance * 100.0
        );
    }
}
