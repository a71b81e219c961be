//! Leaf behaviors

use serde::{Deserialize, Serialize};

use crate::action::payload::Behavior;

/// Completes once `wait_time` seconds of ticks have accumulated
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Wait {
    pub wait_time: f32,
    #[serde(skip)]
    elapsed: f32,
}

impl Wait {
    pub fn new(wait_time: f32) -> Self {
        Self {
            wait_time,
            elapsed: 0.0,
        }
    }
}

impl Default for Wait {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Behavior for Wait {
    fn start(&mut self) {
        self.elapsed = 0.0;
    }

    fn update(&mut self, delta_time: f32) -> bool {
        self.elapsed += delta_time;
        self.elapsed >= self.wait_time
    }
}

/// Logs its lifecycle; completes on the first update unless told otherwise
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugLog {
    pub message: String,
    pub complete_immediately: bool,
}

impl Default for DebugLog {
    fn default() -> Self {
        Self {
            message: "Hello from actionflow!".to_string(),
            complete_immediately: true,
        }
    }
}

impl Behavior for DebugLog {
    fn start(&mut self) {
        log::info!("[DebugLog] Started: {}", self.message);
    }

    fn update(&mut self, _delta_time: f32) -> bool {
        self.complete_immediately
    }

    fn end(&mut self) {
        log::info!("[DebugLog] Completed: {}", self.message);
    }

    fn stop(&mut self) {
        log::info!("[DebugLog] Stopped: {}", self.message);
    }
}
