//! Host that owns a graph and drives it frame by frame

use std::time::Duration;

use super::engine::{EngineSnapshot, EngineState, ExecutionEngine, TickOutcome};
use super::graph::ActionGraph;
use super::loader::LoadedGraph;
use super::types::RunnerConfig;

/// Result of [`ActionRunner::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks that reached a Running engine
    pub ticks: u64,
    pub outcome: TickOutcome,
    /// Engine state when the loop returned
    pub state: EngineState,
}

/// Owns one action graph and the engine walking it
///
/// The host application calls [`enable`](Self::enable) when the owner becomes
/// active, [`tick`](Self::tick) once per frame, and [`disable`](Self::disable)
/// when it goes away. Dropping the runner disables it, so a running action is
/// always stopped.
#[derive(Debug)]
pub struct ActionRunner {
    graph: ActionGraph,
    engine: ExecutionEngine,
    config: RunnerConfig,
    enabled: bool,
}

impl ActionRunner {
    pub fn new(graph: ActionGraph, config: RunnerConfig) -> Self {
        Self {
            graph,
            engine: ExecutionEngine::new(),
            config,
            enabled: false,
        }
    }

    /// Take over a loaded graph along with its stored runner settings
    pub fn from_loaded(loaded: LoadedGraph) -> Self {
        Self::new(loaded.graph, loaded.runner)
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Activate the host, starting the action when `auto_start` is set
    ///
    /// Returns true when this call started the engine.
    pub fn enable(&mut self) -> bool {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        self.config.auto_start && self.start()
    }

    /// Deactivate the host, stopping a running or paused action
    pub fn disable(&mut self) {
        if !self.enabled && self.engine.state().is_idle() {
            return;
        }
        self.enabled = false;
        if !self.engine.state().is_idle() {
            self.engine.stop(&mut self.graph);
        }
    }

    pub fn start(&mut self) -> bool {
        self.engine.start(&mut self.graph)
    }

    pub fn stop(&mut self) -> bool {
        self.engine.stop(&mut self.graph)
    }

    pub fn pause(&mut self) -> bool {
        self.engine.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.engine.resume()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.engine.toggle_pause()
    }

    /// Advance the action by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) -> TickOutcome {
        self.engine.tick(&mut self.graph, delta_time)
    }

    /// Advance by one frame at the configured frame rate
    pub fn tick_frame(&mut self) -> TickOutcome {
        let delta_time = self.config.delta_time();
        self.tick(delta_time)
    }

    /// Tick until the action finishes or `max_ticks` is reached
    ///
    /// With `realtime` each tick waits for the next frame of a tokio interval
    /// at the configured frame rate. `on_tick` sees every outcome together
    /// with the snapshot taken right after it.
    pub async fn run<F>(&mut self, realtime: bool, mut on_tick: F) -> RunSummary
    where
        F: FnMut(&TickOutcome, EngineSnapshot),
    {
        let delta_time = self.config.delta_time();
        let mut interval = if realtime {
            frame_period(delta_time).map(tokio::time::interval)
        } else {
            None
        };

        let mut ticks = 0;
        let mut last = TickOutcome::Inactive;
        while self.config.max_ticks.map_or(true, |max| ticks < max) {
            if let Some(interval) = interval.as_mut() {
                interval.tick().await;
            }

            last = self.tick(delta_time);
            if last == TickOutcome::Inactive {
                break;
            }
            ticks += 1;
            on_tick(&last, self.snapshot());
            if last.is_finished() {
                break;
            }
        }

        log::info!("Ran {} ticks, last outcome {:?}", ticks, last);
        RunSummary {
            ticks,
            outcome: last,
            state: self.state(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    pub fn graph(&self) -> &ActionGraph {
        &self.graph
    }

    /// Edit access to the graph, refused while the action is Running
    pub fn graph_mut(&mut self) -> Option<&mut ActionGraph> {
        if self.engine.is_running() {
            None
        } else {
            Some(&mut self.graph)
        }
    }
}

/// Wall-clock length of one frame, `None` when it cannot pace an interval
fn frame_period(delta_time: f32) -> Option<Duration> {
    match Duration::try_from_secs_f32(delta_time) {
        Ok(period) if !period.is_zero() => Some(period),
        _ => {
            log::warn!("Frame delta {}s cannot be paced, running unpaced", delta_time);
            None
        }
    }
}

impl Drop for ActionRunner {
    fn drop(&mut self) {
        self.disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::graph::{NodeId, Position, TypeKey};
    use crate::action::payload::{Behavior, NodePayload};
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct Endless {
        log: CallLog,
    }

    impl Behavior for Endless {
        fn start(&mut self) {
            self.log.lock().unwrap().push("start".to_string());
        }

        fn update(&mut self, _delta_time: f32) -> bool {
            false
        }

        fn end(&mut self) {
            self.log.lock().unwrap().push("end".to_string());
        }

        fn stop(&mut self) {
            self.log.lock().unwrap().push("stop".to_string());
        }
    }

    fn runner(auto_start: bool) -> (ActionRunner, CallLog, NodeId) {
        let log = CallLog::default();
        let mut graph = ActionGraph::new();
        let root = graph.insert_node(
            TypeKey::new("test", "Endless"),
            NodePayload::behavior(Endless { log: log.clone() }),
            Position::default(),
        );
        graph.set_root(root).unwrap();

        let config = RunnerConfig {
            auto_start,
            ..Default::default()
        };
        (ActionRunner::new(graph, config), log, root)
    }

    fn calls(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_enable_auto_starts() {
        let (mut runner, log, root) = runner(true);
        assert!(runner.enable());
        assert_eq!(runner.state(), EngineState::Running);
        assert_eq!(runner.snapshot().current_node_id, root);
        assert_eq!(calls(&log), vec!["start"]);

        assert!(!runner.enable());
    }

    #[test]
    fn test_enable_without_auto_start() {
        let (mut runner, log, _) = runner(false);
        assert!(!runner.enable());
        assert!(runner.is_enabled());
        assert!(runner.state().is_idle());
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_disable_stops_once() {
        let (mut runner, log, _) = runner(true);
        runner.enable();
        runner.tick(0.016);

        runner.disable();
        runner.disable();
        assert!(runner.state().is_idle());
        assert_eq!(calls(&log), vec!["start", "stop"]);
    }

    #[test]
    fn test_disable_stops_paused_action() {
        let (mut runner, log, _) = runner(true);
        runner.enable();
        assert!(runner.pause());

        runner.disable();
        assert!(runner.state().is_idle());
        assert_eq!(calls(&log), vec!["start", "stop"]);
    }

    #[test]
    fn test_drop_stops_running_action() {
        let (mut runner, log, _) = runner(true);
        runner.enable();
        drop(runner);
        assert_eq!(calls(&log), vec!["start", "stop"]);
    }

    #[test]
    fn test_drop_idle_runner_is_quiet() {
        let (runner, log, _) = runner(true);
        drop(runner);
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_graph_mut_refused_while_running() {
        let (mut runner, _, _) = runner(true);
        assert!(runner.graph_mut().is_some());

        runner.enable();
        assert!(runner.graph_mut().is_none());

        runner.toggle_pause();
        assert!(runner.graph_mut().is_some());

        runner.toggle_pause();
        runner.stop();
        assert!(runner.graph_mut().is_some());
    }

    #[test]
    fn test_tick_frame_uses_frame_rate() {
        let (mut runner, _, root) = runner(true);
        runner.enable();
        assert_eq!(runner.tick_frame(), TickOutcome::Continued { node: root });
        assert_eq!(runner.config().frame_rate, 60.0);
    }

    #[tokio::test]
    async fn test_run_respects_max_ticks() {
        let log = CallLog::default();
        let mut graph = ActionGraph::new();
        let root = graph.insert_node(
            TypeKey::new("test", "Endless"),
            NodePayload::behavior(Endless { log: log.clone() }),
            Position::default(),
        );
        graph.set_root(root).unwrap();
        let config = RunnerConfig {
            max_ticks: Some(5),
            ..Default::default()
        };
        let mut runner = ActionRunner::new(graph, config);
        runner.enable();

        let mut seen = 0;
        let summary = runner.run(false, |_, _| seen += 1).await;
        assert_eq!(summary.ticks, 5);
        assert_eq!(seen, 5);
        assert_eq!(summary.outcome, TickOutcome::Continued { node: root });
        assert_eq!(summary.state, EngineState::Running);
    }

    #[test]
    fn test_frame_period_rejects_unrepresentable_deltas() {
        assert_eq!(frame_period(0.5), Some(Duration::from_millis(500)));
        assert_eq!(frame_period(0.0), None);
        assert_eq!(frame_period(1.0 / 1e-20), None);
        assert_eq!(frame_period(f32::NAN), None);
        assert_eq!(frame_period(1e-12), None);
    }

    #[tokio::test]
    async fn test_realtime_run_with_tiny_frame_rate_runs_unpaced() {
        let (mut runner, _, root) = runner(true);
        runner.config.frame_rate = 1e-20;
        runner.config.max_ticks = Some(3);
        runner.enable();

        let summary = runner.run(true, |_, _| {}).await;
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.outcome, TickOutcome::Continued { node: root });
    }

    #[tokio::test]
    async fn test_run_idle_runner_returns_immediately() {
        let (mut runner, _, _) = runner(false);
        let summary = runner.run(false, |_, _| {}).await;
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.outcome, TickOutcome::Inactive);
    }
}
