//! Top-level application loop.
//!
//! `AppState` owns the input arbitrator, the interaction machine and the
//! ring view.  Each frame it drains perception, takes one `InputFrame`,
//! ticks the machine against the ring and advances the dissolve.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use hand_intent::{
    Command, GestureLevels, InputArbitrator, IntentConfig, InteractionMachine, InteractionState,
    PerceptionEvent, PerceptionStatus, PointerState, Viewport,
};
use tracing::info;

use crate::hexagram::{hexagrams, HEXAGRAM_COUNT};
use crate::perception::spawn_landmark_source;
use crate::ring::RingView;
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppConfig {
    pub width:  usize,
    pub height: usize,
    /// Number of cards on the ring.
    pub items:  usize,
    pub intent: IntentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width:  1200,
            height: 720,
            items:  HEXAGRAM_COUNT,
            intent: IntentConfig::default(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    arbitrator: InputArbitrator,
    machine:    InteractionMachine,
    view:       RingView,
    /// False once the perception channel has hung up.
    perception: bool,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self, String> {
        let view = RingView::new(hexagrams(cfg.items));
        let viewport = Viewport::new(cfg.width as f32, cfg.height as f32);
        let (arbitrator, machine) = cfg
            .intent
            .build(viewport, view.ring.ids())
            .map_err(|e| e.to_string())?;
        Ok(AppState { arbitrator, machine, view, perception: true })
    }

    // ── inputs ───────────────────────────────────────────────────────────

    /// Feed everything the perception thread has produced since last frame.
    pub fn drain_perception(&mut self, rx: &Receiver<PerceptionEvent>) {
        while self.perception {
            match rx.try_recv() {
                Ok(event) => self.arbitrator.on_perception(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.perception = false;
                    self.arbitrator.perception_closed();
                }
            }
        }
    }

    pub fn on_perception(&mut self, event: PerceptionEvent) {
        self.arbitrator.on_perception(event);
    }

    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.arbitrator.on_pointer_move(x, y);
    }

    pub fn on_mouse_press(&mut self) {
        self.arbitrator.on_pointer_press();
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.arbitrator.resize(Viewport::new(width as f32, height as f32));
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    /// One frame of `dt` seconds.  Returns whatever reached the ring.
    pub fn tick(&mut self, dt: f32) -> Vec<Command> {
        let mut shown = Vec::new();
        let frame = self.arbitrator.take_frame();
        let view = &mut self.view;

        if let Some(cmd) = self.machine.tick(&frame, dt, &mut view.layout, &mut view.presenter) {
            shown.push(cmd);
        }
        if let Some(done) = view.presenter.tick(dt) {
            if let Some(cmd) = self.machine.dissolve_complete(done, &mut view.presenter) {
                shown.push(cmd);
            }
        }
        shown
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn view(&self)    -> &RingView          { &self.view }
    pub fn pointer(&self) -> &PointerState      { self.arbitrator.pointer() }
    pub fn levels(&self)  -> GestureLevels      { self.arbitrator.levels() }
    pub fn state(&self)   -> InteractionState   { self.machine.state() }

    pub fn status_line(&self) -> String {
        let input = match self.arbitrator.status() {
            PerceptionStatus::Unavailable(_)         => "mouse only (no camera)",
            _ if self.arbitrator.hand_detected()     => "hand",
            _                                        => "mouse",
        };
        format!("{}  [{} · {}]", self.view.presenter.status(), self.machine.state().name(), input)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the visualizer, the perception source (simulated hand by
/// default, LeapMotion with `--features leap`) and drives the frame loop
/// at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    let mut app = AppState::new(&cfg)?;

    // ── Perception channel ────────────────────────────────────────────────
    #[cfg(not(feature = "leap"))]
    let (sim_tx, perception_rx) = {
        use crate::perception::SimLandmarkSource;
        let (tx, rx) = std::sync::mpsc::channel();
        let source = SimLandmarkSource { rx, mirror_x: cfg.intent.pointer.mirror_x };
        (Some(tx), spawn_landmark_source(source))
    };
    #[cfg(feature = "leap")]
    let (sim_tx, perception_rx) = (None, spawn_landmark_source(crate::perception::LeapLandmarkSource));

    let mut vis = Visualizer::new(cfg.width, cfg.height, sim_tx)?;
    info!(items = cfg.items, width = cfg.width, height = cfg.height, "window open");

    let mut last = Instant::now();
    while vis.is_open() {
        // 1. Window input
        let input = vis.poll_input();
        if input.quit { break; }
        if let Some((w, h)) = input.resized {
            app.resize(w, h);
        }
        if let Some((x, y)) = input.mouse {
            app.on_mouse_move(x, y);
        }
        if input.pressed {
            app.on_mouse_press();
        }

        // 2. Perception
        app.drain_perception(&perception_rx);

        // 3. Per-frame logic
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        app.tick(dt);

        // 4. Render
        vis.render(app.view(), app.pointer(), app.levels(), &app.status_line());
    }

    info!("window closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
