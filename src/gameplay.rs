use std::sync::mpsc::{self, Receiver};

use clipboard_rs::{Clipboard, ClipboardContext};
use liquid_sort::{PuzzleEngine, PuzzleEvent, Result, Transition, TransitionOutcome};
use macroquad::prelude::*;

use crate::renderer::{AnimationFrame, ControlAction, HitItem, Renderer};

/// How long, in seconds, each engine transition is shown before it completes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransitionTimings {
    pub pour: f64,
    pub rejection: f64,
    pub victory: f64,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            pour: 0.7,
            rejection: 0.4,
            victory: 2.0,
        }
    }
}

impl TransitionTimings {
    fn duration(&self, transition: Transition) -> f64 {
        match transition {
            Transition::Pour { .. } => self.pour,
            Transition::Rejection { .. } => self.rejection,
            Transition::NewPuzzle => self.victory,
        }
    }
}

struct PendingAnimation {
    transition: Transition,
    started_at: f64,
}

/// Wires clicks into the engine and plays each pending transition for its
/// duration before letting the engine complete it.
pub struct GameHost {
    engine: PuzzleEngine,
    renderer: Renderer,
    events: Receiver<PuzzleEvent>,
    animation: Option<PendingAnimation>,
    timings: TransitionTimings,
}

impl GameHost {
    pub fn new(mut engine: PuzzleEngine, timings: TransitionTimings) -> Self {
        let (tx, events) = mpsc::channel();
        engine.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });
        Self {
            engine,
            renderer: Renderer::new(),
            events,
            animation: None,
            timings,
        }
    }

    pub fn handle_click(&mut self, x: f32, y: f32) -> Result<()> {
        let Some(item) = self
            .renderer
            .get_hit_test_registry()
            .hit_test(x, y)
            .map(|hit| hit.item)
        else {
            return Ok(());
        };
        match item {
            HitItem::Container { index } => {
                let outcome = self.engine.select_container(index)?;
                debug!("Clicked container {}: {:?}", index, outcome);
            }
            HitItem::Button { action } => self.handle_action(action)?,
        }
        Ok(())
    }

    pub fn handle_action(&mut self, action: ControlAction) -> Result<()> {
        match action {
            ControlAction::NewPuzzle => {
                if self.engine.is_busy() {
                    return Ok(());
                }
                let state = self.engine.new_puzzle()?;
                info!("New puzzle {}", state);
            }
            ControlAction::CopyLayout => self.copy_layout(),
        }
        Ok(())
    }

    fn copy_layout(&self) {
        let repr = self.engine.state().get_text_representation();
        match ClipboardContext::new() {
            Ok(ctx) => match ctx.set_text(repr.clone()) {
                Ok(()) => info!("Copied layout {}", repr),
                Err(err) => warn!("Could not copy layout: {}", err),
            },
            Err(err) => warn!("Clipboard unavailable: {}", err),
        }
    }

    /// Forward engine events to the renderer and complete the transition whose
    /// animation has finished playing.
    pub fn update(&mut self, now: f64) -> Result<()> {
        self.drain_events(now);
        if let Some(animation) = &self.animation
            && now - animation.started_at >= self.timings.duration(animation.transition)
        {
            self.animation = None;
            match self.engine.complete_transition()? {
                Some(TransitionOutcome::Poured(pour)) if !pour.has_update() => {
                    debug!("Pour moved nothing")
                }
                Some(outcome) => debug!("Transition finished: {:?}", outcome),
                None => {}
            }
            self.drain_events(now);
        }
        if self.animation.is_none()
            && let Some(transition) = self.engine.phase().pending()
        {
            self.animation = Some(PendingAnimation {
                transition,
                started_at: now,
            });
        }
        Ok(())
    }

    fn drain_events(&mut self, now: f64) {
        for event in self.events.try_iter() {
            if event == PuzzleEvent::PuzzleWon {
                info!("Puzzle solved");
            }
            self.renderer.on_event(&event, now);
        }
    }

    pub fn render(&mut self, now: f64) {
        let frame = self.animation.as_ref().map(|animation| AnimationFrame {
            transition: animation.transition,
            progress: ((now - animation.started_at) / self.timings.duration(animation.transition))
                .clamp(0.0, 1.0) as f32,
        });
        self.renderer.render_game(self.engine.state(), frame, now);
    }
}
