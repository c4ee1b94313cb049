use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PuzzleConfig;
use crate::error::{PuzzleError, Result};
use crate::generator::generate_layout;
use crate::state::PuzzleState;

/// Work the host must finish (usually an animation) before the engine accepts
/// new input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Pour { from: usize, to: usize },
    Rejection { index: usize },
    NewPuzzle,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum EnginePhase {
    #[default]
    Idle,
    AwaitingTransition(Transition),
}

impl EnginePhase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn pending(self) -> Option<Transition> {
        match self {
            Self::Idle => None,
            Self::AwaitingTransition(transition) => Some(transition),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Busy, or a click on an empty container with nothing selected.
    Ignored,
    Selected(usize),
    Deselected(usize),
    /// Legal pour accepted; applied by `complete_transition`.
    PourPending { from: usize, to: usize },
    /// Illegal pour. `cue` tells the host to show a rejection effect, in which
    /// case a `Rejection` transition is pending.
    Rejected { from: usize, to: usize, cue: bool },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct PourOutcome {
    pub moved: usize,
    pub completed_container: Option<usize>,
    pub won: bool,
}

impl PourOutcome {
    /// Whether any unit actually changed containers.
    pub const fn has_update(self) -> bool {
        self.moved > 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    Poured(PourOutcome),
    RejectionCleared,
    PuzzleStarted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PuzzleEvent {
    PuzzleStarted,
    SelectionChanged(Option<usize>),
    MoveApplied { from: usize, to: usize, moved: usize },
    ContainerCompleted(usize),
    PuzzleWon,
    InvalidMoveAttempted { from: usize, to: usize, rejection_cue: bool },
}

type Observer = Box<dyn FnMut(&PuzzleEvent) + Send>;

/// Owns one puzzle at a time: its layout, the pour source selection and the
/// transition guard that blocks input while the host is animating.
pub struct PuzzleEngine<R = StdRng> {
    config: PuzzleConfig,
    state: PuzzleState,
    rng: R,
    phase: EnginePhase,
    observers: Vec<Observer>,
}

impl PuzzleEngine<StdRng> {
    pub fn new(config: PuzzleConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn seeded(config: PuzzleConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_layout(config: PuzzleConfig, state: PuzzleState) -> Result<Self> {
        Self::with_layout(config, state, StdRng::from_os_rng())
    }
}

impl<R: Rng> PuzzleEngine<R> {
    pub fn with_rng(config: PuzzleConfig, mut rng: R) -> Result<Self> {
        let state = generate_layout(&config, &mut rng)?;
        Ok(Self {
            config,
            state,
            rng,
            phase: EnginePhase::Idle,
            observers: Vec::new(),
        })
    }

    /// Start from a fixed layout instead of a random deal. Later puzzles are
    /// generated from `rng`.
    pub fn with_layout(config: PuzzleConfig, state: PuzzleState, rng: R) -> Result<Self> {
        config.validate()?;
        state.validate(&config)?;
        Ok(Self {
            config,
            state,
            rng,
            phase: EnginePhase::Idle,
            observers: Vec::new(),
        })
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&PuzzleEvent) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        !self.phase.is_idle()
    }

    pub fn is_complete(&self, index: usize) -> Result<bool> {
        self.checked(self.state.is_complete(index))
    }

    pub fn check_win(&self) -> bool {
        self.state.check_win()
    }

    /// Replace the whole puzzle with a fresh deal.
    ///
    /// The deal keeps the current [`PuzzleConfig`]; build a new engine with
    /// [`PuzzleEngine::new`] to play a different shape.
    pub fn new_puzzle(&mut self) -> Result<&PuzzleState> {
        if self.is_busy() {
            return Err(PuzzleError::TransitionPending);
        }
        self.start_puzzle()?;
        Ok(&self.state)
    }

    pub fn can_pour(&self, from: usize, to: usize) -> Result<bool> {
        self.checked(self.state.can_pour(from, to))
    }

    /// An illegal pour worth a visible cue: both containers hold something, the
    /// target has room and the top colors differ.
    pub fn is_visible_mismatch(&self, from: usize, to: usize) -> Result<bool> {
        let source = self.checked(self.state.container(from))?;
        let target = self.checked(self.state.container(to))?;
        Ok(!source.is_empty()
            && !target.is_empty()
            && !target.is_full()
            && source.get_top_fluid() != target.get_top_fluid())
    }

    pub fn select_container(&mut self, index: usize) -> Result<SelectOutcome> {
        self.checked(self.state.check_index(index))?;
        if self.is_busy() {
            return Ok(SelectOutcome::Ignored);
        }

        let Some(from) = self.state.selected else {
            if self.state.containers[index].is_empty() {
                return Ok(SelectOutcome::Ignored);
            }
            self.state.selected = Some(index);
            self.emit(PuzzleEvent::SelectionChanged(Some(index)));
            return Ok(SelectOutcome::Selected(index));
        };

        self.state.selected = None;
        self.emit(PuzzleEvent::SelectionChanged(None));
        if from == index {
            return Ok(SelectOutcome::Deselected(index));
        }

        if self.state.can_pour(from, index)? {
            self.phase = EnginePhase::AwaitingTransition(Transition::Pour { from, to: index });
            return Ok(SelectOutcome::PourPending { from, to: index });
        }

        let cue = self.is_visible_mismatch(from, index)?;
        self.emit(PuzzleEvent::InvalidMoveAttempted {
            from,
            to: index,
            rejection_cue: cue,
        });
        if cue {
            self.phase = EnginePhase::AwaitingTransition(Transition::Rejection { index });
        }
        Ok(SelectOutcome::Rejected {
            from,
            to: index,
            cue,
        })
    }

    /// Pour immediately. An illegal pour is a no-op with `moved == 0`.
    pub fn pour(&mut self, from: usize, to: usize) -> Result<PourOutcome> {
        if self.is_busy() {
            return Err(PuzzleError::TransitionPending);
        }
        self.apply_pour(from, to)
    }

    /// Finish whatever the host was animating and return to accepting input.
    pub fn complete_transition(&mut self) -> Result<Option<TransitionOutcome>> {
        let Some(transition) = self.phase.pending() else {
            return Ok(None);
        };
        let outcome = match transition {
            Transition::Pour { from, to } => {
                self.phase = EnginePhase::Idle;
                TransitionOutcome::Poured(self.apply_pour(from, to)?)
            }
            Transition::Rejection { .. } => {
                self.phase = EnginePhase::Idle;
                TransitionOutcome::RejectionCleared
            }
            Transition::NewPuzzle => {
                self.start_puzzle()?;
                TransitionOutcome::PuzzleStarted
            }
        };
        Ok(Some(outcome))
    }

    fn apply_pour(&mut self, from: usize, to: usize) -> Result<PourOutcome> {
        if !self.can_pour(from, to)? {
            let rejection_cue = self.is_visible_mismatch(from, to)?;
            self.emit(PuzzleEvent::InvalidMoveAttempted {
                from,
                to,
                rejection_cue,
            });
            return Ok(PourOutcome::default());
        }

        let moved = self.state.pour(from, to)?;
        log::debug!("Poured {} unit(s) from {} to {}: {}", moved, from, to, self.state);
        if let Some(selected) = self.state.selected
            && self.state.containers[selected].is_empty()
        {
            self.state.selected = None;
            self.emit(PuzzleEvent::SelectionChanged(None));
        }
        self.emit(PuzzleEvent::MoveApplied { from, to, moved });

        let completed_container = self.state.containers[to].is_complete().then_some(to);
        if let Some(index) = completed_container {
            self.emit(PuzzleEvent::ContainerCompleted(index));
        }

        let won = self.state.check_win();
        if won {
            log::debug!("Puzzle won: {}", self.state);
            self.phase = EnginePhase::AwaitingTransition(Transition::NewPuzzle);
            self.emit(PuzzleEvent::PuzzleWon);
        }

        Ok(PourOutcome {
            moved,
            completed_container,
            won,
        })
    }

    fn start_puzzle(&mut self) -> Result<()> {
        self.state = generate_layout(&self.config, &mut self.rng)?;
        self.phase = EnginePhase::Idle;
        self.emit(PuzzleEvent::PuzzleStarted);
        Ok(())
    }

    fn emit(&mut self, event: PuzzleEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    fn checked<T>(&self, result: Result<T>) -> Result<T> {
        result.inspect_err(|err| log::warn!("{}", err))
    }
}
