//! Puzzle-state engine for a liquid sort game: containers hold stacks of
//! colored units and the player pours same-colored runs between them until
//! every non-empty container is full with one color.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod model;
pub mod state;

pub use config::PuzzleConfig;
pub use engine::{
    EnginePhase, PourOutcome, PuzzleEngine, PuzzleEvent, SelectOutcome, Transition,
    TransitionOutcome,
};
pub use error::{PuzzleError, Result};
pub use model::{FluidColor, FluidContainer};
pub use state::PuzzleState;
