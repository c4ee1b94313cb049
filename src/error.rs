use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Container index {index} out of range, puzzle has {len} containers")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No valid layout found after {attempts} deals")]
    GenerationExhausted { attempts: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
    #[error("A transition is pending, no new moves are accepted")]
    TransitionPending,
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
