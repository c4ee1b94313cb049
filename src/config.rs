use crate::error::{PuzzleError, Result};

pub const DEFAULT_PALETTE_SIZE: usize = 5;
pub const DEFAULT_CAPACITY: usize = 4;
pub const DEFAULT_EXTRA_EMPTY_CONTAINERS: usize = 2;

/// Shape of a puzzle: how many colors, how deep each container is and how many
/// containers start out empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    pub palette_size: usize,
    pub capacity: usize,
    pub extra_empty_containers: usize,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE_SIZE,
            capacity: DEFAULT_CAPACITY,
            extra_empty_containers: DEFAULT_EXTRA_EMPTY_CONTAINERS,
        }
    }
}

impl PuzzleConfig {
    pub fn new(palette_size: usize, capacity: usize, extra_empty_containers: usize) -> Result<Self> {
        let config = Self {
            palette_size,
            capacity,
            extra_empty_containers,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.palette_size < 2 {
            return Err(PuzzleError::InvalidConfig(format!(
                "palette size must be at least 2, got {}",
                self.palette_size
            )));
        }
        // A single-unit container is complete as soon as it holds anything.
        if self.capacity < 2 {
            return Err(PuzzleError::InvalidConfig(format!(
                "capacity must be at least 2, got {}",
                self.capacity
            )));
        }
        if self.palette_size.checked_mul(self.capacity).is_none() {
            return Err(PuzzleError::InvalidConfig(format!(
                "{} colors of {} units each is too many",
                self.palette_size, self.capacity
            )));
        }
        if self
            .palette_size
            .checked_add(self.extra_empty_containers)
            .is_none()
        {
            return Err(PuzzleError::InvalidConfig(format!(
                "{} colors plus {} empty containers is too many",
                self.palette_size, self.extra_empty_containers
            )));
        }
        Ok(())
    }

    pub fn container_count(&self) -> usize {
        self.palette_size + self.extra_empty_containers
    }

    pub fn total_units(&self) -> usize {
        self.palette_size * self.capacity
    }
}
