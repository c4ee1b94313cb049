use std::collections::BTreeMap;
use std::fmt;

use crate::config::PuzzleConfig;
use crate::error::{PuzzleError, Result};
use crate::model::{FluidColor, FluidContainer};

pub const CONTAINER_SEPARATOR: &str = "|";

/// Contents of every container plus the current pour source, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleState {
    pub(crate) containers: Vec<FluidContainer>,
    pub(crate) selected: Option<usize>,
}

impl PuzzleState {
    pub fn new(containers: Vec<FluidContainer>) -> Self {
        Self {
            containers,
            selected: None,
        }
    }

    /// Parse a layout such as `AB|BA|` (one segment per container, an empty
    /// segment is an empty container).
    pub fn from_repr(repr: &str, capacity: usize) -> Result<Self> {
        let containers = repr
            .trim()
            .split(CONTAINER_SEPARATOR)
            .map(|segment| FluidContainer::from_repr(segment, capacity))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(containers))
    }

    pub fn containers(&self) -> &[FluidContainer] {
        &self.containers
    }

    pub fn container(&self, index: usize) -> Result<&FluidContainer> {
        self.containers.get(index).ok_or(PuzzleError::IndexOutOfRange {
            index,
            len: self.containers.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn check_index(&self, index: usize) -> Result<usize> {
        if index < self.containers.len() {
            Ok(index)
        } else {
            Err(PuzzleError::IndexOutOfRange {
                index,
                len: self.containers.len(),
            })
        }
    }

    pub fn is_complete(&self, index: usize) -> Result<bool> {
        Ok(self.container(index)?.is_complete())
    }

    /// Every container is either empty or complete.
    pub fn check_win(&self) -> bool {
        self.containers
            .iter()
            .all(|c| c.is_empty() || c.is_complete())
    }

    pub fn can_pour(&self, from: usize, to: usize) -> Result<bool> {
        let source = self.container(from)?;
        let target = self.container(to)?;
        if from == to {
            return Ok(false);
        }
        Ok(source.could_pour_into(target))
    }

    /// Pour the top run of `from` into `to`. Illegal pours move nothing.
    pub(crate) fn pour(&mut self, from: usize, to: usize) -> Result<usize> {
        if !self.can_pour(from, to)? {
            return Ok(0);
        }
        let (source, target) = if from < to {
            let (left, right) = self.containers.split_at_mut(to);
            (&mut left[from], &mut right[0])
        } else {
            let (left, right) = self.containers.split_at_mut(from);
            (&mut right[0], &mut left[to])
        };
        Ok(source.pour_into(target))
    }

    pub fn color_counts(&self) -> BTreeMap<FluidColor, usize> {
        let mut counts = BTreeMap::new();
        for packet in self.containers.iter().flat_map(|c| c.get_packets()) {
            *counts.entry(*packet).or_insert(0) += 1;
        }
        counts
    }

    /// Each palette color appears exactly `capacity` times and nothing else appears.
    pub fn is_conserved(&self, config: &PuzzleConfig) -> bool {
        let counts = self.color_counts();
        counts.len() == config.palette_size
            && (0..config.palette_size).all(|id| {
                counts.get(&FluidColor::new(id)) == Some(&config.capacity)
            })
    }

    /// Checks a layout against a configuration before an engine adopts it.
    pub fn validate(&self, config: &PuzzleConfig) -> Result<()> {
        if self.containers.len() != config.container_count() {
            return Err(PuzzleError::InvalidLayout(format!(
                "expected {} containers, found {}",
                config.container_count(),
                self.containers.len()
            )));
        }
        if let Some(c) = self
            .containers
            .iter()
            .find(|c| c.get_capacity() != config.capacity)
        {
            return Err(PuzzleError::InvalidLayout(format!(
                "container '{}' has capacity {}, expected {}",
                c,
                c.get_capacity(),
                config.capacity
            )));
        }
        if !self.is_conserved(config) {
            return Err(PuzzleError::InvalidLayout(format!(
                "every one of the {} colors must appear exactly {} times",
                config.palette_size, config.capacity
            )));
        }
        if let Some(selected) = self.selected
            && self.container(selected)?.is_empty()
        {
            return Err(PuzzleError::InvalidLayout(
                "selected container is empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_text_representation(&self) -> String {
        self.containers
            .iter()
            .map(FluidContainer::get_text_representation)
            .collect::<Vec<_>>()
            .join(CONTAINER_SEPARATOR)
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_text_representation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> PuzzleConfig {
        PuzzleConfig::new(2, 2, 1).unwrap()
    }

    #[test]
    fn repr_keeps_empty_containers() {
        let state = PuzzleState::from_repr("AB|BA|", 2).unwrap();
        assert_eq!(state.len(), 3);
        assert!(state.containers()[2].is_empty());
        assert_eq!(state.to_string(), "AB|BA|");
    }

    #[test]
    fn win_requires_every_container_empty_or_complete() {
        assert!(PuzzleState::from_repr("AAAA|BBBB||", 4).unwrap().check_win());
        assert!(PuzzleState::from_repr("||", 4).unwrap().check_win());
        assert!(!PuzzleState::from_repr("AAA|BBBB|A|", 4).unwrap().check_win());
        assert!(!PuzzleState::from_repr("AABB|BBAA||", 4).unwrap().check_win());
    }

    #[test]
    fn pour_between_any_index_order() {
        let mut state = PuzzleState::from_repr("AB|BA|", 2).unwrap();
        assert_eq!(state.pour(0, 2).unwrap(), 1);
        assert_eq!(state.to_string(), "A|BA|B");
        assert_eq!(state.pour(2, 0).unwrap(), 0);
        assert_eq!(state.pour(1, 0).unwrap(), 1);
        assert_eq!(state.to_string(), "AA|B|B");
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let state = PuzzleState::from_repr("AB|BA|", 2).unwrap();
        assert_eq!(
            state.can_pour(0, 3),
            Err(PuzzleError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(state.is_complete(7).is_err());
    }

    #[test]
    fn conservation_counts_every_color() {
        let config = small_config();
        let state = PuzzleState::from_repr("AB|BA|", 2).unwrap();
        assert!(state.is_conserved(&config));
        assert!(state.validate(&config).is_ok());

        let short = PuzzleState::from_repr("AB|B|", 2).unwrap();
        assert!(!short.is_conserved(&config));
        assert!(matches!(
            short.validate(&config),
            Err(PuzzleError::InvalidLayout(_))
        ));

        let foreign = PuzzleState::from_repr("AB|BC|", 2).unwrap();
        assert!(!foreign.is_conserved(&config));
    }

    #[test]
    fn wrong_container_count_is_rejected() {
        let state = PuzzleState::from_repr("AB|BA", 2).unwrap();
        assert!(state.validate(&small_config()).is_err());
    }
}
