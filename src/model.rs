use std::fmt;

use crate::error::{PuzzleError, Result};

/// Opaque color identifier. Rendered as letters: A..Z, then AA, AB, ...
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct FluidColor(usize);

impl FluidColor {
    pub const fn new(color_id: usize) -> Self {
        FluidColor(color_id)
    }

    pub fn from_repr(repr: &str) -> Option<Self> {
        let s = repr.trim();
        if s.is_empty() {
            return None;
        }
        Self::letters_to_color_id(s).map(FluidColor)
    }

    /// Convert a single letter (A-Z) into a 0-based id.
    pub fn letter_to_color_id(ch: char) -> Option<usize> {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let up = ch.to_ascii_uppercase();
        Some((up as u8 - b'A') as usize)
    }

    /// Excel-style base-26 numbering: A=0, B=1, ..., Z=25, AA=26, AB=27, ...
    fn letters_to_color_id(s: &str) -> Option<usize> {
        let mut acc: usize = 0;
        for ch in s.chars() {
            let digit = Self::letter_to_color_id(ch)?;
            acc = acc.checked_mul(26)?.checked_add(digit + 1)?;
        }
        acc.checked_sub(1)
    }

    pub fn get_color_id(&self) -> usize {
        self.0
    }

    pub fn get_letter_representation(&self) -> String {
        let mut chars = Vec::new();
        let mut id = self.0 + 1;
        while id > 0 {
            let rem = (id - 1) % 26;
            chars.push((b'A' + rem as u8) as char);
            id = (id - 1) / 26;
        }
        chars.iter().rev().collect()
    }
}

impl fmt::Display for FluidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_letter_representation())
    }
}

/// A stack of color units, bottom first. Units only enter and leave at the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FluidContainer {
    packets: Vec<FluidColor>,
    capacity: usize,
}

impl FluidContainer {
    pub fn new(capacity: usize) -> Self {
        Self {
            packets: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn with_fluids(capacity: usize, packets: Vec<FluidColor>) -> Result<Self> {
        if packets.len() > capacity {
            return Err(PuzzleError::InvalidLayout(format!(
                "{} units do not fit a container of capacity {}",
                packets.len(),
                capacity
            )));
        }
        Ok(Self { packets, capacity })
    }

    /// Parse letters bottom to top, e.g. `ABBA`, or `A,AB,C` when labels are
    /// longer than one letter.
    pub fn from_repr(repr: &str, capacity: usize) -> Result<Self> {
        let repr = repr.trim();
        let tokens: Vec<String> = if repr.is_empty() {
            Vec::new()
        } else if repr.contains(',') {
            repr.split(',').map(str::to_string).collect()
        } else {
            repr.chars().map(|ch| ch.to_string()).collect()
        };
        let mut packets = Vec::with_capacity(tokens.len());
        for token in &tokens {
            let packet = FluidColor::from_repr(token).ok_or_else(|| {
                PuzzleError::InvalidLayout(format!("'{}' is not a color label", token.trim()))
            })?;
            packets.push(packet);
        }
        Self::with_fluids(capacity, packets)
    }

    /// Place a unit on top regardless of the color below. Fails when full.
    pub fn add_fluid(&mut self, packet: FluidColor) -> bool {
        if self.is_full() {
            return false;
        }
        self.packets.push(packet);
        true
    }

    /// Place a unit on top only if it matches the current top color.
    pub fn push_fluid(&mut self, packet: FluidColor) -> bool {
        if self.is_empty() || self.get_top_fluid() == Some(packet) {
            return self.add_fluid(packet);
        }
        false
    }

    pub fn pop_fluid(&mut self) -> Option<FluidColor> {
        self.packets.pop()
    }

    pub fn is_full(&self) -> bool {
        self.packets.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn get_empty_space(&self) -> usize {
        self.capacity.saturating_sub(self.packets.len())
    }

    pub fn get_capacity(&self) -> usize {
        self.capacity
    }

    pub fn get_filled_amount(&self) -> usize {
        self.packets.len()
    }

    pub fn get_top_fluid(&self) -> Option<FluidColor> {
        self.packets.last().copied()
    }

    /// Length of the run of identical units at the top.
    pub fn get_top_fluid_depth(&self) -> usize {
        let Some(top) = self.get_top_fluid() else {
            return 0;
        };
        self.packets
            .iter()
            .rev()
            .take_while(|&&packet| packet == top)
            .count()
    }

    pub fn get_packets(&self) -> &[FluidColor] {
        &self.packets
    }

    /// Full, and every unit the same color as the bottom one.
    pub fn is_complete(&self) -> bool {
        match self.packets.first() {
            Some(first) => {
                self.packets.len() == self.capacity && self.packets.iter().all(|p| p == first)
            }
            None => false,
        }
    }

    pub fn get_pourable_amount(&self, other: &FluidContainer) -> usize {
        if self.is_empty() {
            return 0;
        }
        if !other.is_empty() && self.get_top_fluid() != other.get_top_fluid() {
            return 0;
        }
        let depth = self.get_top_fluid_depth();
        let space = other.get_empty_space();
        depth.min(space)
    }

    pub fn could_pour_into(&self, other: &FluidContainer) -> bool {
        self.get_pourable_amount(other) > 0
    }

    /// Move the top run into `other`, one unit at a time, up to its free space.
    /// Returns how many units moved.
    pub fn pour_into(&mut self, other: &mut FluidContainer) -> usize {
        let transfer_amount = self.get_pourable_amount(other);
        let mut moved = 0;
        for _ in 0..transfer_amount {
            let Some(packet) = self.pop_fluid() else {
                break;
            };
            if !other.push_fluid(packet) {
                self.packets.push(packet);
                break;
            }
            moved += 1;
        }
        moved
    }

    pub fn get_text_representation(&self) -> String {
        let repr: Vec<String> = self
            .packets
            .iter()
            .map(FluidColor::get_letter_representation)
            .collect();
        let has_multi_char = repr.iter().any(|s| s.len() > 1);
        let separator = if has_multi_char { "," } else { "" };
        repr.join(separator)
    }
}

impl fmt::Display for FluidContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_text_representation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(repr: &str) -> FluidContainer {
        FluidContainer::from_repr(repr, 4).unwrap()
    }

    #[test]
    fn letters_map_to_ids_and_back() {
        assert_eq!(FluidColor::from_repr("A"), Some(FluidColor::new(0)));
        assert_eq!(FluidColor::from_repr("z"), Some(FluidColor::new(25)));
        assert_eq!(FluidColor::from_repr("AA"), Some(FluidColor::new(26)));
        assert_eq!(FluidColor::from_repr("AB"), Some(FluidColor::new(27)));
        assert_eq!(FluidColor::from_repr("."), None);
        assert_eq!(FluidColor::new(27).get_letter_representation(), "AB");
        assert_eq!(FluidColor::new(4).to_string(), "E");
    }

    #[test]
    fn top_run_stops_at_first_different_color() {
        assert_eq!(container("").get_top_fluid_depth(), 0);
        assert_eq!(container("ABBB").get_top_fluid_depth(), 3);
        assert_eq!(container("BBAB").get_top_fluid_depth(), 1);
        assert_eq!(container("CCCC").get_top_fluid_depth(), 4);
    }

    #[test]
    fn completeness_needs_full_uniform_container() {
        assert!(container("CCCC").is_complete());
        assert!(!container("CCC").is_complete());
        assert!(!container("CCCA").is_complete());
        assert!(!container("").is_complete());
    }

    #[test]
    fn run_moves_into_empty_container() {
        let mut from = container("CBBB");
        let mut to = container("");
        assert!(from.could_pour_into(&to));
        assert_eq!(from.pour_into(&mut to), 3);
        assert_eq!(from, container("C"));
        assert_eq!(to, container("BBB"));
    }

    #[test]
    fn pour_is_limited_by_free_space() {
        let mut from = container("ABBB");
        let mut to = container("CCB");
        assert_eq!(from.get_pourable_amount(&to), 1);
        assert_eq!(from.pour_into(&mut to), 1);
        assert_eq!(from, container("ABB"));
        assert_eq!(to, container("CCBB"));
    }

    #[test]
    fn mismatched_or_full_targets_take_nothing() {
        let mut from = container("AB");
        let mut to = container("BA");
        assert!(!from.could_pour_into(&to));
        assert_eq!(from.pour_into(&mut to), 0);
        assert_eq!(from, container("AB"));

        let full = container("ABBB");
        assert!(!container("B").could_pour_into(&full));
        assert!(!container("").could_pour_into(&container("")));
    }

    #[test]
    fn overfilled_repr_is_rejected() {
        assert!(matches!(
            FluidContainer::from_repr("AAAAA", 4),
            Err(PuzzleError::InvalidLayout(_))
        ));
        assert!(matches!(
            FluidContainer::from_repr("A1", 4),
            Err(PuzzleError::InvalidLayout(_))
        ));
    }

    #[test]
    fn multi_letter_labels_use_commas() {
        let c = FluidContainer::from_repr("A,AB,AB", 4).unwrap();
        assert_eq!(c.get_top_fluid(), Some(FluidColor::new(27)));
        assert_eq!(c.get_text_representation(), "A,AB,AB");
        assert_eq!(container("ABC").get_text_representation(), "ABC");
    }
}
