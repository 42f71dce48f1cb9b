//! Ordered list of scheduled segments
//!
//! Position in the list is render order and also selects the runtime slot.
//! Removal leaves a hole instead of compacting, so the remaining segments
//! keep their runtime state.

use super::SegmentError;

/// Active-segment index with `N` positions
#[derive(Debug, Clone)]
pub struct ActiveSegments<const N: usize> {
    slots: [Option<u8>; N],
}

impl<const N: usize> Default for ActiveSegments<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ActiveSegments<N> {
    pub const fn new() -> Self {
        Self { slots: [None; N] }
    }

    /// Position of `segment` in the list
    pub fn position(&self, segment: u8) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(segment))
    }

    pub fn contains(&self, segment: u8) -> bool {
        self.position(segment).is_some()
    }

    /// Insert at the first free position
    ///
    /// Returns the position taken.
    pub fn add(&mut self, segment: u8) -> Result<usize, SegmentError> {
        if self.contains(segment) {
            return Err(SegmentError::AlreadyActive);
        }
        let position = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(SegmentError::ActiveIndexFull)?;
        self.slots[position] = Some(segment);
        Ok(position)
    }

    /// Clear the entry of `segment`
    ///
    /// Returns the position that was freed.
    pub fn remove(&mut self, segment: u8) -> Result<usize, SegmentError> {
        let position = self.position(segment).ok_or(SegmentError::NotActive)?;
        self.slots[position] = None;
        Ok(position)
    }

    /// Put `new` in place of `old` without changing render order
    pub fn swap(&mut self, old: u8, new: u8) -> Result<usize, SegmentError> {
        if self.contains(new) {
            return Err(SegmentError::AlreadyActive);
        }
        let position = self.position(old).ok_or(SegmentError::NotActive)?;
        self.slots[position] = Some(new);
        Ok(position)
    }

    pub fn clear(&mut self) {
        self.slots = [None; N];
    }

    /// Number of occupied positions
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// `(position, segment)` pairs in render order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(position, slot)| slot.map(|segment| (position, segment)))
    }

    /// Raw list including empty positions
    pub fn as_slice(&self) -> &[Option<u8>] {
        &self.slots
    }
}
