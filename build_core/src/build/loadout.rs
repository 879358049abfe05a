//! Fixed-size slot loadouts for modifiers and moves

use crate::types::{MODIFIER_SLOTS, MOVE_SLOTS};

/// `N` slots, each holding an optional catalog index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loadout<const N: usize> {
    slots: [Option<usize>; N],
}

/// Four equipped modifiers (capsules)
pub type ModifierLoadout = Loadout<MODIFIER_SLOTS>;

/// Ten equipped moves
pub type MoveLoadout = Loadout<MOVE_SLOTS>;

impl<const N: usize> Default for Loadout<N> {
    fn default() -> Self {
        Loadout { slots: [None; N] }
    }
}

impl<const N: usize> Loadout<N> {
    pub const SLOTS: usize = N;

    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog index in `slot`; `None` for empty or out-of-range slots
    pub fn get(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied().flatten()
    }

    /// Put `index` into `slot`. Returns false if the slot does not exist.
    pub fn set(&mut self, slot: usize, index: Option<usize>) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = index;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, slot: usize) -> bool {
        self.set(slot, None)
    }

    pub fn reset(&mut self) {
        self.slots = [None; N];
    }

    pub fn slots(&self) -> &[Option<usize>; N] {
        &self.slots
    }

    /// Filled slots as `(slot, index)`, in slot order
    pub fn equipped(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, index)| index.map(|i| (slot, i)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
