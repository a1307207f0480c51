//! Camera frame slots
//!
//! The map shows live frames from at most five devices. A device keeps its
//! slot until released so its frame stays in the same tile.

/// Number of frame slots on the map page
pub const MAX_FRAME_SLOTS: usize = 5;

/// Fixed-size device to slot assignment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSlots {
    slots: [Option<String>; MAX_FRAME_SLOTS],
}

impl FrameSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for `device`: its current one, else the lowest free slot.
    /// `None` when every slot belongs to another device.
    pub fn assign(&mut self, device: &str) -> Option<usize> {
        if let Some(slot) = self.slot_of(device) {
            return Some(slot);
        }
        let slot = self.slots.iter().position(Option::is_none)?;
        self.slots[slot] = Some(device.to_string());
        Some(slot)
    }

    /// Free the slot held by `device`, returning it
    pub fn release(&mut self, device: &str) -> Option<usize> {
        let slot = self.slot_of(device)?;
        self.slots[slot] = None;
        Some(slot)
    }

    pub fn slot_of(&self, device: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.as_deref() == Some(device))
    }

    /// Occupied slots as `(slot, device)` pairs in slot order
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_deref().map(|device| (i, device)))
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}
