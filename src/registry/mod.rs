//! Fixed-capacity slot table of live buttons.
//!
//! Handles are `(index, generation)` pairs. Unregistering bumps the slot's
//! generation, so a handle kept past its button's lifetime is rejected even
//! after the slot is reused. A slot whose generation is exhausted is retired
//! for good rather than wrapping back to a value an old handle may still hold.

use core::fmt;

use heapless::Vec;

use crate::button::{Button, ButtonSnapshot};
use crate::types::{ButtonHandle, SourceId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryError {
    Duplicate(SourceId),
    Full,
    UnknownHandle(ButtonHandle),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(id) => write!(f, "input source {id} is already registered"),
            Self::Full => f.write_str("button registry is full"),
            Self::UnknownHandle(handle) => write!(f, "no live button for handle {handle}"),
        }
    }
}

struct Slot<'a> {
    generation: u16,
    retired: bool,
    button: Option<Button<'a>>,
}

impl Slot<'_> {
    fn is_free(&self) -> bool {
        !self.retired && self.button.is_none()
    }
}

pub struct Registry<'a, const N: usize> {
    slots: Vec<Slot<'a>, N>,
}

impl<'a, const N: usize> Default for Registry<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> Registry<'a, N> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn insert(&mut self, button: Button<'a>) -> Result<ButtonHandle, RegistryError> {
        let source_id = button.source_id();
        if self.iter().any(|(_, live)| live.source_id() == source_id) {
            return Err(RegistryError::Duplicate(source_id));
        }

        if let Some(index) = self.slots.iter().position(|slot| slot.is_free()) {
            let slot = &mut self.slots[index];
            slot.button = Some(button);
            return Ok(ButtonHandle {
                index: index as u16,
                generation: slot.generation,
            });
        }

        let index = u16::try_from(self.slots.len()).map_err(|_| RegistryError::Full)?;
        self.slots
            .push(Slot {
                generation: 0,
                retired: false,
                button: Some(button),
            })
            .map_err(|_| RegistryError::Full)?;
        Ok(ButtonHandle {
            index,
            generation: 0,
        })
    }

    pub(crate) fn remove(&mut self, handle: ButtonHandle) -> Result<Button<'a>, RegistryError> {
        let slot = self
            .slots
            .get_mut(usize::from(handle.index))
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(RegistryError::UnknownHandle(handle))?;
        let button = slot
            .button
            .take()
            .ok_or(RegistryError::UnknownHandle(handle))?;
        match slot.generation.checked_add(1) {
            Some(next) => slot.generation = next,
            None => slot.retired = true,
        }
        Ok(button)
    }

    pub(crate) fn get(&self, handle: ButtonHandle) -> Option<&Button<'a>> {
        self.slots
            .get(usize::from(handle.index))
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.button.as_ref())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ButtonHandle, &Button<'a>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let button = slot.button.as_ref()?;
            Some((handle_at(index, slot.generation), button))
        })
    }

    pub(crate) fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (ButtonHandle, &mut Button<'a>)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            let button = slot.button.as_mut()?;
            Some((handle_at(index, generation), button))
        })
    }

    pub fn contains(&self, handle: ButtonHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn handles(&self) -> impl Iterator<Item = ButtonHandle> + '_ {
        self.iter().map(|(handle, _)| handle)
    }

    pub fn snapshot(&self, handle: ButtonHandle) -> Option<ButtonSnapshot> {
        self.get(handle).map(|button| button.snapshot(handle))
    }

    pub fn snapshots(&self) -> impl Iterator<Item = ButtonSnapshot> + '_ {
        self.iter().map(|(handle, button)| button.snapshot(handle))
    }

    /// Live buttons.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

// Indices always fit: `insert` refuses to grow past `u16::MAX` slots.
fn handle_at(index: usize, generation: u16) -> ButtonHandle {
    ButtonHandle {
        index: index as u16,
        generation,
    }
}

#[cfg(test)]
mod tests;
