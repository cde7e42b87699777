//! Window Registry
//!
//! Fixed-capacity pool of window records. Slots are reused after a destroy,
//! ids never are: a stale [`WindowId`] simply stops resolving.

use std::collections::HashMap;

use crate::error::WmError;
use crate::event::WindowId;
use crate::wm::client::Window;

pub struct WindowRegistry {
    slots: Vec<Option<Window>>,
    index: HashMap<WindowId, usize>,
    next_id: u32,
}

impl WindowRegistry {
    /// Create an empty registry with room for `capacity` windows
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            index: HashMap::with_capacity(capacity),
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Reserve a slot and the next id. Nothing is stored until
    /// [`WindowRegistry::insert`] is called with the built record.
    pub fn allocate(&mut self) -> Result<(usize, WindowId), WmError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(WmError::RegistryFull {
                capacity: self.slots.len(),
            })?;
        let id = WindowId(self.next_id);
        self.next_id += 1;
        Ok((slot, id))
    }

    pub fn insert(&mut self, slot: usize, window: Window) {
        self.index.insert(window.id, slot);
        self.slots[slot] = Some(window);
    }

    /// Take a record out of the pool, freeing its slot
    pub fn remove(&mut self, id: WindowId) -> Option<(usize, Window)> {
        let slot = self.index.remove(&id)?;
        self.slots[slot].take().map(|w| (slot, w))
    }

    pub fn slot_of(&self, id: WindowId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.slot_of(id).and_then(|slot| self.at(slot))
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        let slot = self.slot_of(id)?;
        self.at_mut(slot)
    }

    pub fn at(&self, slot: usize) -> Option<&Window> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn at_mut(&mut self, slot: usize) -> Option<&mut Window> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Rect;
    use crate::wm::client_flags::WindowFlags;
    use crate::wm::decorations::DecorationMetrics;

    fn build(reg: &mut WindowRegistry) -> Result<WindowId, WmError> {
        let (slot, id) = reg.allocate()?;
        let window = Window::new(
            id,
            "w",
            Rect::new(0, 0, 40, 40),
            WindowFlags::normal(),
            0,
            &DecorationMetrics::default(),
        )?;
        reg.insert(slot, window);
        Ok(id)
    }

    #[test]
    fn ids_are_monotonic_and_not_reused() {
        let mut reg = WindowRegistry::new(2);
        let a = build(&mut reg).unwrap();
        let b = build(&mut reg).unwrap();
        assert_eq!((a, b), (WindowId(1), WindowId(2)));

        assert!(reg.remove(a).is_some());
        let c = build(&mut reg).unwrap();
        assert_eq!(c, WindowId(3));
        assert_eq!(reg.slot_of(c), Some(0));
        assert!(reg.get(a).is_none());
    }

    #[test]
    fn full_registry_rejects_allocation() {
        let mut reg = WindowRegistry::new(1);
        build(&mut reg).unwrap();
        assert_eq!(build(&mut reg), Err(WmError::RegistryFull { capacity: 1 }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn removing_unknown_id_is_noop() {
        let mut reg = WindowRegistry::new(1);
        assert!(reg.remove(WindowId(9)).is_none());
        assert!(reg.is_empty());
    }
}
