//! Stacking Module
//!
//! Window z-order as a doubly linked list threaded through registry slot
//! indices. Bottom to top is paint order, top to bottom is hit-test order.

use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<usize>,
    next: Option<usize>,
    linked: bool,
}

/// Z-order over registry slots
#[derive(Debug)]
pub struct StackingOrder {
    links: Vec<Link>,
    bottom: Option<usize>,
    top: Option<usize>,
    len: usize,
}

impl StackingOrder {
    pub fn new(capacity: usize) -> Self {
        Self {
            links: vec![Link::default(); capacity],
            bottom: None,
            top: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn top(&self) -> Option<usize> {
        self.top
    }

    pub fn bottom(&self) -> Option<usize> {
        self.bottom
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.links.get(slot).is_some_and(|l| l.linked)
    }

    /// Append above everything else
    pub fn push_top(&mut self, slot: usize) {
        if slot >= self.links.len() || self.links[slot].linked {
            return;
        }
        self.links[slot] = Link {
            prev: self.top,
            next: None,
            linked: true,
        };
        match self.top {
            Some(old) => self.links[old].next = Some(slot),
            None => self.bottom = Some(slot),
        }
        self.top = Some(slot);
        self.len += 1;
    }

    /// Insert below everything else
    pub fn push_bottom(&mut self, slot: usize) {
        if slot >= self.links.len() || self.links[slot].linked {
            return;
        }
        self.links[slot] = Link {
            prev: None,
            next: self.bottom,
            linked: true,
        };
        match self.bottom {
            Some(old) => self.links[old].prev = Some(slot),
            None => self.top = Some(slot),
        }
        self.bottom = Some(slot);
        self.len += 1;
    }

    /// Detach `slot`, joining its neighbours. Returns false if it was not in
    /// the list.
    pub fn unlink(&mut self, slot: usize) -> bool {
        if !self.contains(slot) {
            return false;
        }
        let Link { prev, next, .. } = self.links[slot];
        match prev {
            Some(p) => self.links[p].next = next,
            None => self.bottom = next,
        }
        match next {
            Some(n) => self.links[n].prev = prev,
            None => self.top = prev,
        }
        self.links[slot] = Link::default();
        self.len -= 1;
        true
    }

    /// Detach and re-append at the top; no-op if already there
    pub fn raise(&mut self, slot: usize) {
        if self.top == Some(slot) || !self.contains(slot) {
            return;
        }
        trace!("Raising slot {}", slot);
        self.unlink(slot);
        self.push_top(slot);
    }

    /// Detach and re-insert at the bottom; no-op if already there
    pub fn lower(&mut self, slot: usize) {
        if self.bottom == Some(slot) || !self.contains(slot) {
            return;
        }
        trace!("Lowering slot {}", slot);
        self.unlink(slot);
        self.push_bottom(slot);
    }

    pub fn iter_bottom_to_top(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.bottom, move |&s| self.links[s].next)
    }

    pub fn iter_top_to_bottom(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.top, move |&s| self.links[s].prev)
    }
}
