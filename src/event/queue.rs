//! Bounded FIFO between device polling and dispatch
//!
//! A fixed ring of [`EVENT_QUEUE_CAPACITY`] slots. A full queue drops the
//! incoming event rather than blocking the producer: under load the newest
//! input is the one that gets lost.

use tracing::trace;

use super::Event;
use crate::input::InputSource;

pub const EVENT_QUEUE_CAPACITY: usize = 64;

pub struct EventQueue {
    slots: [Option<Event>; EVENT_QUEUE_CAPACITY],
    head: usize,
    len: usize,
    dropped: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            slots: [None; EVENT_QUEUE_CAPACITY],
            head: 0,
            len: 0,
            dropped: 0,
        }
    }

    /// Enqueue at the tail. Returns `false` (and drops the event) when full.
    pub fn push(&mut self, event: Event) -> bool {
        if self.len == EVENT_QUEUE_CAPACITY {
            self.dropped += 1;
            trace!("Event queue full, dropping {:?}", event.kind);
            return false;
        }
        let tail = (self.head + self.len) % EVENT_QUEUE_CAPACITY;
        self.slots[tail] = Some(event);
        self.len += 1;
        true
    }

    /// Dequeue from the head without waiting
    pub fn poll(&mut self) -> Option<Event> {
        if self.len == 0 {
            return None;
        }
        let event = self.slots[self.head].take();
        self.head = (self.head + 1) % EVENT_QUEUE_CAPACITY;
        self.len -= 1;
        event
    }

    /// Look at the head without removing it
    pub fn peek(&self) -> Option<&Event> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Cooperative wait: keep draining `source` until an event shows up.
    ///
    /// There is nothing to suspend on, so this spins. `idle` runs after
    /// every empty poll and returns `false` to give up, in which case
    /// `None` is returned.
    pub fn wait<S, F>(&mut self, source: &mut S, mut idle: F) -> Option<Event>
    where
        S: InputSource + ?Sized,
        F: FnMut() -> bool,
    {
        loop {
            if let Some(event) = self.poll() {
                return Some(event);
            }
            source.poll(self);
            if self.is_empty() && !idle() {
                return None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; EVENT_QUEUE_CAPACITY];
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == EVENT_QUEUE_CAPACITY
    }

    /// Events rejected because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
