//! Input sources
//!
//! The keyboard and mouse drivers live outside this crate. Whatever polls
//! them implements [`InputSource`] and pushes normalized [`Event`]s into the
//! queue. `ScriptedInput` replays a recorded session from JSON lines, one
//! event per line, and drives the headless binary and the tests.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, trace};

use crate::event::{Event, EventQueue};

/// Producer side of the event queue
pub trait InputSource {
    /// Move any pending device input into `queue`; returns how many events
    /// were accepted
    fn poll(&mut self, queue: &mut EventQueue) -> usize;

    /// True once the source will never produce another event
    fn exhausted(&self) -> bool {
        false
    }
}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn poll(&mut self, queue: &mut EventQueue) -> usize {
        (**self).poll(queue)
    }

    fn exhausted(&self) -> bool {
        (**self).exhausted()
    }
}

/// A source that never produces anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _queue: &mut EventQueue) -> usize {
        0
    }

    fn exhausted(&self) -> bool {
        true
    }
}

/// Replays pre-recorded events, a few per poll like a real device would
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    pending: VecDeque<Event>,
    per_poll: usize,
    dropped: usize,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = Event>, per_poll: usize) -> Self {
        Self {
            pending: events.into_iter().collect(),
            per_poll: per_poll.max(1),
            dropped: 0,
        }
    }

    /// Parse JSON lines; blank lines and lines starting with `#` are skipped
    pub fn parse(script: &str, per_poll: usize) -> Result<Self> {
        let mut events = Vec::new();
        for (lineno, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let event: Event = serde_json::from_str(line)
                .with_context(|| format!("Invalid event on script line {}", lineno + 1))?;
            events.push(event);
        }
        debug!("Parsed {} scripted events", events.len());
        Ok(Self::new(events, per_poll))
    }

    pub fn load(path: &Path, per_poll: usize) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input script {:?}", path))?;
        let script = Self::parse(&content, per_poll)?;
        info!("Loaded input script {:?} ({} events)", path, script.remaining());
        Ok(script)
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Events the queue refused
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, queue: &mut EventQueue) -> usize {
        let mut accepted = 0;
        for _ in 0..self.per_poll {
            let Some(event) = self.pending.pop_front() else {
                break;
            };
            if queue.push(event) {
                accepted += 1;
            } else {
                self.dropped += 1;
                trace!("Scripted event dropped by full queue");
            }
        }
        accepted
    }

    fn exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}
