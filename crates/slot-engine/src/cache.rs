//! Memoize slot computations keyed by their complete input.
//!
//! Pages re-render far more often than their snapshot changes. Because
//! [`generate_slots`](crate::generator::generate_slots) is pure, a result can be
//! reused for as long as every input, `reference_now` included, is identical.

use std::collections::{HashMap, VecDeque};

use crate::error::Result;
use crate::generator::{SlotRequest, SlotSchedule};

pub const DEFAULT_CAPACITY: usize = 32;

/// Bounded memo of slot schedules; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct SlotCache {
    entries: HashMap<SlotRequest, SlotSchedule>,
    order: VecDeque<SlotRequest>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for SlotCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl SlotCache {
    /// A cache holding at most `capacity` schedules. Zero disables storage.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached schedule for `request`, computing it on a miss.
    ///
    /// Failed computations are not cached.
    pub fn get_or_generate(&mut self, request: &SlotRequest) -> Result<SlotSchedule> {
        if let Some(schedule) = self.entries.get(request) {
            self.hits += 1;
            return Ok(schedule.clone());
        }
        self.misses += 1;

        let schedule = request.generate()?;
        if self.capacity == 0 {
            return Ok(schedule);
        }
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(request.clone());
        self.entries.insert(request.clone(), schedule.clone());
        Ok(schedule)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
