// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded in-memory log ring, one per tenant.

use std::collections::VecDeque;

/// Default line capacity for a tenant's ring.
pub const LOG_CAPACITY: usize = 1000;

/// Fixed-capacity FIFO of timestamped log lines.
///
/// Lives only as long as the tenant entry; stopping a session discards it.
#[derive(Debug)]
pub struct LogRing {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a line, evicting the oldest once at capacity.
    ///
    /// Returns the stored form (timestamp prefix included) so the caller
    /// can forward the same line to observers.
    pub fn push(&mut self, line: &str) -> String {
        let stamped = format!("[{}] {line}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"));
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(stamped.clone());
        stamped
    }

    /// Oldest-first copy of the buffer.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for LogRing {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}
