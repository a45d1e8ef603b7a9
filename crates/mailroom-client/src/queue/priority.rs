/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Task priorities and queue scores.
//!
//! A task's score is its enqueue time in milliseconds plus its priority
//! offset, and mailroom pops the lowest score first. [`HIGH_PRIORITY`] is
//! ten million milliseconds, so a high priority task sorts ahead of every
//! default priority task in the same org queue that was queued less than
//! 10,000 seconds (about 2h46m) before it.

use chrono::{DateTime, Utc};

/// Score offset for high priority tasks.
pub const HIGH_PRIORITY: i64 = -10_000_000;

/// Score offset for default priority tasks.
pub const DEFAULT_PRIORITY: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Default,
}

impl Priority {
    pub fn offset(self) -> i64 {
        match self {
            Self::High => HIGH_PRIORITY,
            Self::Default => DEFAULT_PRIORITY,
        }
    }

    /// Score of a task with this priority queued at `now`.
    pub fn score_at(self, now: DateTime<Utc>) -> f64 {
        (now.timestamp_millis() + self.offset()) as f64
    }
}
