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

//! In-process [`QueueBackend`] with Redis sorted-set semantics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::backend::{QueueBackend, SortedSetOp};
use crate::error::QueueError;

type SortedSets = HashMap<String, HashMap<String, f64>>;

/// Sorted sets held in memory.
///
/// Commits are staged on a copy and swapped in only when every operation
/// applied, so an injected failure leaves the store untouched. Every call
/// through [`QueueBackend`] counts toward [`MemoryBackend::call_count`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sets: Mutex<SortedSets>,
    fail_at_op: Mutex<Option<usize>>,
    calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next commit fail after applying `op_index` of its
    /// operations to the staging copy.
    pub fn fail_next_commit_at(&self, op_index: usize) {
        *self.fail_at_op.lock() = Some(op_index);
    }

    /// Makes the next commit fail before applying anything.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit_at(0);
    }

    /// Number of backend calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn score(&self, key: &str, member: &str) -> Option<f64> {
        self.sets.lock().get(key).and_then(|set| set.get(member)).copied()
    }

    /// Removes and returns the lowest scored member of `key`, like `ZPOPMIN`.
    pub fn pop_min(&self, key: &str) -> Option<(String, f64)> {
        let mut sets = self.sets.lock();
        let set = sets.get_mut(key)?;
        let (member, score) = sorted(set).into_iter().next()?;
        set.remove(&member);
        if set.is_empty() {
            sets.remove(key);
        }
        Some((member, score))
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn sorted(set: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut members: Vec<(String, f64)> = set.iter().map(|(m, s)| (m.clone(), *s)).collect();
    members.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    members
}

#[async_trait]
impl QueueBackend for MemoryBackend {
    async fn commit(&self, ops: Vec<SortedSetOp>) -> Result<(), QueueError> {
        self.touch();
        let fail_at = self.fail_at_op.lock().take();

        let mut sets = self.sets.lock();
        let mut staged = sets.clone();

        for (index, op) in ops.into_iter().enumerate() {
            if fail_at == Some(index) {
                return Err(QueueError::Backend(format!(
                    "injected failure at operation {}",
                    index
                )));
            }
            match op {
                SortedSetOp::Add { key, member, score } => {
                    staged.entry(key).or_default().insert(member, score);
                }
                SortedSetOp::IncrBy { key, member, delta } => {
                    *staged.entry(key).or_default().entry(member).or_insert(0.0) += delta;
                }
            }
        }

        *sets = staged;
        Ok(())
    }

    async fn card(&self, key: &str) -> Result<u64, QueueError> {
        self.touch();
        Ok(self.sets.lock().get(key).map_or(0, |set| set.len() as u64))
    }

    async fn range_with_scores(&self, key: &str) -> Result<Vec<(String, f64)>, QueueError> {
        self.touch();
        Ok(self.sets.lock().get(key).map(sorted).unwrap_or_default())
    }
}
