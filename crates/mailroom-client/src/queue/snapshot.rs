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

//! Read-only view of the batch queue for operators.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{org_queue_key, BatchQueue, BatchTaskType, ACTIVE_ORGS_KEY};
use crate::error::QueueError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueSnapshot {
    pub orgs: Vec<OrgQueueSnapshot>,
}

impl QueueSnapshot {
    pub fn total_tasks(&self) -> usize {
        self.orgs.iter().map(|org| org.task_count).sum()
    }
}

/// One org's entry in the active index and the tasks in its queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgQueueSnapshot {
    pub org_id: i64,
    /// Score in the active index.
    pub workers: f64,
    pub task_count: usize,
    /// Members that could not be read as task envelopes.
    pub unreadable: usize,
    pub by_type: Vec<TaskTypeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTypeSummary {
    pub task_type: String,
    pub count: usize,
    pub oldest_queued_on: Option<DateTime<Utc>>,
    /// Queued starts per flow id, only filled for `start_flow`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub flow_counts: BTreeMap<i64, usize>,
}

#[derive(Deserialize)]
struct StoredEnvelope {
    #[serde(rename = "type")]
    task_type: String,
    #[serde(default)]
    task: Value,
    queued_on: DateTime<Utc>,
}

impl BatchQueue {
    /// Reads the active index and every listed org queue.
    ///
    /// Not atomic across orgs; the consumer may pop tasks between reads.
    pub async fn snapshot(&self) -> Result<QueueSnapshot, QueueError> {
        let active = self.backend().range_with_scores(ACTIVE_ORGS_KEY).await?;
        let mut orgs = Vec::with_capacity(active.len());

        for (member, workers) in active {
            let Ok(org_id) = member.parse::<i64>() else {
                warn!(member = %member, "Skipping non-numeric member of active org index");
                continue;
            };
            let tasks = self.backend().range_with_scores(&org_queue_key(org_id)).await?;
            orgs.push(summarize_org(org_id, workers, &tasks));
        }

        Ok(QueueSnapshot { orgs })
    }
}

fn summarize_org(org_id: i64, workers: f64, tasks: &[(String, f64)]) -> OrgQueueSnapshot {
    let mut by_type: BTreeMap<String, TaskTypeSummary> = BTreeMap::new();
    let mut unreadable = 0;

    for (member, _score) in tasks {
        let envelope: StoredEnvelope = match serde_json::from_str(member) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(org_id = org_id, error = %e, "Unreadable batch task");
                unreadable += 1;
                continue;
            }
        };

        let summary = by_type
            .entry(envelope.task_type.clone())
            .or_insert_with(|| TaskTypeSummary {
                task_type: envelope.task_type.clone(),
                count: 0,
                oldest_queued_on: None,
                flow_counts: BTreeMap::new(),
            });

        summary.count += 1;
        summary.oldest_queued_on = Some(match summary.oldest_queued_on {
            Some(oldest) => oldest.min(envelope.queued_on),
            None => envelope.queued_on,
        });

        if BatchTaskType::parse(&envelope.task_type) == Some(BatchTaskType::StartFlow) {
            if let Some(flow_id) = envelope.task.get("flow_id").and_then(Value::as_i64) {
                *summary.flow_counts.entry(flow_id).or_default() += 1;
            }
        }
    }

    OrgQueueSnapshot {
        org_id,
        workers,
        task_count: tasks.len(),
        unreadable,
        by_type: by_type.into_values().collect(),
    }
}
