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

//! Batch task queue.
//!
//! Asynchronous work for mailroom's worker pool is handed off through one
//! sorted set per org, `tasks:batch:{org_id}`, plus the global
//! `tasks:batch:active` index that the consumer round-robins over. Each
//! enqueue writes the task and touches the org's index entry in a single
//! atomic commit. Dequeueing belongs to mailroom.

pub mod backend;
pub mod memory;
pub mod priority;
pub mod snapshot;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::types::Exclusions;
use crate::error::QueueError;
use crate::telemetry;

pub use backend::{QueueBackend, SortedSetOp};
pub use memory::MemoryBackend;
pub use priority::{Priority, DEFAULT_PRIORITY, HIGH_PRIORITY};
pub use snapshot::{OrgQueueSnapshot, QueueSnapshot, TaskTypeSummary};

#[cfg(feature = "redis-backend")]
pub use backend::RedisBackend;

/// Key of the global active-org index.
pub const ACTIVE_ORGS_KEY: &str = "tasks:batch:active";

/// Key of an org's batch task queue.
pub fn org_queue_key(org_id: i64) -> String {
    format!("tasks:batch:{}", org_id)
}

/// Task types understood by mailroom's batch workers. The strings are read
/// by the consumer and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchTaskType {
    StartFlow,
    InterruptSessions,
    ImportContactBatch,
    InterruptChannel,
}

impl BatchTaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartFlow => "start_flow",
            Self::InterruptSessions => "interrupt_sessions",
            Self::ImportContactBatch => "import_contact_batch",
            Self::InterruptChannel => "interrupt_channel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start_flow" => Some(Self::StartFlow),
            "interrupt_sessions" => Some(Self::InterruptSessions),
            "import_contact_batch" => Some(Self::ImportContactBatch),
            "interrupt_channel" => Some(Self::InterruptChannel),
            _ => None,
        }
    }
}

impl fmt::Display for BatchTaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a flow start was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StartType {
    #[serde(rename = "M")]
    Manual,
    #[serde(rename = "A")]
    Api,
    #[serde(rename = "Z")]
    ApiZapier,
    #[serde(rename = "T")]
    Trigger,
}

/// A persisted flow start to be executed by mailroom.
#[derive(Debug, Clone)]
pub struct FlowStart {
    pub id: i64,
    pub org_id: i64,
    pub flow_id: i64,
    pub start_type: StartType,
    pub created_by_id: Option<i64>,
    pub contact_ids: Vec<i64>,
    pub group_ids: Vec<i64>,
    pub urns: Vec<String>,
    pub query: Option<String>,
    pub exclusions: Exclusions,
    pub params: Option<Value>,
}

impl FlowStart {
    fn to_task(&self) -> Value {
        json!({
            "start_id": self.id,
            "start_type": self.start_type,
            "org_id": self.org_id,
            "created_by_id": self.created_by_id,
            "flow_id": self.flow_id,
            "contact_ids": self.contact_ids,
            "group_ids": self.group_ids,
            "urns": self.urns,
            "query": self.query,
            "exclusions": self.exclusions,
            "params": self.params,
        })
    }
}

/// A pre-chunked batch of a contact import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactImportBatch {
    pub id: i64,
    pub org_id: i64,
}

/// A task as it is written to an org queue.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchTask {
    pub task_type: BatchTaskType,
    pub org_id: i64,
    pub task: Value,
    pub queued_on: DateTime<Utc>,
}

impl BatchTask {
    /// The sorted-set member: `{"type", "task", "queued_on"}` as JSON.
    pub fn to_member(&self) -> Result<String, QueueError> {
        let envelope = json!({
            "type": self.task_type.as_str(),
            "task": self.task,
            "queued_on": self.queued_on.to_rfc3339_opts(SecondsFormat::Micros, true),
        });
        Ok(serde_json::to_string(&envelope)?)
    }
}

/// Result of a successful enqueue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedTask {
    pub task: BatchTask,
    pub priority: Priority,
    pub score: f64,
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Producer side of the mailroom batch queue.
#[derive(Clone)]
pub struct BatchQueue {
    backend: Arc<dyn QueueBackend>,
    clock: Clock,
}

impl fmt::Debug for BatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchQueue").finish_non_exhaustive()
    }
}

impl BatchQueue {
    pub fn new(backend: Arc<dyn QueueBackend>) -> Self {
        Self::with_clock(backend, Arc::new(Utc::now))
    }

    /// Uses `clock` instead of the system time for scores and `queued_on`.
    pub fn with_clock(backend: Arc<dyn QueueBackend>, clock: Clock) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &Arc<dyn QueueBackend> {
        &self.backend
    }

    /// Queues a flow start at high priority.
    pub async fn queue_flow_start(&self, start: &FlowStart) -> Result<QueuedTask, QueueError> {
        self.queue(
            start.org_id,
            BatchTaskType::StartFlow,
            start.to_task(),
            Priority::High,
        )
        .await
    }

    pub async fn queue_contact_import_batch(
        &self,
        batch: &ContactImportBatch,
    ) -> Result<QueuedTask, QueueError> {
        self.queue(
            batch.org_id,
            BatchTaskType::ImportContactBatch,
            json!({"contact_import_batch_id": batch.id}),
            Priority::Default,
        )
        .await
    }

    pub async fn queue_interrupt_channel(
        &self,
        org_id: i64,
        channel_id: i64,
    ) -> Result<QueuedTask, QueueError> {
        self.queue(
            org_id,
            BatchTaskType::InterruptChannel,
            json!({"channel_id": channel_id}),
            Priority::High,
        )
        .await
    }

    /// Queues an interrupt of either the given contacts' sessions or all
    /// sessions in a flow. Exactly one target must be given, and an empty
    /// contact slice counts as no target. Fails with
    /// [`QueueError::InvalidInterruptTarget`] before touching the backend
    /// otherwise.
    pub async fn queue_interrupt(
        &self,
        org_id: i64,
        contact_ids: Option<&[i64]>,
        flow_id: Option<i64>,
    ) -> Result<QueuedTask, QueueError> {
        let contact_ids = contact_ids.filter(|ids| !ids.is_empty());

        let task = match (contact_ids, flow_id) {
            (Some(ids), None) => json!({"contact_ids": ids}),
            (None, Some(flow_id)) => json!({"flow_ids": [flow_id]}),
            _ => return Err(QueueError::InvalidInterruptTarget),
        };

        self.queue(org_id, BatchTaskType::InterruptSessions, task, Priority::High)
            .await
    }

    async fn queue(
        &self,
        org_id: i64,
        task_type: BatchTaskType,
        task: Value,
        priority: Priority,
    ) -> Result<QueuedTask, QueueError> {
        let now = (self.clock)();
        let score = priority.score_at(now);
        let task = BatchTask {
            task_type,
            org_id,
            task,
            queued_on: now,
        };

        let ops = vec![
            SortedSetOp::Add {
                key: org_queue_key(org_id),
                member: task.to_member()?,
                score,
            },
            SortedSetOp::IncrBy {
                key: ACTIVE_ORGS_KEY.to_string(),
                member: org_id.to_string(),
                delta: 0.0,
            },
        ];

        if let Err(e) = self.backend.commit(ops).await {
            telemetry::log_batch_task_queue_failed(org_id, task_type.as_str(), &e.to_string());
            return Err(e);
        }

        telemetry::log_batch_task_queued(org_id, task_type.as_str(), score);
        telemetry::record_batch_task_queued(task_type.as_str());

        Ok(QueuedTask {
            task,
            priority,
            score,
        })
    }
}
