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

//! Structured logging and metrics for mailroom calls and queue writes.
//!
//! Log events carry a stable `event_type` field so they can be filtered
//! downstream. Counters are recorded through the `metrics` facade and are
//! no-ops unless the host application installs a recorder.

/// Event types attached to log records.
pub mod events {
    /// An RPC request is about to be sent.
    pub const REQUEST_SENT: &str = "mailroom.request.sent";
    /// Mailroom rejected the request input (HTTP 422).
    pub const REQUEST_REJECTED: &str = "mailroom.request.rejected";
    /// Mailroom returned another 4xx/5xx status.
    pub const REQUEST_FAILED: &str = "mailroom.request.failed";
    /// The request never reached mailroom.
    pub const REQUEST_UNREACHABLE: &str = "mailroom.request.unreachable";
    /// A 422 response used an error domain this client does not know.
    pub const REQUEST_UNCLASSIFIED: &str = "mailroom.request.unclassified";

    /// A batch task was added to an org queue.
    pub const BATCH_TASK_QUEUED: &str = "queue.batch.queued";
    /// A batch task could not be written to the queue backend.
    pub const BATCH_TASK_QUEUE_FAILED: &str = "queue.batch.queue_failed";
}

/// Metric names.
pub mod metric_names {
    pub const REQUESTS_TOTAL: &str = "mailroom_requests_total";
    pub const REQUEST_ERRORS_TOTAL: &str = "mailroom_request_errors_total";
    pub const BATCH_TASKS_QUEUED_TOTAL: &str = "mailroom_batch_tasks_queued_total";
}

pub(crate) fn record_request(endpoint: &'static str) {
    metrics::counter!(metric_names::REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
}

pub(crate) fn record_request_error(endpoint: &'static str, kind: &'static str) {
    metrics::counter!(
        metric_names::REQUEST_ERRORS_TOTAL,
        "endpoint" => endpoint,
        "kind" => kind
    )
    .increment(1);
}

pub(crate) fn record_batch_task_queued(task_type: &'static str) {
    metrics::counter!(metric_names::BATCH_TASKS_QUEUED_TOTAL, "task_type" => task_type)
        .increment(1);
}

/// Log a successfully queued batch task.
pub(crate) fn log_batch_task_queued(org_id: i64, task_type: &str, score: f64) {
    tracing::info!(
        event_type = events::BATCH_TASK_QUEUED,
        org_id = org_id,
        task_type = %task_type,
        score = score,
        "Queued batch task"
    );
}

/// Log a failed batch task write.
pub(crate) fn log_batch_task_queue_failed(org_id: i64, task_type: &str, error: &str) {
    tracing::error!(
        event_type = events::BATCH_TASK_QUEUE_FAILED,
        org_id = org_id,
        task_type = %task_type,
        error = %error,
        "Failed to queue batch task"
    );
}
