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

//! Pop order across priorities within one org queue.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use mailroom_client::client::Exclusions;
use mailroom_client::queue::org_queue_key;
use mailroom_client::{BatchQueue, ContactImportBatch, FlowStart, MemoryBackend, StartType};
use serde_json::Value;

fn queue_at(backend: &Arc<MemoryBackend>, millis: i64) -> BatchQueue {
    let now = Utc.timestamp_millis_opt(millis).unwrap();
    BatchQueue::with_clock(backend.clone(), Arc::new(move || now))
}

fn flow_start(org_id: i64, flow_id: i64) -> FlowStart {
    FlowStart {
        id: flow_id * 100,
        org_id,
        flow_id,
        start_type: StartType::Api,
        created_by_id: None,
        contact_ids: vec![1],
        group_ids: vec![],
        urns: vec![],
        query: None,
        exclusions: Exclusions::default(),
        params: None,
    }
}

fn pop_type(backend: &MemoryBackend, org_id: i64) -> Option<String> {
    let (member, _) = backend.pop_min(&org_queue_key(org_id))?;
    let envelope: Value = serde_json::from_str(&member).unwrap();
    envelope["type"].as_str().map(str::to_string)
}

#[tokio::test]
async fn test_high_priority_pops_before_earlier_default() {
    let backend = Arc::new(MemoryBackend::new());
    let t1 = 1_700_000_000_000;

    queue_at(&backend, t1)
        .queue_contact_import_batch(&ContactImportBatch { id: 1, org_id: 1 })
        .await
        .unwrap();
    queue_at(&backend, t1 + Duration::minutes(30).num_milliseconds())
        .queue_flow_start(&flow_start(1, 5))
        .await
        .unwrap();

    assert_eq!(pop_type(&backend, 1).as_deref(), Some("start_flow"));
    assert_eq!(pop_type(&backend, 1).as_deref(), Some("import_contact_batch"));
    assert_eq!(pop_type(&backend, 1), None);
}

#[tokio::test]
async fn test_same_priority_is_fifo() {
    let backend = Arc::new(MemoryBackend::new());
    let t1 = 1_700_000_000_000;

    queue_at(&backend, t1).queue_flow_start(&flow_start(1, 5)).await.unwrap();
    queue_at(&backend, t1 + 1).queue_interrupt_channel(1, 9).await.unwrap();
    queue_at(&backend, t1 + 2).queue_interrupt(1, None, Some(5)).await.unwrap();

    assert_eq!(pop_type(&backend, 1).as_deref(), Some("start_flow"));
    assert_eq!(pop_type(&backend, 1).as_deref(), Some("interrupt_channel"));
    assert_eq!(pop_type(&backend, 1).as_deref(), Some("interrupt_sessions"));
}

#[tokio::test]
async fn test_orgs_are_isolated() {
    let backend = Arc::new(MemoryBackend::new());
    let queue = queue_at(&backend, 1_700_000_000_000);

    queue.queue_flow_start(&flow_start(1, 5)).await.unwrap();
    queue.queue_flow_start(&flow_start(2, 6)).await.unwrap();
    queue.queue_flow_start(&flow_start(2, 7)).await.unwrap();

    let snapshot = queue.snapshot().await.unwrap();
    let counts: Vec<(i64, usize)> = snapshot
        .orgs
        .iter()
        .map(|org| (org.org_id, org.task_count))
        .collect();
    assert_eq!(counts, vec![(1, 1), (2, 2)]);
}
