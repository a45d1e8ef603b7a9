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

//! The task write and the active-index touch commit together or not at all.

use std::sync::Arc;

use mailroom_client::queue::{org_queue_key, ACTIVE_ORGS_KEY};
use mailroom_client::{BatchQueue, ContactImportBatch, MemoryBackend, QueueBackend, QueueError};

#[tokio::test]
async fn test_successful_enqueue_writes_task_and_index() {
    let backend = Arc::new(MemoryBackend::new());
    let queue = BatchQueue::new(backend.clone());

    queue
        .queue_contact_import_batch(&ContactImportBatch { id: 3, org_id: 8 })
        .await
        .unwrap();
    queue.queue_interrupt(8, Some(&[1, 2]), None).await.unwrap();

    assert_eq!(backend.card(&org_queue_key(8)).await.unwrap(), 2);
    assert_eq!(backend.score(ACTIVE_ORGS_KEY, "8"), Some(0.0));
    assert_eq!(backend.card(ACTIVE_ORGS_KEY).await.unwrap(), 1);
}

#[tokio::test]
async fn test_partial_failure_writes_neither() {
    let backend = Arc::new(MemoryBackend::new());
    let queue = BatchQueue::new(backend.clone());

    for fail_at in [0, 1] {
        backend.fail_next_commit_at(fail_at);
        let result = queue.queue_interrupt_channel(8, 4).await;
        assert!(matches!(result, Err(QueueError::Backend(_))));
        assert_eq!(backend.card(&org_queue_key(8)).await.unwrap(), 0);
        assert_eq!(backend.card(ACTIVE_ORGS_KEY).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn test_invalid_interrupt_makes_no_calls() {
    let backend = Arc::new(MemoryBackend::new());
    let queue = BatchQueue::new(backend.clone());

    let result = queue.queue_interrupt(8, None, None).await;
    assert!(matches!(result, Err(QueueError::InvalidInterruptTarget)));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_concurrent_enqueues_all_land() {
    let backend = Arc::new(MemoryBackend::new());
    let queue = BatchQueue::new(backend.clone());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let queue = queue.clone();
            tokio::spawn(async move {
                queue
                    .queue_contact_import_batch(&ContactImportBatch {
                        id: i,
                        org_id: i % 4,
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for org_id in 0..4 {
        assert_eq!(backend.card(&org_queue_key(org_id)).await.unwrap(), 5);
    }
    assert_eq!(backend.card(ACTIVE_ORGS_KEY).await.unwrap(), 4);
}
