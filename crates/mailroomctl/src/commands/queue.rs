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


//! Implementation of the `queue dump` command.

use std::sync::Arc;

use anyhow::{Context, Result};
use mailroom_client::{BatchQueue, RedisBackend, Settings};
use tracing::info;

pub async fn dump(settings: &Settings, json: bool) -> Result<()> {
    let backend = RedisBackend::new(&settings.queue.url)
        .with_context(|| format!("Invalid queue URL: {}", settings.queue.url))?;
    let queue = BatchQueue::new(Arc::new(backend));

    let snapshot = queue.snapshot().await.context("Failed to read batch queue")?;
    info!(
        orgs = snapshot.orgs.len(),
        tasks = snapshot.total_tasks(),
        "Read batch queue snapshot"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if snapshot.orgs.is_empty() {
        println!("No active orgs");
        return Ok(());
    }

    for org in &snapshot.orgs {
        println!(
            "org {} ({} tasks, {} workers)",
            org.org_id, org.task_count, org.workers
        );
        for summary in &org.by_type {
            let oldest = summary
                .oldest_queued_on
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            println!(
                "  {:<22} {:>6}  oldest {}",
                summary.task_type, summary.count, oldest
            );
            for (flow_id, count) in &summary.flow_counts {
                println!("    flow {:<10} {:>6}", flow_id, count);
            }
        }
        if org.unreadable > 0 {
            println!("  {:<22} {:>6}", "(unreadable)", org.unreadable);
        }
    }
    Ok(())
}
