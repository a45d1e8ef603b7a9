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


//! Implementation of the `courier channels` command.

use anyhow::{Context, Result};
use mailroom_client::{get_queued_channels, QueueSet, RedisBackend, Settings};

pub async fn channels(settings: &Settings, throttled: bool) -> Result<()> {
    let backend = RedisBackend::new(&settings.queue.url)
        .with_context(|| format!("Invalid queue URL: {}", settings.queue.url))?;
    let queueset = if throttled {
        QueueSet::Throttled
    } else {
        QueueSet::Active
    };

    let channels = get_queued_channels(&backend, queueset)
        .await
        .with_context(|| format!("Failed to read {}", queueset))?;

    if channels.is_empty() {
        println!("No channels in {}", queueset);
        return Ok(());
    }

    println!(
        "{:<36}  {:>5}  {:>7}  {:>8}  {:>8}",
        "channel", "tps", "workers", "priority", "bulk"
    );
    for (channel, workers) in channels {
        let (high, bulk) = channel.get_queue_sizes(&backend).await?;
        println!(
            "{:<36}  {:>5}  {:>7}  {:>8}  {:>8}",
            channel.uuid, channel.tps, workers, high, bulk
        );
    }
    Ok(())
}
