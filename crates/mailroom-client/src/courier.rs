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

//! Courier channel queues.
//!
//! Courier drains one pair of sorted sets per channel: `msgs:{uuid}|{tps}/1`
//! for high priority messages and `msgs:{uuid}|{tps}/0` for bulk. Channels
//! with pending work are listed in the `msgs:active` or `msgs:throttled`
//! queue-sets, scored by worker count. The throughput is part of the key so
//! it can be read back without looking the channel up.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::error::QueueError;
use crate::queue::QueueBackend;

/// Throughput assumed for channels without a configured tps.
pub const DEFAULT_TPS: u32 = 10;

pub const QUEUESET_ACTIVE: &str = "msgs:active";
pub const QUEUESET_THROTTLED: &str = "msgs:throttled";

static COURIER_QUEUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^msgs:(?P<uuid>[a-z0-9\-]{36})\|(?P<tps>\d+)").expect("valid courier key pattern")
});

/// What a courier queue needs to know about a channel.
pub trait CourierChannel {
    fn uuid(&self) -> Uuid;

    /// Configured messages per second, if any.
    fn tps(&self) -> Option<u32>;
}

/// Plain channel settings, for callers without their own channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub uuid: Uuid,
    pub tps: Option<u32>,
}

impl CourierChannel for ChannelConfig {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn tps(&self) -> Option<u32> {
        self.tps
    }
}

/// Queue-sets a channel can be listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSet {
    Active,
    Throttled,
}

impl QueueSet {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Active => QUEUESET_ACTIVE,
            Self::Throttled => QUEUESET_THROTTLED,
        }
    }
}

impl fmt::Display for QueueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A channel's courier queues, derived from its uuid and throughput.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedChannel {
    pub uuid: Uuid,
    pub tps: u32,
    pub high_queue_key: String,
    pub bulk_queue_key: String,
}

impl QueuedChannel {
    pub fn from_channel(channel: &impl CourierChannel) -> Self {
        let uuid = channel.uuid();
        let tps = channel.tps().unwrap_or(DEFAULT_TPS);
        Self::from_key(&format!("msgs:{}|{}", uuid.hyphenated(), tps), uuid, tps)
    }

    /// Parses a queue-set member such as `msgs:{uuid}|{tps}`.
    pub fn parse(key: &str) -> Result<Self, QueueError> {
        let invalid = || QueueError::InvalidChannelKey(key.to_string());

        let caps = COURIER_QUEUE_PATTERN.captures(key).ok_or_else(invalid)?;
        let uuid = Uuid::parse_str(&caps["uuid"]).map_err(|_| invalid())?;
        let tps = caps["tps"].parse::<u32>().map_err(|_| invalid())?;

        Ok(Self::from_key(key, uuid, tps))
    }

    fn from_key(key: &str, uuid: Uuid, tps: u32) -> Self {
        Self {
            uuid,
            tps,
            high_queue_key: format!("{}/1", key),
            bulk_queue_key: format!("{}/0", key),
        }
    }

    /// Depths of the high priority and bulk queues.
    pub async fn get_queue_sizes(&self, backend: &dyn QueueBackend) -> Result<(u64, u64), QueueError> {
        let high = backend.card(&self.high_queue_key).await?;
        let bulk = backend.card(&self.bulk_queue_key).await?;
        Ok((high, bulk))
    }

    /// Total number of queued messages.
    pub async fn queue_size(&self, backend: &dyn QueueBackend) -> Result<u64, QueueError> {
        let (high, bulk) = self.get_queue_sizes(backend).await?;
        Ok(high + bulk)
    }
}

/// Lists the channels in `queueset` along with their worker counts.
pub async fn get_queued_channels(
    backend: &dyn QueueBackend,
    queueset: QueueSet,
) -> Result<Vec<(QueuedChannel, i64)>, QueueError> {
    backend
        .range_with_scores(queueset.key())
        .await?
        .into_iter()
        .map(|(key, workers)| Ok((QueuedChannel::parse(&key)?, workers as i64)))
        .collect()
}
