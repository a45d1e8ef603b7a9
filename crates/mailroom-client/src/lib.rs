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

//! # mailroom-client
//!
//! Client side of the mailroom execution engine: a typed RPC client over
//! HTTP/JSON, the per-org batch task queue mailroom's workers consume, and
//! helpers for reading courier's per-channel message queues.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mailroom_client::{BatchQueue, MailroomClient, MailroomConfig, RedisBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MailroomConfig::builder()
//!     .base_url("http://localhost:8090")
//!     .auth_token("sesame")
//!     .build();
//! let client = MailroomClient::new(&config)?;
//! let parsed = client.parse_query(1, "age > 18", false).await?;
//! println!("{}", parsed.query);
//!
//! let queue = BatchQueue::new(Arc::new(RedisBackend::new("redis://localhost:6379/15")?));
//! queue.queue_interrupt(1, None, Some(42)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every fallible call returns a typed error. [`MailroomError`] separates
//! input the user can fix (validation failures reported by mailroom) from
//! operational failures, and [`QueueError`] covers queue writes.

pub mod client;
pub mod config;
pub mod courier;
pub mod error;
pub mod queue;
pub mod telemetry;

pub use client::{classify_response, Broadcast, Encoding, MailroomClient, ResponseBody};
pub use config::{ConfigLoader, MailroomConfig, QueueConfig, Settings};
pub use courier::{get_queued_channels, ChannelConfig, CourierChannel, QueueSet, QueuedChannel};
pub use error::{
    EmptyBroadcastError, FlowValidationError, MailroomError, QueryValidationError, QueueError,
    RequestError, TransportError, UrnValidationError,
};
pub use queue::{
    BatchQueue, BatchTask, BatchTaskType, ContactImportBatch, FlowStart, MemoryBackend, Priority,
    QueueBackend, QueuedTask, StartType,
};

#[cfg(feature = "redis-backend")]
pub use queue::RedisBackend;
