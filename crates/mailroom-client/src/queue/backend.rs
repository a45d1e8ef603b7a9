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

//! Sorted-set storage used by the batch and courier queues.
//!
//! [`QueueBackend`] exposes the handful of sorted-set primitives this crate
//! needs. Writes go through [`QueueBackend::commit`], which must apply every
//! operation or none of them.

use async_trait::async_trait;

use crate::error::QueueError;

/// A single sorted-set write.
#[derive(Debug, Clone, PartialEq)]
pub enum SortedSetOp {
    /// `ZADD key score member`
    Add {
        key: String,
        member: String,
        score: f64,
    },
    /// `ZINCRBY key delta member`. A zero delta inserts the member with score
    /// 0 if absent and otherwise leaves its score alone.
    IncrBy {
        key: String,
        member: String,
        delta: f64,
    },
}

#[async_trait]
pub trait QueueBackend: Send + Sync {
    /// Applies all operations atomically.
    async fn commit(&self, ops: Vec<SortedSetOp>) -> Result<(), QueueError>;

    /// `ZCARD key`
    async fn card(&self, key: &str) -> Result<u64, QueueError>;

    /// `ZRANGE key 0 -1 WITHSCORES`, lowest score first.
    async fn range_with_scores(&self, key: &str) -> Result<Vec<(String, f64)>, QueueError>;
}

#[cfg(feature = "redis-backend")]
pub use redis_backend::RedisBackend;

#[cfg(feature = "redis-backend")]
mod redis_backend {
    use super::*;
    use redis::AsyncCommands;

    /// [`QueueBackend`] on Redis or Valkey. Commits run as a `MULTI`/`EXEC`
    /// pipeline on a multiplexed connection.
    #[derive(Clone)]
    pub struct RedisBackend {
        client: redis::Client,
    }

    impl RedisBackend {
        pub fn new(url: &str) -> Result<Self, QueueError> {
            let client = redis::Client::open(url)?;
            Ok(Self { client })
        }

        async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, QueueError> {
            Ok(self.client.get_multiplexed_async_connection().await?)
        }
    }

    #[async_trait]
    impl QueueBackend for RedisBackend {
        async fn commit(&self, ops: Vec<SortedSetOp>) -> Result<(), QueueError> {
            let mut pipe = redis::pipe();
            pipe.atomic();

            for op in &ops {
                match op {
                    SortedSetOp::Add { key, member, score } => {
                        pipe.zadd(key, member, *score).ignore();
                    }
                    SortedSetOp::IncrBy { key, member, delta } => {
                        pipe.zincr(key, member, *delta).ignore();
                    }
                }
            }

            let mut conn = self.connection().await?;
            let _: () = pipe.query_async(&mut conn).await?;
            Ok(())
        }

        async fn card(&self, key: &str) -> Result<u64, QueueError> {
            let mut conn = self.connection().await?;
            let count: u64 = conn.zcard(key).await?;
            Ok(count)
        }

        async fn range_with_scores(&self, key: &str) -> Result<Vec<(String, f64)>, QueueError> {
            let mut conn = self.connection().await?;
            let members: Vec<(String, f64)> = conn.zrange_withscores(key, 0, -1).await?;
            Ok(members)
        }
    }
}
