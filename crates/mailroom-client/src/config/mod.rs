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

//! Configuration for the mailroom client and queue backend.
//!
//! Settings are read from a TOML file (see [`ConfigLoader`]) and can also be
//! built in code:
//!
//! ```rust,ignore
//! let config = MailroomConfig::builder()
//!     .base_url("http://mailroom:8090")
//!     .auth_token("sesame")
//!     .timeout(Duration::from_secs(10))
//!     .build();
//! ```

mod error;
mod loader;

pub use error::{ConfigError, ValidationError};
pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User agent sent with every mailroom request.
pub const DEFAULT_USER_AGENT: &str = "Temba";

const DEFAULT_MAILROOM_URL: &str = "http://localhost:8090";
const DEFAULT_QUEUE_URL: &str = "redis://localhost:6379/15";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Top level settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mailroom: MailroomConfig,
    pub queue: QueueConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Validates every section, collecting all failures.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = self.mailroom.validate() {
            errors.push(e);
        }
        if let Err(e) = self.queue.validate() {
            errors.push(e);
        }
        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple { errors }),
        }
    }
}

/// Connection settings for the mailroom RPC service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailroomConfig {
    /// Base URL; requests go to `{base_url}/mr/{endpoint}`
    pub base_url: String,
    /// Sent as `Authorization: Token {auth_token}` when set
    pub auth_token: Option<String>,
    /// Transport timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for MailroomConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MAILROOM_URL.to_string(),
            auth_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl MailroomConfig {
    pub fn builder() -> MailroomConfigBuilder {
        MailroomConfigBuilder::default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL without any trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match url::Url::parse(&self.base_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                return Err(ValidationError::InvalidMailroomUrl {
                    url: self.base_url.clone(),
                })
            }
        }
        if self.timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout {
                timeout_ms: self.timeout_ms,
            });
        }
        Ok(())
    }
}

/// Builder for [`MailroomConfig`].
#[derive(Debug, Clone, Default)]
pub struct MailroomConfigBuilder {
    config: MailroomConfig,
}

impl MailroomConfigBuilder {
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.config.base_url = value.into();
        self
    }

    pub fn auth_token(mut self, value: impl Into<String>) -> Self {
        self.config.auth_token = Some(value.into());
        self
    }

    /// Sets the transport timeout. Precision is one millisecond.
    pub fn timeout(mut self, value: Duration) -> Self {
        self.config.timeout_ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.user_agent = value.into();
        self
    }

    pub fn build(self) -> MailroomConfig {
        self.config
    }
}

/// Connection settings for the sorted-set queue store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub url: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_QUEUE_URL.to_string(),
        }
    }
}

impl QueueConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match url::Url::parse(&self.url) {
            Ok(parsed) if matches!(parsed.scheme(), "redis" | "rediss") => Ok(()),
            _ => Err(ValidationError::InvalidQueueUrl {
                url: self.url.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(ValidationError::InvalidLogLevel {
                level: self.level.clone(),
            }),
        }
    }
}
