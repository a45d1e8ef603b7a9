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

//! Error types for the mailroom client, batch queue and courier helpers.
//!
//! RPC failures fall into three families which callers must be able to tell
//! apart:
//!
//! - Input rejected by mailroom (HTTP 422): [`FlowValidationError`],
//!   [`QueryValidationError`], [`UrnValidationError`] and
//!   [`EmptyBroadcastError`]. Their `Display` output is a complete sentence
//!   that can be shown to an end user as-is.
//! - Any other 4xx/5xx response: [`RequestError`], carrying the endpoint, the
//!   outbound payload and the raw response for diagnostics.
//! - Mailroom could not be reached at all: [`TransportError`].
//!
//! Nothing in this crate retries or suppresses these errors.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ValidationError;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// A flow definition was rejected by mailroom.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct FlowValidationError {
    pub error: String,
}

impl FlowValidationError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A contact query was rejected by mailroom's query parser.
///
/// `code` is the subcode after the `query:` domain prefix and `extra` holds
/// the parameters used to render a user-facing message for that subcode.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryValidationError {
    pub error: String,
    pub code: String,
    pub extra: Map<String, Value>,
}

impl QueryValidationError {
    pub fn new(error: impl Into<String>, code: impl Into<String>, extra: Map<String, Value>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            extra,
        }
    }

    /// Returns the message template for a known subcode. Placeholders are
    /// written as `{name}` and are filled from `extra`.
    pub fn template(code: &str) -> Option<&'static str> {
        let template = match code {
            "syntax" => "Invalid query syntax.",
            "invalid_number" => "Unable to convert '{value}' to a number.",
            "invalid_date" => "Unable to convert '{value}' to a date.",
            "invalid_language" => "'{value}' is not a valid language code.",
            "invalid_flow" => "'{value}' is not a valid flow name.",
            "invalid_group" => "'{value}' is not a valid group name.",
            "invalid_partial_name" => {
                "Using ~ with name requires token of at least {min_token_length} characters."
            }
            "invalid_partial_urn" => {
                "Using ~ with URN requires value of at least {min_value_length} characters."
            }
            "unsupported_contains" => "Can only use ~ with name or URN values.",
            "unsupported_comparison" => "Can only use {operator} with number or date values.",
            "unsupported_setcheck" => "Can't check whether '{property}' is set or not set.",
            "unknown_property" => "Can't resolve '{property}' to a field or URN scheme.",
            "unknown_property_type" => "Prefixes must be 'fields' or 'urns'.",
            "redacted_urns" => "Can't query on URNs in an anonymous workspace.",
            _ => return None,
        };
        Some(template)
    }
}

impl std::fmt::Display for QueryValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match Self::template(&self.code) {
            Some(template) => f.write_str(&render_template(template, &self.extra)),
            None => f.write_str(&self.error),
        }
    }
}

impl std::error::Error for QueryValidationError {}

/// Substitutes `{name}` placeholders with values from `params`.
///
/// String values are inserted without quotes, other JSON values use their
/// JSON text. Missing parameters render as an empty string.
fn render_template(template: &str, params: &Map<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match params.get(&caps[1]) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
        .into_owned()
}

/// A contact URN was rejected, e.g. because it is invalid or already taken.
///
/// `index` is the position of the offending URN in the submitted list.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct UrnValidationError {
    pub error: String,
    pub code: String,
    pub index: usize,
}

/// A broadcast was rejected because it would have no recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("This broadcast has no recipients.")]
pub struct EmptyBroadcastError;

/// Mailroom answered with a non-422 error status.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct RequestError {
    pub endpoint: String,
    /// The payload exactly as it was sent
    pub payload: Value,
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
    /// The `error` field of a JSON body, or the body text
    pub error: String,
}

impl RequestError {
    pub fn new(endpoint: impl Into<String>, payload: Value, status: u16, body: Vec<u8>) -> Self {
        let error = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());

        Self {
            endpoint: endpoint.into(),
            payload,
            status,
            body,
            error,
        }
    }
}

/// The HTTP exchange itself failed (connection refused, DNS, timeout).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether the failure was caused by the transport timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout(),
            Self::Other(_) => false,
        }
    }
}

/// Errors returned by [`crate::client::MailroomClient`] operations.
#[derive(Debug, Error)]
pub enum MailroomError {
    #[error(transparent)]
    FlowValidation(#[from] FlowValidationError),

    #[error(transparent)]
    QueryValidation(#[from] QueryValidationError),

    #[error(transparent)]
    UrnValidation(#[from] UrnValidationError),

    #[error(transparent)]
    EmptyBroadcast(#[from] EmptyBroadcastError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("mailroom is unavailable: {0}")]
    Transport(#[from] TransportError),

    #[error("unable to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("invalid mailroom client configuration: {0}")]
    Config(#[from] ValidationError),
}

impl MailroomError {
    /// Whether this error describes input that mailroom rejected, and so can
    /// be shown to the user who supplied that input.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::FlowValidation(_)
                | Self::QueryValidation(_)
                | Self::UrnValidation(_)
                | Self::EmptyBroadcast(_)
        )
    }

    /// Short label used for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FlowValidation(_) => "flow_validation",
            Self::QueryValidation(_) => "query_validation",
            Self::UrnValidation(_) => "urn_validation",
            Self::EmptyBroadcast(_) => "empty_broadcast",
            Self::Request(_) => "request",
            Self::Transport(_) => "transport",
            Self::Decode { .. } => "decode",
            Self::Config(_) => "config",
        }
    }
}

/// Errors returned by the batch task queue and courier queue helpers.
#[derive(Debug, Error)]
pub enum QueueError {
    #[cfg(feature = "redis-backend")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Queue backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Interrupt requires exactly one of a non-empty contact set or a flow")]
    InvalidInterruptTarget,

    #[error("Invalid courier queue key: {0}")]
    InvalidChannelKey(String),
}
