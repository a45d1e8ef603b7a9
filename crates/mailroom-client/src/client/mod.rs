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

//! Mailroom RPC client.
//!
//! Every operation builds a payload, sends it to `{base_url}/mr/{endpoint}`
//! and runs the response through [`classify_response`]:
//!
//! 1. A JSON content type is decoded, anything else is kept as raw bytes.
//! 2. Status 422 carries `{error, code: "<domain>:<subcode>", extra}` and is
//!    mapped by domain to a validation error. A domain this client does not
//!    know falls through and the body is returned as a success.
//! 3. Any other status in 400..600 is a [`RequestError`].
//! 4. Otherwise the decoded body is the result.
//!
//! Payloads are encoded in one of three ways, chosen per endpoint:
//! [`Encoding::Native`] lets the transport serialize the JSON,
//! [`Encoding::PassThrough`] encodes it here and sends the text verbatim with
//! an explicit `Content-Type` (used for payloads embedding flow definitions
//! and other externally decoded JSON), and [`Encoding::Multipart`] is used
//! for file uploads.

mod contacts;
mod flows;
pub mod modifiers;
mod msgs;
mod system;
mod tickets;
pub mod transport;
pub mod types;

pub use flows::CURRENT_SPEC_VERSION;
pub use modifiers::{ContactStatus, GroupModification, Modifier, UrnModification};
pub use msgs::Broadcast;
pub use transport::{
    FilePart, HttpRequest, HttpResponse, Method, RequestBody, ReqwestTransport, Transport,
};
pub use types::{
    BroadcastPreview, ContactSpec, Exclusions, FieldReference, GroupReference, Inclusions,
    ParsedQuery, QueryMetadata, ScheduleSpec, SearchResults, StartPreview, UrnResult,
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::MailroomConfig;
use crate::error::{
    EmptyBroadcastError, FlowValidationError, MailroomError, QueryValidationError, RequestError,
    UrnValidationError,
};
use crate::telemetry::{self, events};

/// How a payload is put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoding {
    Native,
    PassThrough,
    Multipart(Vec<FilePart>),
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Raw(Vec<u8>),
}

impl ResponseBody {
    /// Returns the JSON body, or a decode error for a raw one.
    pub fn into_json(self, endpoint: &str) -> Result<Value, MailroomError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Raw(_) => Err(MailroomError::Decode {
                endpoint: endpoint.to_string(),
                message: "expected a JSON response".to_string(),
            }),
        }
    }

    /// Returns the body bytes. JSON bodies are re-encoded.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Raw(bytes) => bytes,
            Self::Json(value) => value.to_string().into_bytes(),
        }
    }

    /// Narrows a JSON body into a typed result.
    pub fn narrow<T: DeserializeOwned>(self, endpoint: &str) -> Result<T, MailroomError> {
        let value = self.into_json(endpoint)?;
        serde_json::from_value(value).map_err(|e| MailroomError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

/// Client for the mailroom HTTP API.
///
/// The client holds no connection state of its own beyond what the
/// transport pools, and is cheap to clone.
#[derive(Clone)]
pub struct MailroomClient {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for MailroomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailroomClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MailroomClient {
    /// Creates a client using a `reqwest` transport with the configured timeout.
    ///
    /// Fails with [`MailroomError::Config`] if `config` does not validate.
    pub fn new(config: &MailroomConfig) -> Result<Self, MailroomError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client on top of any transport.
    pub fn with_transport(config: &MailroomConfig, transport: Arc<dyn Transport>) -> Self {
        let mut headers = vec![("User-Agent".to_string(), config.user_agent.clone())];
        if let Some(token) = config.auth_token.as_deref().filter(|t| !t.is_empty()) {
            headers.push(("Authorization".to_string(), format!("Token {}", token)));
        }

        Self {
            base_url: config.base_url().to_string(),
            headers,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a POST with a JSON payload to the given endpoint.
    pub(crate) async fn post(
        &self,
        endpoint: &'static str,
        payload: Value,
        encoding: Encoding,
    ) -> Result<ResponseBody, MailroomError> {
        self.request(Method::Post, endpoint, Some(payload), encoding)
            .await
    }

    /// Sends one request and classifies the response.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &'static str,
        payload: Option<Value>,
        encoding: Encoding,
    ) -> Result<ResponseBody, MailroomError> {
        let url = format!("{}/mr/{}", self.base_url, endpoint);
        let mut headers = self.headers.clone();
        let payload = payload.unwrap_or(Value::Null);

        let body = match (&encoding, method) {
            (_, Method::Get) => RequestBody::Empty,
            (Encoding::Native, Method::Post) => RequestBody::Json(payload.clone()),
            (Encoding::PassThrough, Method::Post) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                let encoded = serde_json::to_string(&payload).map_err(|e| MailroomError::Decode {
                    endpoint: endpoint.to_string(),
                    message: format!("unable to encode payload: {e}"),
                })?;
                RequestBody::Encoded(encoded)
            }
            (Encoding::Multipart(files), Method::Post) => RequestBody::Multipart {
                fields: form_fields(&payload),
                files: files.clone(),
            },
        };

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                event_type = events::REQUEST_SENT,
                endpoint = endpoint,
                payload = %serde_json::to_string_pretty(&payload).unwrap_or_default(),
                "Sending mailroom request"
            );
        }
        telemetry::record_request(endpoint);

        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    event_type = events::REQUEST_UNREACHABLE,
                    endpoint = endpoint,
                    error = %e,
                    "Mailroom request did not complete"
                );
                let error = MailroomError::from(e);
                telemetry::record_request_error(endpoint, error.kind());
                return Err(error);
            }
        };

        classify_response(endpoint, payload, response).inspect_err(|error| {
            telemetry::record_request_error(endpoint, error.kind());
        })
    }
}

/// Flattens a JSON object into multipart form fields. Arrays become repeated
/// fields and nulls are skipped.
fn form_fields(payload: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    if let Value::Object(map) = payload {
        for (name, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    fields.extend(items.iter().map(|item| (name.clone(), form_value(item))))
                }
                other => fields.push((name.clone(), form_value(other))),
            }
        }
    }
    fields
}

fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Applies the shared response classification to a raw response.
pub fn classify_response(
    endpoint: &str,
    payload: Value,
    response: HttpResponse,
) -> Result<ResponseBody, MailroomError> {
    let body = if response.is_json() {
        let value = serde_json::from_slice::<Value>(&response.body).map_err(|e| {
            MailroomError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        })?;
        ResponseBody::Json(value)
    } else {
        ResponseBody::Raw(response.body.clone())
    };

    if response.status == 422 {
        let Some(envelope) = ErrorEnvelope::parse(&body) else {
            warn!(
                event_type = events::REQUEST_FAILED,
                endpoint = endpoint,
                status = response.status,
                "Mailroom returned a 422 without a valid error envelope"
            );
            return Err(RequestError::new(endpoint, payload, response.status, response.body).into());
        };

        debug!(
            event_type = events::REQUEST_REJECTED,
            endpoint = endpoint,
            domain = %envelope.domain,
            subcode = %envelope.subcode,
            "Mailroom rejected request"
        );

        match envelope.domain.as_str() {
            "flow" => return Err(FlowValidationError::new(envelope.error).into()),
            "query" => {
                return Err(
                    QueryValidationError::new(envelope.error, envelope.subcode, envelope.extra)
                        .into(),
                )
            }
            "urn" => {
                let index = envelope
                    .extra
                    .get("index")
                    .and_then(Value::as_u64)
                    .and_then(|i| usize::try_from(i).ok());
                return match index {
                    Some(index) => Err(UrnValidationError {
                        error: envelope.error,
                        code: envelope.subcode,
                        index,
                    }
                    .into()),
                    None => Err(
                        RequestError::new(endpoint, payload, response.status, response.body).into(),
                    ),
                };
            }
            "broadcast" => return Err(EmptyBroadcastError.into()),
            other => {
                warn!(
                    event_type = events::REQUEST_UNCLASSIFIED,
                    endpoint = endpoint,
                    domain = %other,
                    "Unrecognized 422 error domain, returning body as result"
                );
            }
        }
    } else if (400..600).contains(&response.status) {
        warn!(
            event_type = events::REQUEST_FAILED,
            endpoint = endpoint,
            status = response.status,
            "Mailroom request failed"
        );
        return Err(RequestError::new(endpoint, payload, response.status, response.body).into());
    }

    Ok(body)
}

/// The body of a 422 response.
struct ErrorEnvelope {
    error: String,
    domain: String,
    subcode: String,
    extra: Map<String, Value>,
}

impl ErrorEnvelope {
    fn parse(body: &ResponseBody) -> Option<Self> {
        let ResponseBody::Json(Value::Object(map)) = body else {
            return None;
        };
        let error = map.get("error")?.as_str()?.to_string();
        let (domain, subcode) = map.get("code")?.as_str()?.split_once(':')?;
        let extra = match map.get("extra") {
            Some(Value::Object(extra)) => extra.clone(),
            _ => Map::new(),
        };

        Some(Self {
            error,
            domain: domain.to_string(),
            subcode: subcode.to_string(),
            extra,
        })
    }
}
