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

//! Shared test fixtures.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use mailroom_client::client::{HttpRequest, HttpResponse, Transport};
use mailroom_client::{MailroomClient, MailroomConfig, TransportError};
use parking_lot::Mutex;
use serde_json::Value;

/// Transport that records every request and replays queued responses.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_json(&self, status: u16, body: Value) {
        self.respond_raw(status, "application/json", body.to_string().into_bytes());
    }

    pub fn respond_raw(&self, status: u16, content_type: &str, body: Vec<u8>) {
        self.responses.lock().push_back(Ok(HttpResponse {
            status,
            content_type: Some(content_type.to_string()),
            body,
        }));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .push_back(Err(TransportError::Other(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no response queued".to_string())))
    }
}

pub fn test_config() -> MailroomConfig {
    MailroomConfig::builder()
        .base_url("http://mailroom.test:8090/")
        .auth_token("sesame")
        .build()
}

pub fn test_client() -> (MailroomClient, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let client = MailroomClient::with_transport(&test_config(), transport.clone());
    (client, transport)
}
