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

//! Service, Android relayer, translation and simulator endpoints.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::transport::{FilePart, Method};
use super::{Encoding, MailroomClient};
use crate::error::MailroomError;

impl MailroomClient {
    /// Returns the version mailroom reports, if any.
    pub async fn version(&self) -> Result<Option<String>, MailroomError> {
        let body = self
            .request(Method::Get, "", None, Encoding::Native)
            .await?
            .into_json("")?;

        Ok(body.get("version").and_then(Value::as_str).map(str::to_string))
    }

    /// Records a call or other channel event reported by an Android relayer.
    pub async fn android_event(
        &self,
        org_id: i64,
        channel_id: i64,
        phone: &str,
        event_type: &str,
        extra: &Value,
        occurred_on: DateTime<Utc>,
    ) -> Result<Value, MailroomError> {
        let payload = json!({
            "org_id": org_id,
            "channel_id": channel_id,
            "phone": phone,
            "event_type": event_type,
            "extra": extra,
            "occurred_on": occurred_on.to_rfc3339(),
        });

        self.post("android/event", payload, Encoding::Native)
            .await?
            .into_json("android/event")
    }

    /// Records an incoming message reported by an Android relayer.
    pub async fn android_message(
        &self,
        org_id: i64,
        channel_id: i64,
        phone: &str,
        text: &str,
        received_on: DateTime<Utc>,
    ) -> Result<Value, MailroomError> {
        let payload = json!({
            "org_id": org_id,
            "channel_id": channel_id,
            "phone": phone,
            "text": text,
            "received_on": received_on.to_rfc3339(),
        });

        self.post("android/message", payload, Encoding::Native)
            .await?
            .into_json("android/message")
    }

    /// Exports flow translations as a PO file.
    pub async fn po_export(
        &self,
        org_id: i64,
        flow_ids: &[i64],
        language: &str,
    ) -> Result<Vec<u8>, MailroomError> {
        let payload = json!({"org_id": org_id, "flow_ids": flow_ids, "language": language});

        Ok(self
            .post("po/export", payload, Encoding::Native)
            .await?
            .into_bytes())
    }

    /// Imports translations from a PO file, returning the updated flow
    /// definitions.
    pub async fn po_import(
        &self,
        org_id: i64,
        flow_ids: &[i64],
        language: &str,
        po_data: Vec<u8>,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "flow_ids": flow_ids, "language": language});
        let file = FilePart {
            field: "po".to_string(),
            filename: "po".to_string(),
            content: po_data,
        };

        self.post("po/import", payload, Encoding::Multipart(vec![file]))
            .await?
            .into_json("po/import")
    }

    /// Starts a simulator session. The payload is built by the simulator UI
    /// and passed through untouched.
    pub async fn sim_start(&self, payload: &Value) -> Result<Value, MailroomError> {
        self.post("sim/start", payload.clone(), Encoding::PassThrough)
            .await?
            .into_json("sim/start")
    }

    pub async fn sim_resume(&self, payload: &Value) -> Result<Value, MailroomError> {
        self.post("sim/resume", payload.clone(), Encoding::PassThrough)
            .await?
            .into_json("sim/resume")
    }
}
