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

//! Message and broadcast endpoints.

use serde_json::{json, Value};

use super::types::{BroadcastPreview, Exclusions, Inclusions, ScheduleSpec};
use super::{Encoding, MailroomClient};
use crate::error::MailroomError;

/// A broadcast to be created by `msg/broadcast`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Broadcast {
    pub org_id: i64,
    pub user_id: i64,
    /// Language code to `{text, attachments, quick_replies}`
    pub translations: Value,
    pub base_language: String,
    pub group_ids: Vec<i64>,
    pub contact_ids: Vec<i64>,
    pub urns: Vec<String>,
    pub query: String,
    pub node_uuid: String,
    pub optin_id: Option<i64>,
    pub schedule: Option<ScheduleSpec>,
}

impl Broadcast {
    fn to_payload(&self) -> Value {
        json!({
            "org_id": self.org_id,
            "user_id": self.user_id,
            "translations": self.translations,
            "base_language": self.base_language,
            "group_ids": self.group_ids,
            "contact_ids": self.contact_ids,
            "urns": self.urns,
            "query": self.query,
            "node_uuid": self.node_uuid,
            "optin_id": self.optin_id,
            "schedule": self.schedule,
        })
    }
}

impl MailroomClient {
    /// Creates a broadcast, sending it now or on its schedule.
    ///
    /// Fails with [`crate::error::EmptyBroadcastError`] if it would reach
    /// nobody.
    pub async fn msg_broadcast(&self, broadcast: &Broadcast) -> Result<Value, MailroomError> {
        self.post("msg/broadcast", broadcast.to_payload(), Encoding::PassThrough)
            .await?
            .into_json("msg/broadcast")
    }

    pub async fn msg_broadcast_preview(
        &self,
        org_id: i64,
        include: &Inclusions,
        exclude: &Exclusions,
    ) -> Result<BroadcastPreview, MailroomError> {
        let payload = json!({"org_id": org_id, "include": include, "exclude": exclude});

        self.post("msg/broadcast_preview", payload, Encoding::PassThrough)
            .await?
            .narrow("msg/broadcast_preview")
    }

    /// Hands incoming messages to mailroom for handling.
    pub async fn msg_handle(&self, org_id: i64, msg_ids: &[i64]) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "msg_ids": msg_ids});

        self.post("msg/handle", payload, Encoding::Native)
            .await?
            .into_json("msg/handle")
    }

    pub async fn msg_resend(&self, org_id: i64, msg_ids: &[i64]) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "msg_ids": msg_ids});

        self.post("msg/resend", payload, Encoding::Native)
            .await?
            .into_json("msg/resend")
    }

    /// Sends a single message to a contact, optionally as a ticket reply.
    pub async fn msg_send(
        &self,
        org_id: i64,
        user_id: i64,
        contact_id: i64,
        text: &str,
        attachments: &[String],
        ticket_id: Option<i64>,
    ) -> Result<Value, MailroomError> {
        let payload = json!({
            "org_id": org_id,
            "user_id": user_id,
            "contact_id": contact_id,
            "text": text,
            "attachments": attachments,
            "ticket_id": ticket_id,
        });

        self.post("msg/send", payload, Encoding::Native)
            .await?
            .into_json("msg/send")
    }
}
