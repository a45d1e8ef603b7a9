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

//! Ticket endpoints. Each returns `{"changed_ids": [...]}`.

use serde_json::{json, Value};

use super::{Encoding, MailroomClient};
use crate::error::MailroomError;

impl MailroomClient {
    pub async fn ticket_assign(
        &self,
        org_id: i64,
        user_id: i64,
        ticket_ids: &[i64],
        assignee_id: Option<i64>,
    ) -> Result<Value, MailroomError> {
        let payload = json!({
            "org_id": org_id,
            "user_id": user_id,
            "ticket_ids": ticket_ids,
            "assignee_id": assignee_id,
        });

        self.post("ticket/assign", payload, Encoding::Native)
            .await?
            .into_json("ticket/assign")
    }

    pub async fn ticket_add_note(
        &self,
        org_id: i64,
        user_id: i64,
        ticket_ids: &[i64],
        note: &str,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "user_id": user_id, "ticket_ids": ticket_ids, "note": note});

        self.post("ticket/add_note", payload, Encoding::Native)
            .await?
            .into_json("ticket/add_note")
    }

    pub async fn ticket_change_topic(
        &self,
        org_id: i64,
        user_id: i64,
        ticket_ids: &[i64],
        topic_id: i64,
    ) -> Result<Value, MailroomError> {
        let payload = json!({
            "org_id": org_id,
            "user_id": user_id,
            "ticket_ids": ticket_ids,
            "topic_id": topic_id,
        });

        self.post("ticket/change_topic", payload, Encoding::Native)
            .await?
            .into_json("ticket/change_topic")
    }

    pub async fn ticket_close(
        &self,
        org_id: i64,
        user_id: i64,
        ticket_ids: &[i64],
        force: bool,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "user_id": user_id, "ticket_ids": ticket_ids, "force": force});

        self.post("ticket/close", payload, Encoding::Native)
            .await?
            .into_json("ticket/close")
    }

    pub async fn ticket_reopen(
        &self,
        org_id: i64,
        user_id: i64,
        ticket_ids: &[i64],
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "user_id": user_id, "ticket_ids": ticket_ids});

        self.post("ticket/reopen", payload, Encoding::Native)
            .await?
            .into_json("ticket/reopen")
    }
}
