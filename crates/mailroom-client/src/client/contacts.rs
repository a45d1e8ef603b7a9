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

//! Contact endpoints.

use serde_json::{json, Value};

use super::modifiers::Modifier;
use super::types::{ContactSpec, ParsedQuery, SearchResults, UrnResult, UrnResults};
use super::{Encoding, MailroomClient};
use crate::error::MailroomError;

impl MailroomClient {
    pub async fn contact_create(
        &self,
        org_id: i64,
        user_id: i64,
        contact: &ContactSpec,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "user_id": user_id, "contact": contact});

        self.post("contact/create", payload, Encoding::Native)
            .await?
            .into_json("contact/create")
    }

    pub async fn contact_export(
        &self,
        org_id: i64,
        group_id: i64,
        query: &str,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "group_id": group_id, "query": query});

        self.post("contact/export", payload, Encoding::Native)
            .await?
            .into_json("contact/export")
    }

    pub async fn contact_export_preview(
        &self,
        org_id: i64,
        group_id: i64,
        query: &str,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "group_id": group_id, "query": query});

        self.post("contact/export_preview", payload, Encoding::Native)
            .await?
            .into_json("contact/export_preview")
    }

    pub async fn contact_inspect(
        &self,
        org_id: i64,
        contact_ids: &[i64],
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "contact_ids": contact_ids});

        self.post("contact/inspect", payload, Encoding::Native)
            .await?
            .into_json("contact/inspect")
    }

    /// Interrupts any session the contact is in.
    pub async fn contact_interrupt(
        &self,
        org_id: i64,
        user_id: i64,
        contact_id: i64,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"org_id": org_id, "user_id": user_id, "contact_id": contact_id});

        self.post("contact/interrupt", payload, Encoding::Native)
            .await?
            .into_json("contact/interrupt")
    }

    /// Applies modifiers to contacts, returning the changes keyed by contact id.
    pub async fn contact_modify(
        &self,
        org_id: i64,
        user_id: i64,
        contact_ids: &[i64],
        modifiers: &[Modifier],
    ) -> Result<Value, MailroomError> {
        let payload = json!({
            "org_id": org_id,
            "user_id": user_id,
            "contact_ids": contact_ids,
            "modifiers": modifiers,
        });

        self.post("contact/modify", payload, Encoding::Native)
            .await?
            .into_json("contact/modify")
    }

    /// Searches a group with a contact query, returning the first page.
    pub async fn contact_search(
        &self,
        org_id: i64,
        group_id: i64,
        query: &str,
        sort: &str,
    ) -> Result<SearchResults, MailroomError> {
        self.contact_search_page(org_id, group_id, query, sort, 0, &[])
            .await
    }

    /// Searches a group with a contact query starting at `offset`, leaving
    /// out the given contact ids.
    pub async fn contact_search_page(
        &self,
        org_id: i64,
        group_id: i64,
        query: &str,
        sort: &str,
        offset: u64,
        exclude_ids: &[i64],
    ) -> Result<SearchResults, MailroomError> {
        let payload = json!({
            "org_id": org_id,
            "group_id": group_id,
            "exclude_ids": exclude_ids,
            "query": query,
            "sort": sort,
            "offset": offset,
        });

        self.post("contact/search", payload, Encoding::Native)
            .await?
            .narrow("contact/search")
    }

    /// Normalizes URNs and looks up the contacts that own them.
    pub async fn contact_urns(
        &self,
        org_id: i64,
        urns: &[String],
    ) -> Result<Vec<UrnResult>, MailroomError> {
        let payload = json!({"org_id": org_id, "urns": urns});

        let results: UrnResults = self
            .post("contact/urns", payload, Encoding::Native)
            .await?
            .narrow("contact/urns")?;
        Ok(results.urns)
    }

    pub async fn parse_query(
        &self,
        org_id: i64,
        query: &str,
        parse_only: bool,
    ) -> Result<ParsedQuery, MailroomError> {
        let payload = json!({"org_id": org_id, "query": query, "parse_only": parse_only});

        self.post("contact/parse_query", payload, Encoding::Native)
            .await?
            .narrow("contact/parse_query")
    }
}
