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

//! Request and response types for mailroom endpoints.
//!
//! Request-side types serialize with the exact field names mailroom expects;
//! the unit tests below pin each mapping. Response-side types deserialize
//! the subset of the response the caller needs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A contact to be created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactSpec {
    pub name: String,
    pub language: String,
    pub urns: Vec<String>,
    /// Field key to value
    pub fields: BTreeMap<String, String>,
    /// Group UUIDs
    pub groups: Vec<String>,
}

/// Who to include in a flow start or broadcast.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inclusions {
    pub group_uuids: Vec<String>,
    pub contact_uuids: Vec<String>,
    pub query: String,
}

/// Who to leave out of a flow start or broadcast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exclusions {
    /// Blocked, stopped or archived contacts
    pub non_active: bool,
    /// Contacts currently in a flow (including this one)
    pub in_a_flow: bool,
    /// Contacts who have been in this flow in the last 90 days
    pub started_previously: bool,
    /// Contacts not seen for more than this many days (0 disables)
    pub not_seen_since_days: u32,
}

/// Schedule for a broadcast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSpec {
    /// ISO-8601 start time
    pub start: String,
    pub repeat_period: String,
    pub repeat_days_of_week: Option<String>,
}

/// What a contact query refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryMetadata {
    pub attributes: Vec<String>,
    pub schemes: Vec<String>,
    pub fields: Vec<FieldReference>,
    pub groups: Vec<GroupReference>,
    pub allow_as_group: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReference {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReference {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsedQuery {
    pub query: String,
    #[serde(default)]
    pub metadata: QueryMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub total: u64,
    pub contact_ids: Vec<i64>,
    #[serde(default)]
    pub metadata: QueryMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartPreview {
    pub query: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BroadcastPreview {
    pub query: String,
    pub total: u64,
}

/// Resolution of a single URN.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UrnResult {
    pub normalized: String,
    #[serde(default)]
    pub contact_id: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub e164: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UrnResults {
    pub urns: Vec<UrnResult>,
}
