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

//! Contact modifiers passed to `contact/modify`.
//!
//! Each modifier describes one change to a contact and is serialized as an
//! object with a `type` tag followed by its own fields.

use serde::Serialize;

use super::types::{FieldReference, GroupReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Active,
    Blocked,
    Stopped,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupModification {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrnModification {
    Append,
    Set,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Modifier {
    Name {
        name: String,
    },
    Language {
        language: String,
    },
    Field {
        field: FieldReference,
        value: String,
    },
    Status {
        status: ContactStatus,
    },
    Groups {
        groups: Vec<GroupReference>,
        modification: GroupModification,
    },
    Urns {
        urns: Vec<String>,
        modification: UrnModification,
    },
}

impl Modifier {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name { name: name.into() }
    }

    pub fn language(language: impl Into<String>) -> Self {
        Self::Language {
            language: language.into(),
        }
    }

    pub fn field(key: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            field: FieldReference {
                key: key.into(),
                name: name.into(),
            },
            value: value.into(),
        }
    }

    pub fn status(status: ContactStatus) -> Self {
        Self::Status { status }
    }
}
