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

//! Flow endpoints.
//!
//! Flow definitions are passed through as already decoded JSON, so these
//! calls encode their own bodies.

use serde_json::{json, Value};

use super::types::{Exclusions, Inclusions, StartPreview};
use super::{Encoding, MailroomClient};
use crate::error::MailroomError;

/// Flow spec version that definitions are migrated to by default.
pub const CURRENT_SPEC_VERSION: &str = "14.3.0";

impl MailroomClient {
    pub async fn flow_change_language(
        &self,
        flow: &Value,
        language: &str,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"flow": flow, "language": language});

        self.post("flow/change_language", payload, Encoding::PassThrough)
            .await?
            .into_json("flow/change_language")
    }

    /// Clones a flow definition, remapping dependency UUIDs.
    pub async fn flow_clone(
        &self,
        flow: &Value,
        dependency_mapping: &Value,
    ) -> Result<Value, MailroomError> {
        let payload = json!({"flow": flow, "dependency_mapping": dependency_mapping});

        self.post("flow/clone", payload, Encoding::Native)
            .await?
            .into_json("flow/clone")
    }

    /// Inspects a flow definition. Dependency checking against the org only
    /// happens when `org_id` is given.
    pub async fn flow_inspect(
        &self,
        org_id: Option<i64>,
        flow: &Value,
    ) -> Result<Value, MailroomError> {
        let mut payload = json!({"flow": flow});
        if let (Some(org_id), Value::Object(map)) = (org_id, &mut payload) {
            map.insert("org_id".to_string(), json!(org_id));
        }

        self.post("flow/inspect", payload, Encoding::PassThrough)
            .await?
            .into_json("flow/inspect")
    }

    /// Migrates a flow definition to `to_version`, or to
    /// [`CURRENT_SPEC_VERSION`] when none is given.
    pub async fn flow_migrate(
        &self,
        definition: &Value,
        to_version: Option<&str>,
    ) -> Result<Value, MailroomError> {
        let payload = json!({
            "flow": definition,
            "to_version": to_version.unwrap_or(CURRENT_SPEC_VERSION),
        });

        self.post("flow/migrate", payload, Encoding::PassThrough)
            .await?
            .into_json("flow/migrate")
    }

    pub async fn flow_start_preview(
        &self,
        org_id: i64,
        flow_id: i64,
        include: &Inclusions,
        exclude: &Exclusions,
    ) -> Result<StartPreview, MailroomError> {
        let payload = json!({
            "org_id": org_id,
            "flow_id": flow_id,
            "include": include,
            "exclude": exclude,
        });

        self.post("flow/start_preview", payload, Encoding::PassThrough)
            .await?
            .narrow("flow/start_preview")
    }
}
