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


//! Implementation of the `query parse` command.

use anyhow::{bail, Result};
use mailroom_client::{MailroomClient, MailroomError, Settings};

pub async fn parse(settings: &Settings, org_id: i64, query: &str, parse_only: bool) -> Result<()> {
    let client = MailroomClient::new(&settings.mailroom)?;

    let parsed = match client.parse_query(org_id, query, parse_only).await {
        Ok(parsed) => parsed,
        // the message is written for end users, show it as is
        Err(MailroomError::QueryValidation(e)) => bail!("Invalid query: {}", e),
        Err(e) => return Err(e.into()),
    };

    let metadata = &parsed.metadata;
    println!("query:      {}", parsed.query);
    if !metadata.attributes.is_empty() {
        println!("attributes: {}", metadata.attributes.join(", "));
    }
    if !metadata.schemes.is_empty() {
        println!("schemes:    {}", metadata.schemes.join(", "));
    }
    for field in &metadata.fields {
        println!("field:      {} ({})", field.key, field.name);
    }
    for group in &metadata.groups {
        println!("group:      {} ({})", group.name, group.uuid);
    }
    println!("as group:   {}", if metadata.allow_as_group { "yes" } else { "no" });
    Ok(())
}
