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


//! Implementation of the `version` command.

use anyhow::{Context, Result};
use mailroom_client::{MailroomClient, Settings};

pub async fn run(settings: &Settings) -> Result<()> {
    let client = MailroomClient::new(&settings.mailroom)?;
    let version = client
        .version()
        .await
        .with_context(|| format!("Unable to reach mailroom at {}", client.base_url()))?;

    match version {
        Some(version) => println!("{}", version),
        None => println!("mailroom at {} did not report a version", client.base_url()),
    }
    Ok(())
}
