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

//! Payload shapes and result narrowing for individual operations.

use mailroom_client::client::{Exclusions, Inclusions, Modifier, RequestBody};
use serde_json::{json, Value};

use crate::fixtures::test_client;

fn sent_json(body: RequestBody) -> Value {
    match body {
        RequestBody::Json(value) => value,
        RequestBody::Encoded(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("unexpected body {other:?}"),
    }
}

#[tokio::test]
async fn test_contact_modify_payload() {
    let (client, transport) = test_client();
    transport.respond_json(200, json!({"modified": {}}));

    client
        .contact_modify(1, 2, &[30], &[Modifier::name("Bob"), Modifier::language("eng")])
        .await
        .unwrap();

    let payload = sent_json(transport.last_request().body);
    assert_eq!(payload["contact_ids"], json!([30]));
    assert_eq!(
        payload["modifiers"],
        json!([
            {"type": "name", "name": "Bob"},
            {"type": "language", "language": "eng"}
        ])
    );
}

#[tokio::test]
async fn test_flow_start_preview_narrows_result() {
    let (client, transport) = test_client();
    transport.respond_json(
        200,
        json!({"query": "group = \"Farmers\"", "total": 120, "extra": "ignored"}),
    );

    let include = Inclusions {
        group_uuids: vec!["g1".to_string()],
        ..Default::default()
    };
    let exclude = Exclusions {
        non_active: true,
        ..Default::default()
    };
    let preview = client
        .flow_start_preview(1, 7, &include, &exclude)
        .await
        .unwrap();

    assert_eq!(preview.query, "group = \"Farmers\"");
    assert_eq!(preview.total, 120);

    let payload = sent_json(transport.last_request().body);
    assert_eq!(payload["flow_id"], 7);
    assert_eq!(payload["include"]["group_uuids"], json!(["g1"]));
    assert_eq!(payload["exclude"]["non_active"], true);
}

#[tokio::test]
async fn test_contact_urns_results() {
    let (client, transport) = test_client();
    transport.respond_json(
        200,
        json!({"urns": [
            {"normalized": "tel:+12065551212", "contact_id": 3, "e164": true},
            {"normalized": "tel:123", "error": "invalid number"}
        ]}),
    );

    let urns = vec!["tel:+1 206 555 1212".to_string(), "tel:123".to_string()];
    let results = client.contact_urns(1, &urns).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].contact_id, Some(3));
    assert_eq!(results[1].error.as_deref(), Some("invalid number"));
}

#[tokio::test]
async fn test_parse_query_metadata() {
    let (client, transport) = test_client();
    transport.respond_json(
        200,
        json!({
            "query": "age > 18",
            "metadata": {
                "attributes": [],
                "fields": [{"key": "age", "name": "Age"}],
                "groups": [],
                "schemes": [],
                "allow_as_group": true
            }
        }),
    );

    let parsed = client.parse_query(1, "age>18", false).await.unwrap();
    assert_eq!(parsed.query, "age > 18");
    assert_eq!(parsed.metadata.fields[0].key, "age");
    assert!(parsed.metadata.allow_as_group);
}

#[tokio::test]
async fn test_ticket_assign_unassign() {
    let (client, transport) = test_client();
    transport.respond_json(200, json!({"changed_ids": [4]}));

    client.ticket_assign(1, 2, &[4], None).await.unwrap();

    let payload = sent_json(transport.last_request().body);
    assert_eq!(payload["assignee_id"], Value::Null);
    assert_eq!(payload["ticket_ids"], json!([4]));
}

#[tokio::test]
async fn test_sim_start_sends_payload_untouched() {
    let (client, transport) = test_client();
    transport.respond_json(200, json!({"session": {}}));

    let payload: Value =
        serde_json::from_str(r#"{"org_id":1,"trigger":{"type":"manual"},"flows":[]}"#).unwrap();
    client.sim_start(&payload).await.unwrap();

    assert_eq!(
        transport.last_request().body,
        RequestBody::Encoded(r#"{"org_id":1,"trigger":{"type":"manual"},"flows":[]}"#.to_string())
    );
}
