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

//! Response classification through full client calls.

use mailroom_client::client::ContactSpec;
use mailroom_client::{Broadcast, MailroomError};
use serde_json::json;

use crate::fixtures::test_client;

#[tokio::test]
async fn test_contact_search_returns_results() {
    let (client, transport) = test_client();
    transport.respond_json(
        200,
        json!({
            "query": "age > 10",
            "contact_ids": [1, 2],
            "total": 2,
            "metadata": {"attributes": ["age"]}
        }),
    );

    let results = client
        .contact_search(1, 2, "age > 10", "-created_on")
        .await
        .unwrap();

    assert_eq!(results.query, "age > 10");
    assert_eq!(results.contact_ids, vec![1, 2]);
    assert_eq!(results.total, 2);
    assert_eq!(results.metadata.attributes, vec!["age".to_string()]);
}

#[tokio::test]
async fn test_contact_search_unknown_property() {
    let (client, transport) = test_client();
    transport.respond_json(
        422,
        json!({
            "error": "no such field age",
            "code": "query:unknown_property",
            "extra": {"property": "age"}
        }),
    );

    let err = client
        .contact_search(1, 2, "age > 10", "-created_on")
        .await
        .unwrap_err();

    let MailroomError::QueryValidation(err) = err else {
        panic!("expected query validation error, got {err:?}");
    };
    assert_eq!(err.error, "no such field age");
    assert_eq!(err.code, "unknown_property");
    assert_eq!(err.extra.get("property"), Some(&json!("age")));
    assert_eq!(err.to_string(), "Can't resolve 'age' to a field or URN scheme.");
}

#[tokio::test]
async fn test_flow_migrate_invalid_definition() {
    let (client, transport) = test_client();
    transport.respond_json(
        422,
        json!({"error": "missing field: uuid", "code": "flow:invalid"}),
    );

    let err = client.flow_migrate(&json!({"nodes": []}), None).await.unwrap_err();
    assert!(err.is_user_facing());
    let MailroomError::FlowValidation(err) = err else {
        panic!("expected flow validation error");
    };
    assert_eq!(err.error, "missing field: uuid");
}

#[tokio::test]
async fn test_contact_create_invalid_urn() {
    let (client, transport) = test_client();
    transport.respond_json(
        422,
        json!({"error": "URN 1 is taken", "code": "urn:taken", "extra": {"index": 1}}),
    );

    let contact = ContactSpec {
        name: "Bob".to_string(),
        urns: vec!["tel:+1206".to_string(), "tel:+1207".to_string()],
        ..Default::default()
    };
    let err = client.contact_create(1, 3, &contact).await.unwrap_err();
    let MailroomError::UrnValidation(err) = err else {
        panic!("expected urn validation error");
    };
    assert_eq!(err.code, "taken");
    assert_eq!(err.index, 1);
}

#[tokio::test]
async fn test_broadcast_without_recipients() {
    let (client, transport) = test_client();
    transport.respond_json(
        422,
        json!({"error": "broadcast has no recipients", "code": "broadcast:no_recipients"}),
    );

    let err = client.msg_broadcast(&Broadcast::default()).await.unwrap_err();
    assert!(matches!(err, MailroomError::EmptyBroadcast(_)));
    assert_eq!(err.to_string(), "This broadcast has no recipients.");
}

#[tokio::test]
async fn test_unknown_domain_is_returned_as_result() {
    let (client, transport) = test_client();
    let body = json!({"error": "odd", "code": "campaign:busy"});
    transport.respond_json(422, body.clone());

    let result = client.msg_handle(1, &[5]).await.unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_server_error_keeps_request_context() {
    let (client, transport) = test_client();
    transport.respond_json(500, json!({"error": "database unavailable"}));

    let err = client.ticket_close(1, 2, &[3], false).await.unwrap_err();
    assert!(!err.is_user_facing());
    let MailroomError::Request(err) = err else {
        panic!("expected request error");
    };
    assert_eq!(err.endpoint, "ticket/close");
    assert_eq!(err.status, 500);
    assert_eq!(err.error, "database unavailable");
    assert_eq!(err.payload["ticket_ids"], json!([3]));
}

#[tokio::test]
async fn test_transport_failure_is_propagated() {
    let (client, transport) = test_client();
    transport.fail("connection reset");

    let err = client.msg_resend(1, &[9]).await.unwrap_err();
    assert!(matches!(err, MailroomError::Transport(_)));
    assert_eq!(transport.requests().len(), 1);
}
