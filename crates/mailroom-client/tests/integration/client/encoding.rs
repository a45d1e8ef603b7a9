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

//! Request construction: URL, headers and body encoding per endpoint.

use mailroom_client::client::{Method, RequestBody, CURRENT_SPEC_VERSION};
use serde_json::{json, Value};

use crate::fixtures::test_client;

#[tokio::test]
async fn test_native_encoding_leaves_serialization_to_transport() {
    let (client, transport) = test_client();
    transport.respond_json(200, json!({"query": "", "contact_ids": [], "total": 0}));

    client.contact_search(1, 2, "age > 10", "-created_on").await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "http://mailroom.test:8090/mr/contact/search");
    assert_eq!(request.header("Content-Type"), None);
    assert_eq!(
        request.body,
        RequestBody::Json(json!({
            "org_id": 1,
            "group_id": 2,
            "exclude_ids": [],
            "query": "age > 10",
            "sort": "-created_on",
            "offset": 0
        }))
    );
}

#[tokio::test]
async fn test_pass_through_encoding_is_byte_exact() {
    let (client, transport) = test_client();
    transport.respond_json(200, json!({"uuid": "f1"}));

    // key order and number text must survive untouched
    let definition: Value =
        serde_json::from_str(r#"{"uuid":"f1","name":"Café","zeta":1,"alpha":1.230}"#).unwrap();
    client.flow_migrate(&definition, None).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.url, "http://mailroom.test:8090/mr/flow/migrate");
    assert_eq!(request.header("content-type"), Some("application/json"));

    let expected = format!(
        r#"{{"flow":{{"uuid":"f1","name":"Café","zeta":1,"alpha":1.230}},"to_version":"{}"}}"#,
        CURRENT_SPEC_VERSION
    );
    assert_eq!(request.body, RequestBody::Encoded(expected));
}

#[tokio::test]
async fn test_auth_and_user_agent_headers() {
    let (client, transport) = test_client();
    transport.respond_json(200, json!({}));

    client.msg_handle(1, &[2, 3]).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.header("Authorization"), Some("Token sesame"));
    assert_eq!(request.header("User-Agent"), Some("Temba"));
}

#[tokio::test]
async fn test_version_check_is_a_get() {
    let (client, transport) = test_client();
    transport.respond_json(200, json!({"component": "mailroom", "version": "9.1.0"}));

    let version = client.version().await.unwrap();
    assert_eq!(version.as_deref(), Some("9.1.0"));

    let request = transport.last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "http://mailroom.test:8090/mr/");
    assert_eq!(request.body, RequestBody::Empty);
}

#[tokio::test]
async fn test_po_import_is_multipart() {
    let (client, transport) = test_client();
    transport.respond_json(200, json!({"flows": []}));

    client
        .po_import(1, &[10, 11], "spa", b"msgid \"Hi\"".to_vec())
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(request.url, "http://mailroom.test:8090/mr/po/import");
    let RequestBody::Multipart { fields, files } = request.body else {
        panic!("expected multipart body");
    };
    assert_eq!(
        fields,
        vec![
            ("org_id".to_string(), "1".to_string()),
            ("flow_ids".to_string(), "10".to_string()),
            ("flow_ids".to_string(), "11".to_string()),
            ("language".to_string(), "spa".to_string()),
        ]
    );
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].field, "po");
    assert_eq!(files[0].content, b"msgid \"Hi\"".to_vec());
}

#[tokio::test]
async fn test_po_export_returns_raw_bytes() {
    let (client, transport) = test_client();
    transport.respond_raw(200, "text/x-gettext-translation", b"msgid \"\"\n".to_vec());

    let po = client.po_export(1, &[10], "spa").await.unwrap();
    assert_eq!(po, b"msgid \"\"\n".to_vec());
}
