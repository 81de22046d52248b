// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use gqlms::credentials::CredentialSet;
use gqlms::graphql_introspection::SchemaIntrospector;
use gqlms::http_client::HttpClient;
use gqlms::payloads::PayloadSynthesizer;
use serde_json::json;
use std::sync::Arc;
use wiremock::{
    matchers::{body_partial_json, header, method},
    Mock, MockServer, ResponseTemplate,
};

fn introspector() -> SchemaIntrospector {
    SchemaIntrospector::new(Arc::new(HttpClient::new(10).unwrap()))
}

#[tokio::test]
async fn test_fetch_mutations_sends_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer t"))
        .and(body_partial_json(json!({"operationName": "IntrospectMutations"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"__schema": {"mutationType": {"fields": [
                {"name": "logout", "args": []},
                {"name": "setRole", "args": [
                    {"name": "role", "type": {"kind": "ENUM", "name": "Role", "ofType": null}}
                ]}
            ]}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = CredentialSet::new().with_header("Authorization", "Bearer t");
    let mutations = introspector()
        .fetch_mutations(&server.uri(), &credentials)
        .await
        .unwrap();

    let names: Vec<&str> = mutations.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["logout", "setRole"]);
}

#[tokio::test]
async fn test_html_error_page_yields_no_mutations() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let mutations = introspector()
        .fetch_mutations(&server.uri(), &CredentialSet::new())
        .await
        .unwrap();

    assert!(mutations.is_empty());
}

#[tokio::test]
async fn test_input_type_cache_across_mutations() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "IntrospectMutations"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"__schema": {"mutationType": {"fields": [
                {"name": "createPost", "args": [
                    {"name": "input", "type": {"kind": "INPUT_OBJECT", "name": "PostInput", "ofType": null}}
                ]},
                {"name": "updatePost", "args": [
                    {"name": "input", "type": {"kind": "INPUT_OBJECT", "name": "PostInput", "ofType": null}}
                ]}
            ]}}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "IntrospectInputType"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"__type": {"name": "PostInput", "inputFields": [
                {"name": "title", "type": {"kind": "SCALAR", "name": "String", "ofType": null}},
                {"name": "draft", "type": {"kind": "SCALAR", "name": "Boolean", "ofType": null}}
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = CredentialSet::new();
    let introspector = introspector();
    let mutations = introspector
        .fetch_mutations(&server.uri(), &credentials)
        .await
        .unwrap();

    let mut synthesizer = PayloadSynthesizer::new(introspector).with_cache(true);
    for mutation in &mutations {
        let document = synthesizer
            .synthesize(mutation, &server.uri(), &credentials)
            .await;
        assert_eq!(
            document.variables["input"],
            json!({"title": "gqlmsTestValue", "draft": false})
        );
        assert!(document.query.contains("$input: PostInput)"));
    }
}
