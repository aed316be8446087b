//! `/generate` end to end with a fake compiler

#![cfg(unix)]

mod common;

use axum::http::StatusCode;
use common::Harness;
use docgen_core::{ArtifactDb, MemoryDb};
use docgen_server::handlers::generate::PASSES_HEADER;
use docgen_testkit::{
    ALICE_DETAILS_NAME, FAKE_PDF_HEADER, FakeCompiler, HELLO_TEMPLATE, HELLO_TEMPLATE_NAME,
    alice_details, b64, fake_pdf_for, hello_alice_rendered, register_hello_world_on_disk,
};
use serde_json::{Value, json};
use std::sync::Arc;

fn inline_hello(details: Value) -> Value {
    json!({
        "template": b64(HELLO_TEMPLATE),
        "details": details,
        "delimiters": {"left": "#!", "right": "!#"},
    })
}

fn hash_delimiters_only() -> Value {
    json!({"delimiters": {"left": "#!", "right": "!#"}})
}

#[tokio::test]
async fn test_inline_hello_world() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h.post_json("/generate", &inline_hello(alice_details())).await;

    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.headers["content-type"], "application/pdf");
    assert_eq!(
        reply.headers["content-disposition"],
        "inline; filename=\"document.pdf\""
    );
    assert_eq!(reply.headers[PASSES_HEADER], "1");
    assert_eq!(reply.body, fake_pdf_for(&hello_alice_rendered()));
    assert_eq!(h.live_workspaces(), 0);
}

#[tokio::test]
async fn test_named_artifacts_from_disk() {
    let h = Harness::new(FakeCompiler::Succeed);
    register_hello_world_on_disk(&h.root()).unwrap();

    let uri = format!(
        "/generate?tmpl={}&dtls={}",
        HELLO_TEMPLATE_NAME, ALICE_DETAILS_NAME
    );
    let reply = h.post_json(&uri, &hash_delimiters_only()).await;

    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.body, fake_pdf_for(&hello_alice_rendered()));
}

#[tokio::test]
async fn test_get_with_default_delimiters_and_empty_body() {
    let h = Harness::new(FakeCompiler::Succeed);
    let root = h.root();
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("plain.tex{{}}"), "Dear {{.name}}").unwrap();
    std::fs::write(root.join("bob.json"), r#"{"name": "bob"}"#).unwrap();

    let reply = h.get("/generate?tmpl=plain.tex&dtls=bob.json").await;

    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.body, fake_pdf_for("Dear bob"));
}

#[tokio::test]
async fn test_named_artifacts_from_database_only() {
    let db = Arc::new(MemoryDb::new());
    db.store("hello-world.tex#!!#", HELLO_TEMPLATE.as_bytes().to_vec())
        .await
        .unwrap();
    db.store(ALICE_DETAILS_NAME, alice_details().to_string().into_bytes())
        .await
        .unwrap();
    let h = Harness::with_db(FakeCompiler::Succeed, db);

    let uri = format!(
        "/generate?tmpl={}&dtls={}",
        HELLO_TEMPLATE_NAME, ALICE_DETAILS_NAME
    );
    let reply = h.post_json(&uri, &hash_delimiters_only()).await;

    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.body, fake_pdf_for(&hello_alice_rendered()));
}

#[tokio::test]
async fn test_database_outage_is_service_unavailable() {
    let db = Arc::new(MemoryDb::new());
    db.set_offline(true);
    let h = Harness::with_db(FakeCompiler::Succeed, db);

    let reply = h
        .post_json(
            "/generate?tmpl=absent.tex",
            &json!({"details": {"name": "x"}}),
        )
        .await;

    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    let body = reply.json();
    assert_eq!(body["code"], "BACKEND_UNAVAILABLE");
    assert_eq!(body["stage"], "resolving_template");
}

#[tokio::test]
async fn test_disk_hit_survives_database_outage() {
    let db = Arc::new(MemoryDb::new());
    db.set_offline(true);
    let h = Harness::with_db(FakeCompiler::Succeed, db);
    register_hello_world_on_disk(&h.root()).unwrap();

    let uri = format!(
        "/generate?tmpl={}&dtls={}",
        HELLO_TEMPLATE_NAME, ALICE_DETAILS_NAME
    );
    let reply = h.post_json(&uri, &hash_delimiters_only()).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
}

#[tokio::test]
async fn test_unknown_template_is_not_found() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h
        .post_json("/generate?tmpl=nope.tex", &json!({"details": {}}))
        .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    let body = reply.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["details"]["class"], "template");
    assert_eq!(body["details"]["identifier"], "nope.tex{{}}");
}

#[tokio::test]
async fn test_unknown_resource_is_not_found() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h
        .post_json("/generate?rsc=logo.png", &inline_hello(alice_details()))
        .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    let body = reply.json();
    assert_eq!(body["stage"], "resolving_resources");
    assert_eq!(body["details"]["class"], "resource");
}

#[tokio::test]
async fn test_missing_template_is_malformed() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h.post_json("/generate", &json!({"details": {}})).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let body = reply.json();
    assert_eq!(body["code"], "MALFORMED_INPUT");
    assert_eq!(body["stage"], "parsing_request");
}

#[tokio::test]
async fn test_invalid_json_body() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h
        .send(axum::http::Method::POST, "/generate", "{\"template\": ")
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["code"], "MALFORMED_INPUT");
}

#[tokio::test]
async fn test_unknown_policy_is_configuration_error() {
    let h = Harness::new(FakeCompiler::Succeed);
    let mut body = inline_hello(alice_details());
    body["onMissingKey"] = json!("skip");

    let reply = h.post_json("/generate", &body).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["code"], "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn test_missing_key_produces_no_document() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h.post_json("/generate", &inline_hello(json!({}))).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = reply.json();
    assert_eq!(body["code"], "MISSING_KEY");
    assert_eq!(body["stage"], "rendering");
    assert_eq!(body["details"]["key"], "name");
    assert!(!reply.text().contains(FAKE_PDF_HEADER.trim()));
    assert_eq!(h.live_workspaces(), 0);
}

#[tokio::test]
async fn test_lenient_policies() {
    let h = Harness::new(FakeCompiler::Succeed);

    let mut zero = inline_hello(json!({}));
    zero["onMissingKey"] = json!("zero");
    let reply = h.post_json("/generate", &zero).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(
        reply.body,
        fake_pdf_for(&HELLO_TEMPLATE.replace("#!.name!#", ""))
    );

    let mut nothing = inline_hello(json!({}));
    nothing["onMissingKey"] = json!("nothing");
    let reply = h.post_json("/generate", &nothing).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.body, fake_pdf_for(HELLO_TEMPLATE));
}

#[tokio::test]
async fn test_compilation_failure_cleans_workspace() {
    let h = Harness::new(FakeCompiler::Fail);

    let reply = h.post_json("/generate", &inline_hello(alice_details())).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = reply.json();
    assert_eq!(body["code"], "COMPILATION_FAILED");
    assert_eq!(body["stage"], "compiling");
    assert_eq!(body["details"]["exitCode"], 1);
    assert!(
        body["details"]["diagnostics"]
            .as_str()
            .unwrap()
            .contains("Undefined control sequence")
    );
    assert_eq!(h.live_workspaces(), 0);
}

#[tokio::test]
async fn test_missing_output_is_compilation_failure() {
    let h = Harness::new(FakeCompiler::NoOutput);

    let reply = h.post_json("/generate", &inline_hello(alice_details())).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.json()["code"], "COMPILATION_FAILED");
    assert_eq!(h.live_workspaces(), 0);
}

#[tokio::test]
async fn test_compiler_timeout() {
    let h = Harness::build(FakeCompiler::Hang, None, |config| {
        config.compiler.timeout_secs = 1;
    });

    let reply = h.post_json("/generate", &inline_hello(alice_details())).await;

    assert_eq!(reply.status, StatusCode::GATEWAY_TIMEOUT);
    let body = reply.json();
    assert_eq!(body["code"], "COMPILATION_TIMEOUT");
    assert_eq!(body["stage"], "compiling");
    assert_eq!(h.live_workspaces(), 0);
}

#[tokio::test]
async fn test_request_deadline() {
    let h = Harness::build(FakeCompiler::Hang, None, |config| {
        config.server.request_timeout_secs = 1;
        config.compiler.timeout_secs = 30;
    });

    let reply = h.post_json("/generate", &inline_hello(alice_details())).await;

    assert_eq!(reply.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(reply.json()["code"], "REQUEST_TIMEOUT");
    assert_eq!(h.live_workspaces(), 0);
}

#[tokio::test]
async fn test_rerun_pass_is_reported() {
    let h = Harness::new(FakeCompiler::RerunOnce);

    let reply = h.post_json("/generate", &inline_hello(alice_details())).await;

    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.headers[PASSES_HEADER], "2");
}

#[tokio::test]
async fn test_inline_resource_with_unsafe_name_rejected() {
    let h = Harness::new(FakeCompiler::Succeed);
    let mut body = inline_hello(alice_details());
    body["resources"] = json!({"../escape.sty": b64("x")});

    let reply = h.post_json("/generate", &body).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["stage"], "resolving_resources");
}

#[tokio::test]
async fn test_named_template_served_from_cache() {
    let h = Harness::new(FakeCompiler::Succeed);
    register_hello_world_on_disk(&h.root()).unwrap();
    let uri = format!(
        "/generate?tmpl={}&dtls={}",
        HELLO_TEMPLATE_NAME, ALICE_DETAILS_NAME
    );

    let first = h.post_json(&uri, &hash_delimiters_only()).await;
    assert_eq!(first.status, StatusCode::OK);

    // The template now only exists in the cache
    std::fs::remove_file(h.root().join("hello-world.tex#!!#")).unwrap();

    let second = h.post_json(&uri, &hash_delimiters_only()).await;
    assert_eq!(second.status, StatusCode::OK, "{}", second.text());
    assert_eq!(second.body, first.body);

    let stats = h.state.resolver().template_cache().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.len, 1);
}

#[tokio::test]
async fn test_concurrent_requests_are_isolated() {
    let h = Harness::new(FakeCompiler::Succeed);
    let names: Vec<String> = (0..8).map(|i| format!("user{}", i)).collect();

    let bodies: Vec<_> = names
        .iter()
        .map(|name| inline_hello(json!({ "name": name })))
        .collect();
    let replies = futures_util::future::join_all(
        bodies.iter().map(|body| h.post_json("/generate", body)),
    )
    .await;

    for (name, reply) in names.iter().zip(replies) {
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
        let expected = HELLO_TEMPLATE.replace("#!.name!#", name);
        assert_eq!(reply.body, fake_pdf_for(&expected));
    }
    assert_eq!(h.live_workspaces(), 0);
}

#[tokio::test]
async fn test_template_failure_reported_before_details_failure() {
    let h = Harness::new(FakeCompiler::Succeed);
    let body = json!({
        "details": ["not", "an", "object"],
        "delimiters": {"left": "#!", "right": "!#"},
    });

    for _ in 0..10 {
        let reply = h.post_json("/generate?tmpl=ghost.tex", &body).await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        let body = reply.json();
        assert_eq!(body["stage"], "resolving_template");
        assert_eq!(body["details"]["identifier"], "ghost.tex#!!#");
    }
}

#[tokio::test]
async fn test_details_failure_reported_before_resource_failure() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h
        .post_json(
            "/generate?dtls=ghost.json&rsc=logo.png",
            &json!({"template": b64(HELLO_TEMPLATE)}),
        )
        .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    let body = reply.json();
    assert_eq!(body["stage"], "resolving_details");
    assert_eq!(body["details"]["class"], "details");
}

#[tokio::test]
async fn test_first_named_missing_resource_is_reported() {
    let h = Harness::new(FakeCompiler::Succeed);

    for _ in 0..10 {
        let reply = h
            .post_json(
                "/generate?rsc=first.png&rsc=second.png",
                &inline_hello(alice_details()),
            )
            .await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        let body = reply.json();
        assert_eq!(body["stage"], "resolving_resources");
        assert_eq!(body["details"]["identifier"], "first.png");
    }
}

#[tokio::test]
async fn test_separator_delimiters_with_named_template() {
    let db = Arc::new(MemoryDb::new());
    db.store("slash.tex//\\\\", b"Dear //.name\\\\".to_vec())
        .await
        .unwrap();
    let h = Harness::with_db(FakeCompiler::Succeed, db);

    let reply = h
        .post_json(
            "/generate?tmpl=slash.tex",
            &json!({
                "details": {"name": "carol"},
                "delimiters": {"left": "//", "right": "\\\\"},
            }),
        )
        .await;

    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.body, fake_pdf_for("Dear carol"));
}
