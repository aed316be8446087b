//! `/register` and `/health`

#![cfg(unix)]

mod common;

use axum::http::StatusCode;
use common::Harness;
use docgen_core::{ArtifactDb, MemoryDb};
use docgen_testkit::{FakeCompiler, HELLO_TEMPLATE, alice_details, fake_pdf_for, hello_alice_rendered};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_register_then_generate_by_name() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h
        .put("/register/template/hello.tex?left=%23!&right=!%23", HELLO_TEMPLATE)
        .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());
    let body = reply.json();
    assert_eq!(body["id"], "hello.tex#!!#");
    assert_eq!(body["class"], "template");
    assert_eq!(body["storedIn"], "disk");

    let reply = h
        .put("/register/details/alice.json", alice_details().to_string())
        .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());

    let reply = h
        .post_json(
            "/generate?tmpl=hello.tex&dtls=alice.json",
            &json!({"delimiters": {"left": "#!", "right": "!#"}}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.body, fake_pdf_for(&hello_alice_rendered()));
}

#[tokio::test]
async fn test_reregistered_template_replaces_cached_copy() {
    let h = Harness::new(FakeCompiler::Succeed);
    h.put("/register/template/t.tex", "v1 {{.n}}").await;
    h.put("/register/details/d.json", r#"{"n": 1}"#).await;

    let first = h.get("/generate?tmpl=t.tex&dtls=d.json").await;
    assert_eq!(first.body, fake_pdf_for("v1 1"));

    h.put("/register/template/t.tex", "v2 {{.n}}").await;
    let second = h.get("/generate?tmpl=t.tex&dtls=d.json").await;
    assert_eq!(second.body, fake_pdf_for("v2 1"));
}

#[tokio::test]
async fn test_register_prefers_database() {
    let db = Arc::new(MemoryDb::new());
    let h = Harness::with_db(FakeCompiler::Succeed, db.clone());

    let reply = h.put("/register/resource/logo.png", "png-bytes").await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.json()["storedIn"], "database");
    assert_eq!(db.fetch("logo.png").await.unwrap(), b"png-bytes");
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h.put("/register/stylesheet/a.css", "x").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["code"], "MALFORMED_INPUT");

    let reply = h.put("/register/details/d.json", "not json").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = h.put("/register/template/t.tex?left=%7B", "x").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["code"], "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn test_health_without_database() {
    let h = Harness::new(FakeCompiler::Succeed);

    let reply = h.get("/health").await;

    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "disabled");
    assert_eq!(body["templateCache"]["capacity"], 64);
}

#[tokio::test]
async fn test_health_reports_database_outage() {
    let db = Arc::new(MemoryDb::new());
    let h = Harness::with_db(FakeCompiler::Succeed, db.clone());

    let reply = h.get("/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["database"]["status"], "healthy");

    db.set_offline(true);
    let reply = h.get("/health").await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    let body = reply.json();
    assert_eq!(body["status"], "unhealthy");
    assert!(body["database"]["error"].is_string());
}

#[tokio::test]
async fn test_body_limit() {
    let h = Harness::build(FakeCompiler::Succeed, None, |config| {
        config.server.max_body_bytes = 16;
    });

    let reply = h
        .put("/register/resource/big.bin", vec![b'x'; 1024])
        .await;

    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
}
