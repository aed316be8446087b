//! Shared harness for the HTTP tests
//!
//! Every harness owns its own registry root, work dir and caches, so tests
//! can run in parallel.

#![allow(dead_code)]

use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use docgen_compiler::{CompilerInfo, CompilerSource};
use docgen_core::{ArtifactDb, DocgenConfig};
use docgen_server::{AppState, router};
use docgen_testkit::{FakeCompiler, count_entries_settled, temp_dir_in_workspace};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct Harness {
    pub temp: TempDir,
    pub state: AppState,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Harness {
    pub fn new(compiler: FakeCompiler) -> Self {
        Self::build(compiler, None, |_| {})
    }

    pub fn with_db(compiler: FakeCompiler, db: Arc<dyn ArtifactDb>) -> Self {
        Self::build(compiler, Some(db), |_| {})
    }

    pub fn build(
        compiler: FakeCompiler,
        db: Option<Arc<dyn ArtifactDb>>,
        configure: impl FnOnce(&mut DocgenConfig),
    ) -> Self {
        let temp = temp_dir_in_workspace();
        let script = compiler.install(temp.path()).unwrap();

        let mut config = DocgenConfig::default();
        config.storage.root_dir = temp.path().join("registry");
        config.storage.work_dir = temp.path().join("work");
        config.compiler.timeout_secs = 10;
        configure(&mut config);

        let info = CompilerInfo {
            source: CompilerSource::Explicit,
            path: script,
        };
        let state = AppState::new(config, db, info).unwrap();
        Self { temp, state }
    }

    pub fn root(&self) -> PathBuf {
        self.state.config().storage.root_dir.clone()
    }

    /// Workspaces currently present under the work dir
    pub fn live_workspaces(&self) -> usize {
        count_entries_settled(&self.state.config().storage.work_dir)
    }

    pub async fn send(&self, method: Method, uri: &str, body: impl Into<Body>) -> Reply {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();

        let response = router(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Reply {
        self.send(Method::POST, uri, body.to_string()).await
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.send(Method::GET, uri, Body::empty()).await
    }

    pub async fn put(&self, uri: &str, body: impl Into<Body>) -> Reply {
        self.send(Method::PUT, uri, body).await
    }
}
