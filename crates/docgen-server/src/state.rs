use docgen_compiler::{CompilerInfo, ExecOptions};
use docgen_core::{ArtifactDb, DocgenConfig, Resolver, Result, WorkspaceManager};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Shared state of the HTTP service
///
/// Caches live inside the resolver and are owned here, so separate
/// instances (one per test, say) never share entries.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: DocgenConfig,
    resolver: Resolver,
    workspaces: WorkspaceManager,
    exec: ExecOptions,
    compiler: CompilerInfo,
    started: Instant,
    next_request: AtomicU64,
}

impl AppState {
    pub fn new(
        config: DocgenConfig,
        db: Option<Arc<dyn ArtifactDb>>,
        compiler: CompilerInfo,
    ) -> Result<Self> {
        config.validate()?;
        let resolver = Resolver::from_config(&config, db)?;
        let workspaces = WorkspaceManager::new(&config.storage.work_dir)?;
        let exec = ExecOptions::new(&compiler, &config.compiler);

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                resolver,
                workspaces,
                exec,
                compiler,
                started: Instant::now(),
                next_request: AtomicU64::new(1),
            }),
        })
    }

    pub fn config(&self) -> &DocgenConfig {
        &self.inner.config
    }

    pub fn resolver(&self) -> &Resolver {
        &self.inner.resolver
    }

    pub fn workspaces(&self) -> &WorkspaceManager {
        &self.inner.workspaces
    }

    pub fn exec_options(&self) -> &ExecOptions {
        &self.inner.exec
    }

    pub fn compiler(&self) -> &CompilerInfo {
        &self.inner.compiler
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.inner.started.elapsed().as_secs()
    }

    /// Monotonic id used to correlate log lines of one request
    pub fn next_request_id(&self) -> u64 {
        self.inner.next_request.fetch_add(1, Ordering::Relaxed)
    }

    /// Log cache counters, called on shutdown
    pub fn log_cache_stats(&self) {
        let templates = self.resolver().template_cache().stats();
        let resources = self.resolver().resource_cache().stats();
        tracing::info!(
            template_hits = templates.hits,
            template_misses = templates.misses,
            template_evictions = templates.evictions,
            resource_hits = resources.hits,
            resource_misses = resources.misses,
            resource_evictions = resources.evictions,
            "cache statistics"
        );
    }
}
