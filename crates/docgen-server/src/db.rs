//! PostgreSQL-backed artifact store
//!
//! Artifacts live in a single `artifacts(id, payload)` table. Any pool or
//! connection failure is reported as [`StoreError::Unavailable`] so the
//! resolver can tell an outage apart from an unregistered identifier.

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use docgen_core::config::DatabaseConfig;
use docgen_core::{ArtifactDb, DocgenError, Result, StoreError};
use tokio_postgres::NoTls;

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS artifacts (id TEXT PRIMARY KEY, payload BYTEA NOT NULL)";
const UPSERT: &str = "INSERT INTO artifacts (id, payload) VALUES ($1, $2) \
     ON CONFLICT (id) DO UPDATE SET payload = EXCLUDED.payload";
const SELECT: &str = "SELECT payload FROM artifacts WHERE id = $1";

#[derive(Clone)]
pub struct PgArtifactDb {
    pool: Pool,
}

impl PgArtifactDb {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a pool from `[database]`. Returns `Ok(None)` when no URL is set.
    ///
    /// No connection is opened here; the first query does that.
    pub fn from_config(config: &DatabaseConfig) -> Result<Option<Self>> {
        let Some(url) = config.url.as_ref() else {
            return Ok(None);
        };

        let mut cfg = Config::new();
        cfg.url = Some(url.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(config.pool_size));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| DocgenError::Configuration(format!("failed to create pool: {}", e)))?;

        Ok(Some(Self::new(pool)))
    }

    /// Create the artifacts table if it does not exist yet
    pub async fn migrate(&self) -> std::result::Result<(), StoreError> {
        let conn = self.conn().await?;
        conn.batch_execute(CREATE_TABLE).await.map_err(unavailable)?;
        Ok(())
    }

    async fn conn(&self) -> std::result::Result<deadpool_postgres::Object, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(format!("database pool: {}", e)))
    }
}

fn unavailable(err: tokio_postgres::Error) -> StoreError {
    StoreError::Unavailable(format!("database query: {}", err))
}

#[async_trait]
impl ArtifactDb for PgArtifactDb {
    async fn store(&self, id: &str, payload: Vec<u8>) -> std::result::Result<(), StoreError> {
        let conn = self.conn().await?;
        conn.execute(UPSERT, &[&id, &payload])
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn fetch(&self, id: &str) -> std::result::Result<Vec<u8>, StoreError> {
        let conn = self.conn().await?;
        let row = conn.query_opt(SELECT, &[&id]).await.map_err(unavailable)?;
        match row {
            Some(row) => row
                .try_get::<_, Vec<u8>>(0)
                .map_err(unavailable),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn ping(&self) -> std::result::Result<(), StoreError> {
        let conn = self.conn().await?;
        conn.simple_query("SELECT 1").await.map_err(unavailable)?;
        Ok(())
    }
}
