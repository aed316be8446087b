//! Artifact resolution across inline payloads and the storage tiers
//!
//! Named templates and resources are looked up cache → disk → database and
//! back-filled into their class cache on a lower-tier hit. Details are not
//! cached and go disk → database. A tier that cannot be consulted counts as
//! a miss unless it is the last tier, where the outage is reported as
//! [`DocgenError::BackendUnavailable`] rather than [`DocgenError::NotFound`].
//!
//! The resolver only reads disk and database; registration lives in
//! [`crate::registry`].

use crate::artifact::{ArtifactClass, Provenance};
use crate::cache::{BoundedCache, CachedBytes};
use crate::config::DocgenConfig;
use crate::details::Details;
use crate::error::{DocgenError, Result};
use crate::path::validate_artifact_name;
use crate::source::{ByteSource, CacheSource, DatabaseSource, DiskSource, Lookup, Tier};
use crate::store::ArtifactDb;
use crate::template::Delimiters;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::join_all;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolved resources keyed by the file name they are written under
pub type ResourceMap = BTreeMap<String, CachedBytes>;

pub struct Resolver {
    templates: CacheSource,
    resources: CacheSource,
    disk: DiskSource,
    database: Option<DatabaseSource>,
}

impl Resolver {
    pub fn new(
        template_cache: Arc<BoundedCache>,
        resource_cache: Arc<BoundedCache>,
        disk: DiskSource,
        db: Option<Arc<dyn ArtifactDb>>,
    ) -> Self {
        Self {
            templates: CacheSource::new(template_cache),
            resources: CacheSource::new(resource_cache),
            disk,
            database: db.map(DatabaseSource::new),
        }
    }

    /// Build caches and the disk tier from configuration
    pub fn from_config(config: &DocgenConfig, db: Option<Arc<dyn ArtifactDb>>) -> Result<Self> {
        let template_cache = BoundedCache::new("template", config.cache.template_capacity)?;
        let resource_cache = BoundedCache::new("resource", config.cache.resource_capacity)?;
        Ok(Self::new(
            Arc::new(template_cache),
            Arc::new(resource_cache),
            DiskSource::new(&config.storage.root_dir),
            db,
        ))
    }

    pub fn template_cache(&self) -> &Arc<BoundedCache> {
        self.templates.cache()
    }

    pub fn resource_cache(&self) -> &Arc<BoundedCache> {
        self.resources.cache()
    }

    pub fn disk(&self) -> &DiskSource {
        &self.disk
    }

    pub fn database(&self) -> Option<&Arc<dyn ArtifactDb>> {
        self.database.as_ref().map(DatabaseSource::db)
    }

    /// Template bytes for an inline base64 payload or a registered name
    pub async fn resolve_template(
        &self,
        provenance: Provenance<String>,
        delimiters: &Delimiters,
    ) -> Result<CachedBytes> {
        match provenance {
            Provenance::Inline(encoded) => decode_inline(ArtifactClass::Template, "template", &encoded),
            Provenance::Named(name) => {
                let id = template_id(&name, delimiters)?;
                self.resolve_named(ArtifactClass::Template, &id).await
            }
        }
    }

    /// Details passed through inline or parsed from a registered JSON document
    pub async fn resolve_details(&self, provenance: Provenance<Value>) -> Result<Details> {
        match provenance {
            Provenance::Inline(value) => Details::from_value(value),
            Provenance::Named(name) => {
                check_name(ArtifactClass::Details, &name)?;
                let bytes = self.resolve_named(ArtifactClass::Details, &name).await?;
                Details::from_slice(&bytes)
            }
        }
    }

    /// Resolve every resource of a request.
    ///
    /// Inline entries win over a named reference with the same name. Named
    /// lookups run concurrently; when several fail, the error of the one
    /// named first is returned.
    pub async fn resolve_resources(
        &self,
        inline: BTreeMap<String, String>,
        names: &[String],
    ) -> Result<ResourceMap> {
        let mut resolved = ResourceMap::new();

        for (name, encoded) in &inline {
            check_name(ArtifactClass::Resource, name)?;
            resolved.insert(name.clone(), decode_inline(ArtifactClass::Resource, name, encoded)?);
        }

        let mut pending: Vec<&str> = Vec::new();
        for name in names {
            if resolved.contains_key(name) || pending.contains(&name.as_str()) {
                continue;
            }
            check_name(ArtifactClass::Resource, name)?;
            pending.push(name);
        }

        let fetched = join_all(
            pending
                .iter()
                .map(|name| self.resolve_named(ArtifactClass::Resource, name)),
        )
        .await;

        for (name, bytes) in pending.into_iter().zip(fetched) {
            resolved.insert(name.to_string(), bytes?);
        }

        Ok(resolved)
    }

    /// Drop a cached entry so the next lookup reaches disk or database
    pub fn invalidate(&self, class: ArtifactClass, id: &str) -> bool {
        match class {
            ArtifactClass::Template => self.templates.cache().remove(id),
            ArtifactClass::Resource => self.resources.cache().remove(id),
            ArtifactClass::Details => false,
        }
    }

    fn cache_for(&self, class: ArtifactClass) -> Option<&CacheSource> {
        match class {
            ArtifactClass::Template => Some(&self.templates),
            ArtifactClass::Resource => Some(&self.resources),
            ArtifactClass::Details => None,
        }
    }

    fn chain(&self, class: ArtifactClass) -> Vec<&dyn ByteSource> {
        let mut chain: Vec<&dyn ByteSource> = Vec::with_capacity(3);
        if let Some(cache) = self.cache_for(class) {
            chain.push(cache);
        }
        chain.push(&self.disk);
        if let Some(database) = &self.database {
            chain.push(database);
        }
        chain
    }

    #[tracing::instrument(level = "debug", skip(self, class), fields(class = %class))]
    async fn resolve_named(&self, class: ArtifactClass, id: &str) -> Result<CachedBytes> {
        let chain = self.chain(class);
        let last = chain.len() - 1;

        for (index, source) in chain.iter().enumerate() {
            let tier = source.tier();
            match source.read(id).await {
                Lookup::Found(bytes) => {
                    tracing::debug!(%tier, bytes = bytes.len(), "resolved");
                    if tier != Tier::Cache {
                        if let Some(cache) = self.cache_for(class) {
                            cache.cache().put(id, Arc::clone(&bytes));
                        }
                    }
                    return Ok(bytes);
                }
                Lookup::Missing => {
                    tracing::trace!(%tier, "miss");
                }
                Lookup::Unavailable(reason) if index == last => {
                    return Err(DocgenError::BackendUnavailable(format!(
                        "{} tier failed while resolving {} '{}': {}",
                        tier, class, id, reason
                    )));
                }
                Lookup::Unavailable(reason) => {
                    tracing::warn!(%tier, %reason, "tier unavailable, treating as miss");
                }
            }
        }

        Err(DocgenError::NotFound {
            identifier: id.to_string(),
            class,
        })
    }
}

/// Registered identifier of a template under a delimiter pair.
///
/// Only `name` has to be a safe file name. The delimiter suffix may hold
/// separators; the disk tier escapes those when mapping the id to a file.
pub fn template_id(name: &str, delimiters: &Delimiters) -> Result<String> {
    check_name(ArtifactClass::Template, name)?;
    Ok(format!("{}{}", name, delimiters.suffix()))
}

fn check_name(class: ArtifactClass, name: &str) -> Result<()> {
    validate_artifact_name(name)
        .map_err(|e| DocgenError::MalformedInput(format!("invalid {} identifier: {}", class, e)))
}

fn decode_inline(class: ArtifactClass, label: &str, encoded: &str) -> Result<CachedBytes> {
    STANDARD
        .decode(encoded.trim())
        .map(CachedBytes::from)
        .map_err(|e| {
            DocgenError::MalformedInput(format!("inline {} '{}' is not valid base64: {}", class, label, e))
        })
}
