//! Registration of named artifacts
//!
//! Registered artifacts go to the database when one is configured and to the
//! disk root otherwise. The matching cache entry is dropped afterwards so a
//! re-registration is visible to the next request.

use crate::artifact::ArtifactClass;
use crate::error::{DocgenError, Result};
use crate::path::validate_artifact_name;
use crate::resolve::{Resolver, template_id};
use crate::store::StoreError;
use crate::template::Delimiters;

/// Where a registered artifact ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisteredIn {
    Disk,
    Database,
}

/// Store `payload` under `name` and return the identifier it is reachable by.
///
/// Templates are stored under `name` plus the delimiter suffix, matching the
/// identifier the resolver computes for `tmpl=name`.
pub async fn register(
    resolver: &Resolver,
    class: ArtifactClass,
    name: &str,
    delimiters: &Delimiters,
    payload: Vec<u8>,
) -> Result<(String, RegisteredIn)> {
    let id = match class {
        ArtifactClass::Template => template_id(name, delimiters)?,
        ArtifactClass::Details | ArtifactClass::Resource => {
            validate_artifact_name(name).map_err(|e| {
                DocgenError::MalformedInput(format!("invalid {} identifier: {}", class, e))
            })?;
            name.to_string()
        }
    };

    if class == ArtifactClass::Details {
        // Reject details that could never be rendered against
        crate::details::Details::from_slice(&payload)?;
    }

    let target = match resolver.database() {
        Some(db) => {
            db.store(&id, payload).await.map_err(|e| match e {
                StoreError::Unavailable(reason) => DocgenError::BackendUnavailable(reason),
                StoreError::NotFound(id) => DocgenError::Generic(format!(
                    "database rejected store for '{}'",
                    id
                )),
            })?;
            RegisteredIn::Database
        }
        None => {
            resolver.disk().write(&id, &payload).await?;
            RegisteredIn::Disk
        }
    };

    resolver.invalidate(class, &id);
    tracing::info!(%class, %id, ?target, "artifact registered");
    Ok((id, target))
}
