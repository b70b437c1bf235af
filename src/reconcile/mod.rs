//! Idempotent lookup-or-create reconciliation
//!
//! Ensures exactly one remote resource exists for a given logical name.
//! Lookup hits short-circuit with the existing identifier; misses trigger a
//! single create call. A failed lookup is logged and treated as absent, so
//! creation is still attempted: alerting availability wins over strict
//! correctness, at the cost of a possible duplicate when the lookup failed
//! transiently rather than because the resource was missing.

use crate::client::ApiError;

/// Lookup/create operations for one remote resource type
#[allow(async_fn_in_trait)]
pub trait ResourceAdapter {
    /// Resource type label used in logs and errors
    fn kind(&self) -> &'static str;

    /// Find an existing resource by name, returning its identifier
    async fn lookup(&self, name: &str) -> Result<Option<String>, ApiError>;

    /// Create the resource, returning the assigned identifier
    async fn create(&self, name: &str) -> Result<String, ApiError>;
}

/// Ensure a resource with `name` exists, returning its identifier.
///
/// Performs at most one mutating remote call per invocation: zero when the
/// lookup hits, one otherwise.
pub async fn reconcile<A: ResourceAdapter>(
    adapter: &A,
    name: &str,
) -> Result<String, ReconcileError> {
    if name.trim().is_empty() {
        return Err(ReconcileError::EmptyName);
    }

    match adapter.lookup(name).await {
        Ok(Some(id)) => {
            tracing::info!(
                kind = adapter.kind(),
                name = %name,
                id = %id,
                "Resource already exists"
            );
            return Ok(id);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(
                kind = adapter.kind(),
                name = %name,
                error = %e,
                "Lookup failed, treating resource as absent"
            );
        }
    }

    let id = adapter
        .create(name)
        .await
        .map_err(|e| ReconcileError::CreateFailed {
            kind: adapter.kind(),
            name: name.to_string(),
            source: e,
        })?;

    tracing::info!(
        kind = adapter.kind(),
        name = %name,
        id = %id,
        "Resource created"
    );

    Ok(id)
}

/// Reconciliation errors
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Resource name must not be empty")]
    EmptyName,

    #[error("Failed to create {kind} {name:?}: {source}")]
    CreateFailed {
        kind: &'static str,
        name: String,
        #[source]
        source: ApiError,
    },
}
