//! HTTP surface of the demo server.
//!
//! Everything here is a consumer of [`crate::response::ResponseWriter`]: handlers
//! never set status lines or headers themselves.

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

use std::sync::Arc;
use tracing::info;

use crate::codes::{CodeRegistry, OperationCode, RegistryError};
use crate::config::Config;
use crate::response::ResponseWriter;
use handlers::{AppState, AppStateInner};

/// Sent for paths that match no route
pub const NOT_FOUND: OperationCode = OperationCode::from_static("NotFound");

/// Codes the handlers send directly
pub const REQUIRED_CODES: [OperationCode; 3] =
    [OperationCode::OK, OperationCode::BAD_ARGUMENTS, NOT_FOUND];

/// Build the registry and writer eagerly, before any request is served.
///
/// Any registry problem (duplicate or invalid catalog entry, unknown fallback
/// code) is returned here so the process can abort at startup.
pub fn bootstrap(config: &Config) -> Result<AppState, RegistryError> {
    let mut builder = CodeRegistry::builder();
    builder.register(NOT_FOUND, 404, "Resource not found.")?;
    if let Some(path) = &config.codes.catalog_path {
        builder.register_catalog(path)?;
    }

    let registry = Arc::new(builder.build());
    registry.ensure_registered(&REQUIRED_CODES)?;

    let writer = ResponseWriter::new(registry).with_fallback(config.codes.fallback_code.clone())?;
    info!(
        codes = writer.registry().len(),
        fallback = %writer.fallback_code(),
        "Operation code registry ready"
    );

    Ok(Arc::new(AppStateInner {
        writer,
        instance_id: config.server.instance_id.clone(),
    }))
}
