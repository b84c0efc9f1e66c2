//! JSON catalog of service-specific operation codes, loaded once at startup.
//!
//! ```json
//! [
//!   { "code": "NotFound", "status": 404, "message": "Resource not found." }
//! ]
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use super::registry::{CodeRegistryBuilder, RegistryError};
use super::OperationCode;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub code: OperationCode,
    pub status: u16,
    pub message: String,
}

/// Parse a catalog from its JSON text
pub fn parse(path: &Path, text: &str) -> Result<Vec<CatalogEntry>, RegistryError> {
    serde_json::from_str(text).map_err(|source| RegistryError::CatalogFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a catalog file
pub fn load(path: &Path) -> Result<Vec<CatalogEntry>, RegistryError> {
    let text = std::fs::read_to_string(path).map_err(|source| RegistryError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &text)
}

impl CodeRegistryBuilder {
    /// Register every entry of a catalog, stopping at the first invalid one
    pub fn register_entries<I>(&mut self, entries: I) -> Result<&mut Self, RegistryError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        for entry in entries {
            self.register(entry.code, entry.status, entry.message)?;
        }
        Ok(self)
    }

    /// Load a catalog file and register its codes
    pub fn register_catalog(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, RegistryError> {
        let path = path.as_ref();
        let entries = load(path)?;
        let count = entries.len();

        self.register_entries(entries)?;
        info!(path = %path.display(), count, "Loaded operation code catalog");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CodeRegistry;
    use axum::http::StatusCode;
    use std::io::Write;

    #[test]
    fn test_register_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[
                {{ "code": "NotFound", "status": 404, "message": "Resource not found." }},
                {{ "code": "TooManyRequests", "status": 429, "message": "Slow down." }}
            ]"#
        )
        .unwrap();

        let mut builder = CodeRegistry::builder();
        builder.register_catalog(&path).unwrap();
        let registry = builder.build();

        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.lookup("TooManyRequests").unwrap().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(registry.lookup("NotFound").unwrap().message(), "Resource not found.");
    }

    #[test]
    fn test_catalog_duplicate_of_builtin_fails() {
        let entries = parse(
            Path::new("inline.json"),
            r#"[{ "code": "Ok", "status": 200, "message": "Fine." }]"#,
        )
        .unwrap();

        let mut builder = CodeRegistry::builder();
        let err = builder.register_entries(entries).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCode(_)));
    }

    #[test]
    fn test_malformed_catalog() {
        let err = parse(Path::new("broken.json"), r#"{ "code": "Ok" }"#).unwrap_err();
        assert!(matches!(err, RegistryError::CatalogFormat { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_missing_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = CodeRegistry::builder();
        let err = builder
            .register_catalog(dir.path().join("absent.json"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::CatalogIo { .. }));
    }
}
