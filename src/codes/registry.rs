use axum::http::StatusCode;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use super::OperationCode;

const DEFAULT_ERROR_MESSAGE: &str = "Something wrong happened. Please, try again later.";

/// Codes present in every registry
const BUILTIN_CODES: [(OperationCode, u16, &str); 4] = [
    (OperationCode::OK, 200, "Successfully processed."),
    (OperationCode::BAD_ARGUMENTS, 400, "Bad arguments provided."),
    (OperationCode::SERVICE_INTERNAL, 500, DEFAULT_ERROR_MESSAGE),
    (OperationCode::SERVICE_UNAVAILABLE, 503, DEFAULT_ERROR_MESSAGE),
];

/// Setup-time failures of the code registry.
///
/// These indicate a configuration defect and are meant to abort startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("operation code is already registered: {0}")]
    DuplicateCode(OperationCode),

    #[error("operation code is not registered: {0}")]
    UnknownCode(OperationCode),

    #[error("operation code must not be empty")]
    EmptyCode,

    #[error("invalid HTTP status {status} for operation code {code} (expected 100-599)")]
    InvalidStatus { code: OperationCode, status: u16 },

    #[error("default message for operation code {0} must not be empty")]
    EmptyMessage(OperationCode),

    #[error("failed to read code catalog {}: {source}", path.display())]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse code catalog {}: {source}", path.display())]
    CatalogFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// HTTP status and default message bound to an operation code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMetadata {
    status: StatusCode,
    message: Cow<'static, str>,
}

impl CodeMetadata {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Metadata of the built-in `ServiceInternal` code
    pub(crate) fn service_internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Cow::Borrowed(DEFAULT_ERROR_MESSAGE),
        }
    }
}

/// Collects code registrations during startup.
///
/// A fresh builder already holds the built-in codes, so they can never be
/// missing from (or overridden in) a built registry.
#[derive(Debug, Clone)]
pub struct CodeRegistryBuilder {
    entries: HashMap<OperationCode, CodeMetadata>,
}

impl Default for CodeRegistryBuilder {
    fn default() -> Self {
        let entries = BUILTIN_CODES
            .into_iter()
            .filter_map(|(code, status, message)| {
                StatusCode::from_u16(status).ok().map(|status| {
                    (
                        code,
                        CodeMetadata {
                            status,
                            message: Cow::Borrowed(message),
                        },
                    )
                })
            })
            .collect();

        Self { entries }
    }
}

impl CodeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new operation code.
    ///
    /// Fails if the code is empty or already known, if `status` is outside
    /// 100-599, or if `message` is empty.
    pub fn register(
        &mut self,
        code: impl Into<OperationCode>,
        status: u16,
        message: impl Into<Cow<'static, str>>,
    ) -> Result<&mut Self, RegistryError> {
        let code = code.into();
        let message = message.into();

        if code.is_empty() {
            return Err(RegistryError::EmptyCode);
        }
        if self.entries.contains_key(&code) {
            return Err(RegistryError::DuplicateCode(code));
        }
        if !(100..=599).contains(&status) {
            return Err(RegistryError::InvalidStatus { code, status });
        }
        let Ok(status) = StatusCode::from_u16(status) else {
            return Err(RegistryError::InvalidStatus { code, status });
        };
        if message.trim().is_empty() {
            return Err(RegistryError::EmptyMessage(code));
        }

        debug!(code = %code, status = status.as_u16(), "Registered operation code");
        self.entries.insert(code, CodeMetadata { status, message });
        Ok(self)
    }

    /// Freeze the registrations into a read-only registry
    pub fn build(self) -> CodeRegistry {
        CodeRegistry {
            entries: self.entries,
        }
    }
}

/// Read-only mapping from operation code to [`CodeMetadata`].
///
/// Built once at startup and shared (usually behind an `Arc`) with every
/// component that resolves codes. Lookups take no locks.
#[derive(Debug, Clone)]
pub struct CodeRegistry {
    entries: HashMap<OperationCode, CodeMetadata>,
}

impl Default for CodeRegistry {
    fn default() -> Self {
        CodeRegistryBuilder::new().build()
    }
}

impl CodeRegistry {
    pub fn builder() -> CodeRegistryBuilder {
        CodeRegistryBuilder::new()
    }

    /// Registry holding only the built-in codes
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn lookup<Q>(&self, code: &Q) -> Result<&CodeMetadata, RegistryError>
    where
        Q: AsRef<str> + ?Sized,
    {
        let code = code.as_ref();
        self.entries
            .get(code)
            .ok_or_else(|| RegistryError::UnknownCode(OperationCode::from(code.to_owned())))
    }

    pub fn contains<Q>(&self, code: &Q) -> bool
    where
        Q: AsRef<str> + ?Sized,
    {
        self.entries.contains_key(code.as_ref())
    }

    /// Check that every code a service intends to send is registered.
    ///
    /// Returns the first unknown code as [`RegistryError::UnknownCode`].
    pub fn ensure_registered<'a, I>(&self, codes: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = &'a OperationCode>,
    {
        for code in codes {
            self.lookup(code)?;
        }
        Ok(())
    }

    /// Registered entries ordered by code
    pub fn iter(&self) -> impl Iterator<Item = (&OperationCode, &CodeMetadata)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
