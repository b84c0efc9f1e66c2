//! Operation codes and the registry that binds them to HTTP metadata

pub mod catalog;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

pub use catalog::CatalogEntry;
pub use registry::{CodeMetadata, CodeRegistry, CodeRegistryBuilder, RegistryError};

/// Stable identifier for an operation outcome (success or a class of failure).
///
/// Codes are plain strings on the wire. The built-in set is available as associated
/// constants; services add their own through [`CodeRegistryBuilder::register`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationCode(Cow<'static, str>);

impl OperationCode {
    /// Operation processed successfully
    pub const OK: OperationCode = OperationCode::from_static("Ok");

    /// Caller supplied invalid input
    pub const BAD_ARGUMENTS: OperationCode = OperationCode::from_static("BadArguments");

    /// Unexpected failure inside the service
    pub const SERVICE_INTERNAL: OperationCode = OperationCode::from_static("ServiceInternal");

    /// Service or one of its dependencies is temporarily unavailable
    pub const SERVICE_UNAVAILABLE: OperationCode =
        OperationCode::from_static("ServiceUnavailable");

    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for OperationCode {
    fn from(code: &'static str) -> Self {
        Self::from_static(code)
    }
}

impl From<String> for OperationCode {
    fn from(code: String) -> Self {
        Self(Cow::Owned(code))
    }
}

impl Borrow<str> for OperationCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OperationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
