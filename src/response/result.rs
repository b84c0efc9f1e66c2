use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

use crate::codes::{CodeRegistry, OperationCode, RegistryError};

/// Outcome of one operation, carried from business logic to the HTTP boundary.
///
/// An empty `message` means "use the registry default"; the substitution happens
/// once, when the result is resolved into a [`ResponseBody`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpResult {
    code: OperationCode,
    message: String,
    data: Option<Value>,
}

impl OpResult {
    pub fn new(code: impl Into<OperationCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Result without an explicit message
    pub fn from_code(code: impl Into<OperationCode>) -> Self {
        Self::new(code, String::new())
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach any serializable payload
    pub fn try_with_data<T: Serialize>(self, data: &T) -> Result<Self, serde_json::Error> {
        Ok(self.with_data(serde_json::to_value(data)?))
    }

    pub fn code(&self) -> &OperationCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.code == OperationCode::OK
    }

    /// Resolve the HTTP status and wire body, filling an empty message with the
    /// registry default for the code
    pub fn resolve(
        self,
        registry: &CodeRegistry,
    ) -> Result<(StatusCode, ResponseBody), RegistryError> {
        let meta = registry.lookup(&self.code)?;
        let message = if self.message.is_empty() {
            meta.message().to_owned()
        } else {
            self.message
        };

        Ok((
            meta.status(),
            ResponseBody {
                code: self.code,
                message,
                data: self.data,
            },
        ))
    }
}

/// Helpers for the built-in codes
impl OpResult {
    pub fn ok() -> Self {
        Self::from_code(OperationCode::OK)
    }

    pub fn bad_arguments(message: impl Into<String>) -> Self {
        Self::new(OperationCode::BAD_ARGUMENTS, message)
    }

    pub fn service_internal(message: impl Into<String>) -> Self {
        Self::new(OperationCode::SERVICE_INTERNAL, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(OperationCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for OpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.message)
        }
    }
}

impl std::error::Error for OpResult {}

/// JSON body written to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResponseBody {
    /// Operation code
    #[schema(value_type = String, example = "Ok")]
    pub code: OperationCode,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schema(example = "Successfully processed.")]
    pub message: String,
    /// Operation payload (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

/// Error returned by business logic.
///
/// `Operation` carries a typed outcome that is sent to the client as-is;
/// `Opaque` is anything else and is never exposed on the wire.
#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Operation(#[from] OpResult),

    #[error(transparent)]
    Opaque(#[from] anyhow::Error),
}

impl OpError {
    pub fn opaque<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Opaque(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_message_resolves_to_default() {
        let registry = CodeRegistry::with_defaults();
        let (status, body) = OpResult::from_code(OperationCode::BAD_ARGUMENTS)
            .resolve(&registry)
            .unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "code": "BadArguments", "message": "Bad arguments provided." })
        );
    }

    #[test]
    fn test_explicit_message_is_kept() {
        let registry = CodeRegistry::with_defaults();
        let (_, body) = OpResult::bad_arguments("field x required")
            .resolve(&registry)
            .unwrap();
        assert_eq!(body.message, "field x required");
    }

    #[test]
    fn test_data_with_default_message() {
        let registry = CodeRegistry::with_defaults();
        let payload = json!({ "id": 7, "name": "widget" });
        let (status, body) = OpResult::ok()
            .with_data(payload.clone())
            .resolve(&registry)
            .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "code": "Ok",
                "message": "Successfully processed.",
                "data": payload,
            })
        );
    }

    #[test]
    fn test_resolve_unknown_code() {
        let registry = CodeRegistry::with_defaults();
        let err = OpResult::from_code("NotFound").resolve(&registry).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownCode(_)));
    }

    #[test]
    fn test_try_with_data() {
        #[derive(Serialize)]
        struct Widget {
            id: u32,
        }

        let result = OpResult::ok().try_with_data(&Widget { id: 3 }).unwrap();
        assert_eq!(result.data(), Some(&json!({ "id": 3 })));
        assert!(result.is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(OpResult::ok().to_string(), "Ok");
        assert_eq!(
            OpResult::service_unavailable("db down").to_string(),
            "ServiceUnavailable db down"
        );
    }

    #[test]
    fn test_op_error_variants() {
        let err: OpError = OpResult::service_unavailable("").into();
        assert!(matches!(err, OpError::Operation(_)));

        let err: OpError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(err, OpError::Opaque(_)));
        assert_eq!(err.to_string(), "connection reset");

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert!(matches!(OpError::opaque(io), OpError::Opaque(_)));
    }

    #[test]
    fn test_body_omits_empty_fields() {
        let body = ResponseBody {
            code: OperationCode::OK,
            message: String::new(),
            data: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"code":"Ok"}"#);

        let parsed: ResponseBody = serde_json::from_str(r#"{"code":"Ok"}"#).unwrap();
        assert_eq!(parsed, body);
    }
}
