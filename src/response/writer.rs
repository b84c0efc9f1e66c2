use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::factory::{DefaultResultFactory, ResultFactory};
use super::result::{OpError, OpResult, ResponseBody};
use crate::codes::{CodeMetadata, CodeRegistry, OperationCode, RegistryError};
use crate::metrics::{OP_FALLBACKS_TOTAL, OP_RESPONSES_TOTAL};

/// Turns operation results into HTTP responses.
///
/// Every entry point returns exactly one [`Response`] with
/// `Content-Type: application/json`, the status bound to the result's code and
/// the JSON [`ResponseBody`]. Errors that are not an [`OpResult`] are logged and
/// answered with the fallback code (`ServiceInternal` unless configured
/// otherwise) and its default message.
#[derive(Clone)]
pub struct ResponseWriter {
    registry: Arc<CodeRegistry>,
    factory: Arc<dyn ResultFactory>,
    fallback: OperationCode,
    fallback_meta: CodeMetadata,
}

impl fmt::Debug for ResponseWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("codes", &self.registry.len())
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl ResponseWriter {
    pub fn new(registry: Arc<CodeRegistry>) -> Self {
        let fallback_meta = registry
            .lookup(&OperationCode::SERVICE_INTERNAL)
            .cloned()
            .unwrap_or_else(|_| CodeMetadata::service_internal());

        Self {
            registry,
            factory: Arc::new(DefaultResultFactory),
            fallback: OperationCode::SERVICE_INTERNAL,
            fallback_meta,
        }
    }

    /// Use `code` for responses to opaque errors; it must be registered
    pub fn with_fallback(
        mut self,
        code: impl Into<OperationCode>,
    ) -> Result<Self, RegistryError> {
        let code = code.into();
        self.fallback_meta = self.registry.lookup(&code)?.clone();
        self.fallback = code;
        Ok(self)
    }

    pub fn with_factory(mut self, factory: Arc<dyn ResultFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn registry(&self) -> &CodeRegistry {
        &self.registry
    }

    pub fn fallback_code(&self) -> &OperationCode {
        &self.fallback
    }

    /// Resolve `result` through the registry and write it
    pub fn send(&self, result: OpResult) -> Response {
        match result.resolve(&self.registry) {
            Ok((status, body)) => self.write(status, body),
            Err(err) => {
                error!(error = %err, fallback = %self.fallback, "Cannot resolve operation code");
                OP_FALLBACKS_TOTAL.with_label_values(&["unknown_code"]).inc();
                self.write_fallback()
            }
        }
    }

    pub fn ok(&self) -> Response {
        self.send(self.factory.create(OperationCode::OK, ""))
    }

    pub fn ok_data<T: Serialize>(&self, data: T) -> Response {
        match serde_json::to_value(data) {
            Ok(data) => self.send(self.factory.create_with_data(OperationCode::OK, "", data)),
            Err(err) => {
                warn!(error = %err, fallback = %self.fallback, "Failed to serialize response data");
                OP_FALLBACKS_TOTAL.with_label_values(&["serialization"]).inc();
                self.write_fallback()
            }
        }
    }

    /// Respond with `code` and its default message
    pub fn code(&self, code: impl Into<OperationCode>) -> Response {
        self.send(self.factory.create(code.into(), ""))
    }

    pub fn code_message(&self, code: impl Into<OperationCode>, message: &str) -> Response {
        self.send(self.factory.create(code.into(), message))
    }

    pub fn error(&self, err: impl Into<OpError>) -> Response {
        match err.into() {
            OpError::Operation(result) => self.send(result),
            OpError::Opaque(err) => {
                warn!(error = %format!("{err:#}"), fallback = %self.fallback, "Unhandled error");
                OP_FALLBACKS_TOTAL.with_label_values(&["opaque_error"]).inc();
                self.write_fallback()
            }
        }
    }

    /// Write whatever a handler produced, success or failure
    pub fn outcome(&self, outcome: Result<OpResult, OpError>) -> Response {
        match outcome {
            Ok(result) => self.send(result),
            Err(err) => self.error(err),
        }
    }

    fn write_fallback(&self) -> Response {
        let body = ResponseBody {
            code: self.fallback.clone(),
            message: self.fallback_meta.message().to_owned(),
            data: None,
        };
        self.write(self.fallback_meta.status(), body)
    }

    fn write(&self, status: StatusCode, body: ResponseBody) -> Response {
        debug!(
            code = %body.code,
            status = status.as_u16(),
            message = %body.message,
            "Sending operation result"
        );
        OP_RESPONSES_TOTAL
            .with_label_values(&[body.code.as_str(), status.as_str()])
            .inc();

        (status, Json(body)).into_response()
    }
}
