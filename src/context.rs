//! Per-request operation context.
//!
//! A request id is unique per incoming request. An operation id is shared by all
//! services that take part in one logical operation, so it is taken from the
//! caller when present and otherwise starts as the request id.

use axum::http::HeaderMap;
use thiserror::Error;
use tracing::{info_span, Span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const OPERATION_ID_HEADER: &str = "x-operation-id";

/// Longest id accepted from a client header
const MAX_ID_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("request id must not be empty")]
    EmptyRequestId,

    #[error("operation id must not be empty")]
    EmptyOperationId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpContext {
    request_id: String,
    operation_id: String,
}

impl OpContext {
    pub fn new(
        request_id: impl Into<String>,
        operation_id: impl Into<String>,
    ) -> Result<Self, ContextError> {
        let request_id = request_id.into();
        let operation_id = operation_id.into();

        if request_id.is_empty() {
            return Err(ContextError::EmptyRequestId);
        }
        if operation_id.is_empty() {
            return Err(ContextError::EmptyOperationId);
        }

        Ok(Self {
            request_id,
            operation_id,
        })
    }

    /// Fresh context for a request that starts a new operation
    pub fn generate() -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            request_id: id.clone(),
            operation_id: id,
        }
    }

    /// Build the context from incoming headers, generating missing ids
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id = header_id(headers, REQUEST_ID_HEADER)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let operation_id =
            header_id(headers, OPERATION_ID_HEADER).unwrap_or_else(|| request_id.clone());

        Self {
            request_id,
            operation_id,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Span that tags every event of the request with both ids
    pub fn span(&self) -> Span {
        info_span!("op", req_id = %self.request_id, op_id = %self.operation_id)
    }
}

fn header_id(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_ID_LEN)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_new_rejects_empty_ids() {
        assert_eq!(OpContext::new("", "op").unwrap_err(), ContextError::EmptyRequestId);
        assert_eq!(OpContext::new("req", "").unwrap_err(), ContextError::EmptyOperationId);

        let ctx = OpContext::new("req", "op").unwrap();
        assert_eq!(ctx.request_id(), "req");
        assert_eq!(ctx.operation_id(), "op");
    }

    #[test]
    fn test_from_headers_uses_caller_ids() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-1"));
        headers.insert(OPERATION_ID_HEADER, HeaderValue::from_static("op-9"));

        let ctx = OpContext::from_headers(&headers);
        assert_eq!(ctx.request_id(), "req-1");
        assert_eq!(ctx.operation_id(), "op-9");
    }

    #[test]
    fn test_from_headers_generates_missing_ids() {
        let ctx = OpContext::from_headers(&HeaderMap::new());
        assert!(Uuid::parse_str(ctx.request_id()).is_ok());
        assert_eq!(ctx.operation_id(), ctx.request_id());
    }

    #[test]
    fn test_oversized_header_is_ignored() {
        let mut headers = HeaderMap::new();
        let long = "x".repeat(MAX_ID_LEN + 1);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(&long).unwrap());

        let ctx = OpContext::from_headers(&headers);
        assert_ne!(ctx.request_id(), long);
    }

    #[test]
    fn test_generate() {
        let a = OpContext::generate();
        let b = OpContext::generate();
        assert_ne!(a.request_id(), b.request_id());
        assert_eq!(a.request_id(), a.operation_id());
    }
}
