use serde_json::Value;

use super::result::OpResult;
use crate::codes::OperationCode;

/// Single place where the response writer creates results.
///
/// Construction needs no registry: codes are validated when the result is
/// resolved by the writer. Services can supply their own factory to decorate
/// every result the writer builds.
pub trait ResultFactory: Send + Sync {
    /// Create a result without payload
    fn create(&self, code: OperationCode, message: &str) -> OpResult {
        OpResult::new(code, message)
    }

    /// Create a result carrying a payload
    fn create_with_data(&self, code: OperationCode, message: &str, data: Value) -> OpResult {
        self.create(code, message).with_data(data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResultFactory;

impl ResultFactory for DefaultResultFactory {}
