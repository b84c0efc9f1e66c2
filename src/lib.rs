//! Operation results for HTTP services.
//!
//! A [`CodeRegistry`] maps stable operation codes to an HTTP status and a default
//! message. Business logic returns [`OpResult`] values (or an [`OpError`]), and the
//! [`ResponseWriter`] turns them into exactly one JSON response:
//!
//! ```no_run
//! use std::sync::Arc;
//! use opres::{CodeRegistry, OpResult, ResponseWriter};
//!
//! # fn main() -> Result<(), opres::RegistryError> {
//! let mut builder = CodeRegistry::builder();
//! builder.register("NotFound", 404, "Resource not found.")?;
//! let writer = ResponseWriter::new(Arc::new(builder.build()));
//!
//! let response = writer.send(OpResult::from_code("NotFound"));
//! assert_eq!(response.status(), 404);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod codes;
pub mod config;
pub mod context;
pub mod metrics;
pub mod response;

pub use codes::{CodeMetadata, CodeRegistry, CodeRegistryBuilder, OperationCode, RegistryError};
pub use context::OpContext;
pub use response::{OpError, OpResult, ResponseBody, ResponseWriter, ResultFactory};
