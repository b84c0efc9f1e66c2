//! Operation results and the writer that turns them into HTTP responses

pub mod factory;
pub mod result;
pub mod writer;

pub use factory::{DefaultResultFactory, ResultFactory};
pub use result::{OpError, OpResult, ResponseBody};
pub use writer::ResponseWriter;
