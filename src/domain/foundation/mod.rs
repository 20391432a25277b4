//! Shared domain primitives.

mod errors;
pub mod sanitize;

pub use errors::{ErrorKind, SdkError};
