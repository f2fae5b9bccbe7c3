//! acr-push subprocess layer
//!
//! Every external tool (`docker`, `az`) is driven through the
//! [`CommandRunner`] trait. [`ProcessRunner`] is the real implementation;
//! the `test-utils` feature adds a recording double for unit tests.

pub mod error;
pub mod runner;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{CommandError, Result};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};
