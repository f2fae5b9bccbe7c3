//! Azure CLI integration for acr-push
//!
//! This crate drives the `az` CLI to find Azure Container Registries,
//! browse their repositories and tags, and log docker in to them.
//!
//! # Requirements
//!
//! - `az` CLI must be installed
//! - Authentication is managed through `az login`
//!
//! # Example
//!
//! ```ignore
//! use acr_push_azure::AzureCli;
//! use acr_push_core::ProcessRunner;
//!
//! let az = AzureCli::new(ProcessRunner::new());
//! let account = az.ensure_logged_in().await?;
//! let registry = az.show_registry("myacr", "rg-shared").await?;
//! az.login_registry(&registry.name).await?;
//! ```

pub mod az;
pub mod catalog;
pub mod error;
pub mod model;

pub use az::AzureCli;
pub use catalog::RegistryCatalog;
pub use error::{AzureError, Result};
pub use model::{AccountInfo, AccountUser, AcrRegistry};
