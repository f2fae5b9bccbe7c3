//! Registry browsing used by the interactive wizard

use crate::az::AzureCli;
use crate::error::Result;
use crate::model::AcrRegistry;
use acr_push_core::CommandRunner;
use async_trait::async_trait;

/// Read-only view of registries, repositories and tags
#[async_trait]
pub trait RegistryCatalog: Send + Sync {
    async fn registries(&self) -> Result<Vec<AcrRegistry>>;

    async fn repositories(&self, registry: &str) -> Result<Vec<String>>;

    async fn tags(&self, registry: &str, repository: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl<R: CommandRunner> RegistryCatalog for AzureCli<R> {
    async fn registries(&self) -> Result<Vec<AcrRegistry>> {
        self.list_registries().await
    }

    async fn repositories(&self, registry: &str) -> Result<Vec<String>> {
        self.list_repositories(registry).await
    }

    async fn tags(&self, registry: &str, repository: &str) -> Result<Vec<String>> {
        self.list_tags(registry, repository).await
    }
}
