//! az CLI wrapper
//!
//! Wraps the az CLI commands used to find a registry and log in to it.

use crate::error::{AzureError, Result};
use crate::model::{AccountInfo, AcrRegistry};
use acr_push_core::{CommandError, CommandRunner, CommandSpec};
use serde::de::DeserializeOwned;

/// az CLI wrapper
pub struct AzureCli<R> {
    runner: R,
}

impl<R: CommandRunner> AzureCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn az(args: &[&str]) -> CommandSpec {
        CommandSpec::new("az").args(args.iter().copied())
    }

    /// Run a captured az command and parse its JSON output
    async fn query<T: DeserializeOwned + Default>(
        &self,
        spec: CommandSpec,
        context: impl FnOnce() -> String,
    ) -> Result<T> {
        let output = self.runner.capture(&spec).await.map_err(|e| {
            AzureError::from_command(e, |source| AzureError::CommandFailed {
                context: context(),
                source,
            })
        })?;

        let stdout = output.stdout.trim();
        if stdout.is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(stdout)?)
    }

    /// Current account, or None when az has no active login
    pub async fn current_account(&self) -> Result<Option<AccountInfo>> {
        let spec = Self::az(&["account", "show", "-o", "json"]);
        match self.runner.capture(&spec).await {
            Ok(output) => Ok(Some(serde_json::from_str(output.stdout.trim())?)),
            Err(CommandError::Failed { .. }) => Ok(None),
            Err(e) => Err(AzureError::from_command(e, |source| {
                AzureError::CommandFailed {
                    context: "Failed to read Azure account info".to_string(),
                    source,
                }
            })),
        }
    }

    /// Ensure az has an active login
    pub async fn ensure_logged_in(&self) -> Result<AccountInfo> {
        self.current_account().await?.ok_or(AzureError::NotLoggedIn)
    }

    /// Login to a specific tenant (interactive, streamed to the terminal)
    pub async fn login_tenant(&self, tenant_id: &str) -> Result<()> {
        if tenant_id.is_empty() {
            return Err(AzureError::MissingTenant);
        }
        let spec = Self::az(&["login", "--tenant", tenant_id]);
        self.runner.stream(&spec).await.map_err(|e| {
            AzureError::from_command(e, |source| AzureError::TenantLogin {
                tenant: tenant_id.to_string(),
                source,
            })
        })
    }

    /// Make sure we are signed in, in the requested tenant if one is given
    pub async fn ensure_tenant(&self, tenant_id: Option<&str>) -> Result<AccountInfo> {
        let current = self.current_account().await?;

        match (current, tenant_id) {
            (Some(account), Some(tenant)) if account.tenant_id != tenant => {
                tracing::info!(
                    "Switching tenant: {} -> {}",
                    account.tenant_id,
                    tenant
                );
                self.login_tenant(tenant).await?;
                self.ensure_logged_in().await
            }
            (Some(account), _) => Ok(account),
            (None, Some(tenant)) => {
                self.login_tenant(tenant).await?;
                self.ensure_logged_in().await
            }
            (None, None) => Err(AzureError::NotLoggedIn),
        }
    }

    /// Set the active subscription if provided
    pub async fn set_subscription(&self, subscription: Option<&str>) -> Result<()> {
        let Some(subscription) = subscription.filter(|s| !s.is_empty()) else {
            return Ok(());
        };
        let spec = Self::az(&["account", "set", "--subscription", subscription]);
        self.runner.capture(&spec).await.map_err(|e| {
            AzureError::from_command(e, |source| AzureError::Subscription {
                subscription: subscription.to_string(),
                source,
            })
        })?;
        Ok(())
    }

    /// List registries visible to the current subscription
    pub async fn list_registries(&self) -> Result<Vec<AcrRegistry>> {
        let spec = Self::az(&["acr", "list", "-o", "json"]);
        self.query(spec, || "Failed to list registries".to_string())
            .await
    }

    /// Fetch registry details
    pub async fn show_registry(&self, name: &str, resource_group: &str) -> Result<AcrRegistry> {
        let spec = Self::az(&[
            "acr",
            "show",
            "--name",
            name,
            "--resource-group",
            resource_group,
            "-o",
            "json",
        ]);
        let output = self.runner.capture(&spec).await.map_err(|e| {
            AzureError::from_command(e, |source| AzureError::RegistryNotFound {
                name: name.to_string(),
                resource_group: resource_group.to_string(),
                source,
            })
        })?;
        Ok(serde_json::from_str(output.stdout.trim())?)
    }

    /// Login docker to the registry through az
    pub async fn login_registry(&self, name: &str) -> Result<()> {
        let spec = Self::az(&["acr", "login", "--name", name]);
        self.runner.stream(&spec).await.map_err(|e| {
            AzureError::from_command(e, |source| AzureError::RegistryLogin {
                name: name.to_string(),
                source,
            })
        })
    }

    /// List repositories within a registry
    pub async fn list_repositories(&self, name: &str) -> Result<Vec<String>> {
        let spec = Self::az(&["acr", "repository", "list", "--name", name, "-o", "json"]);
        self.query(spec, || format!("Failed to list repositories: {}", name))
            .await
    }

    /// List tags of a repository
    pub async fn list_tags(&self, name: &str, repository: &str) -> Result<Vec<String>> {
        let spec = Self::az(&[
            "acr",
            "repository",
            "show-tags",
            "--name",
            name,
            "--repository",
            repository,
            "-o",
            "json",
        ]);
        self.query(spec, || {
            format!("Failed to list tags: {}/{}", name, repository)
        })
        .await
    }
}
