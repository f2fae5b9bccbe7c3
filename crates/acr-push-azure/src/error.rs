//! Azure CLI error types

use acr_push_core::CommandError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzureError {
    #[error(
        "az not found. Please install the Azure CLI: \
        https://learn.microsoft.com/cli/azure/install-azure-cli"
    )]
    AzNotFound(#[source] CommandError),

    #[error("Azure CLI is not logged in. Run `az login` or pass --tenant-id")]
    NotLoggedIn,

    #[error("Tenant id is required for login")]
    MissingTenant,

    #[error("Failed to login to tenant: {tenant}")]
    TenantLogin {
        tenant: String,
        #[source]
        source: CommandError,
    },

    #[error("Failed to set subscription: {subscription}")]
    Subscription {
        subscription: String,
        #[source]
        source: CommandError,
    },

    #[error("Registry not found: {name} (resource group: {resource_group})")]
    RegistryNotFound {
        name: String,
        resource_group: String,
        #[source]
        source: CommandError,
    },

    #[error("Failed to login to registry: {name}")]
    RegistryLogin {
        name: String,
        #[source]
        source: CommandError,
    },

    #[error("{context}")]
    CommandFailed {
        context: String,
        #[source]
        source: CommandError,
    },

    #[error("Unexpected az response: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AzureError {
    /// Map a missing az binary to the install hint
    pub(crate) fn from_command(
        error: CommandError,
        wrap: impl FnOnce(CommandError) -> AzureError,
    ) -> Self {
        match error {
            CommandError::NotFound(_) => AzureError::AzNotFound(error),
            other => wrap(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AzureError>;
