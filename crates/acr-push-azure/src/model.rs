//! Shapes of the `az ... -o json` responses we read

use serde::{Deserialize, Serialize};

/// ACR registry metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcrRegistry {
    pub name: String,
    pub resource_group: String,
    pub login_server: String,
}

/// Signed-in account from `az account show`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Subscription id
    pub id: String,

    /// Subscription name
    pub name: String,

    pub tenant_id: String,

    #[serde(default)]
    pub tenant_display_name: Option<String>,

    #[serde(default)]
    pub user: Option<AccountUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUser {
    pub name: String,
}

impl AccountInfo {
    /// Tenant label for the UI (display name when az reports one)
    pub fn tenant_label(&self) -> &str {
        self.tenant_display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.tenant_id)
    }
}
