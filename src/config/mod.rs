#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_secret, validate_table_name, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LEADS_TABLE: &str = "leads";
pub const DEFAULT_HUBSPOT_API_BASE: &str = "https://api.hubapi.com";

fn default_table() -> String {
    DEFAULT_LEADS_TABLE.to_string()
}

fn default_hubspot_base() -> String {
    DEFAULT_HUBSPOT_API_BASE.to_string()
}

/// Supabase project the leads live in.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub service_role_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CrmConfig {
    #[serde(default = "default_hubspot_base")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_hubspot_base(),
            access_token: None,
        }
    }
}

/// Everything a handler needs, resolved once and passed in at construction.
#[derive(Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub crm: CrmConfig,
}

// 金鑰不輸出到日誌
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("service_role_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}

impl std::fmt::Debug for CrmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl std::fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("store", &self.store)
            .field("crm", &self.crm)
            .finish()
    }
}

impl Validate for HandlerConfig {
    fn validate(&self) -> Result<()> {
        validate_url("supabase_url", &self.store.url)?;
        validate_secret("supabase_service_role_key", &self.store.service_role_key)?;
        validate_table_name("leads_table", &self.store.table)?;

        validate_url("hubspot_api_base", &self.crm.base_url)?;
        if let Some(token) = &self.crm.access_token {
            validate_secret("hubspot_access_token", token)?;
        }

        tracing::debug!("✅ Handler configuration validation passed");
        Ok(())
    }
}
