use crate::config::{CrmConfig, HandlerConfig, StoreConfig, DEFAULT_HUBSPOT_API_BASE, DEFAULT_LEADS_TABLE};
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::Validate;
use std::env;

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const LEADS_TABLE: &str = "LEADS_TABLE";
pub const HUBSPOT_ACCESS_TOKEN: &str = "HUBSPOT_ACCESS_TOKEN";
pub const HUBSPOT_API_BASE: &str = "HUBSPOT_API_BASE";

impl HandlerConfig {
    /// Reads the process environment. Used by the Lambda binaries at cold start.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`HandlerConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| LeadError::ConfigError {
                    message: format!("{} environment variable is required", key),
                })
        };

        let config = Self {
            store: StoreConfig {
                url: required(SUPABASE_URL)?,
                service_role_key: required(SUPABASE_SERVICE_ROLE_KEY)?,
                table: lookup(LEADS_TABLE).unwrap_or_else(|| DEFAULT_LEADS_TABLE.to_string()),
            },
            crm: CrmConfig {
                base_url: lookup(HUBSPOT_API_BASE)
                    .unwrap_or_else(|| DEFAULT_HUBSPOT_API_BASE.to_string()),
                access_token: lookup(HUBSPOT_ACCESS_TOKEN).filter(|token| !token.is_empty()),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
