use crate::config::HandlerConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

impl HandlerConfig {
    /// 從 TOML 檔案載入配置
    ///
    /// ```toml
    /// [store]
    /// url = "https://abc.supabase.co"
    /// service_role_key = "..."
    ///
    /// [crm]
    /// access_token = "pat-..."
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HandlerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
