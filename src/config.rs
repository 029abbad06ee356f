use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_base_url() -> String {
    "https://api.etherscan.io/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_pages() -> u32 {
    1
}

fn default_page_size() -> u32 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Explorer API credential
    pub api_key: String,
    /// Wallet whose ERC20 transfer history is analyzed
    pub wallet_address: String,
    /// Excel workbook output path
    pub output_path: String,
    /// Radar chart HTML output path
    pub chart_path: String,
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            wallet_address: String::new(),
            output_path: "etherscan_analysis.xlsx".to_string(),
            chart_path: "radar_chart.html".to_string(),
            pages: default_pages(),
            page_size: default_page_size(),
            base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load the configuration, writing a default template if the file is missing
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            anyhow::bail!(
                "No config found - wrote a template to {}. Fill in api_key and wallet_address, then re-run.",
                path
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, content).with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(anyhow::anyhow!("api_key is required in config"));
        }
        if self.wallet_address.is_empty() {
            return Err(anyhow::anyhow!("wallet_address is required in config"));
        }
        if self.pages == 0 {
            return Err(anyhow::anyhow!("pages must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(anyhow::anyhow!("page_size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            api_key: "KEY".to_string(),
            wallet_address: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pages, 1);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation() {
        assert!(configured().validate().is_ok());

        let mut config = configured();
        config.pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();

        // First load writes the template and refuses to run
        assert!(Config::load(path).is_err());

        configured().save(path).unwrap();
        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.api_key, "KEY");
        assert_eq!(loaded.base_url, "https://api.etherscan.io/api");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = serde_json::from_str(
            r#"{
                "api_key": "KEY",
                "wallet_address": "0xabc",
                "output_path": "out.xlsx",
                "chart_path": "radar.html"
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.pages, 1);
        assert_eq!(parsed.page_size, 1000);
        assert_eq!(parsed.base_url, "https://api.etherscan.io/api");
    }
}
