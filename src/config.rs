use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub wordpress: WordPressConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub guide: GuideConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WordPressConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Root category of the post feed; embedded terms matching it are not
    /// shown as a post's sub-category.
    #[serde(default = "default_category")]
    pub category: i64,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://swiftgg.org".to_string()
}

fn default_category() -> i64 {
    44
}

fn default_per_page() -> u32 {
    20
}

fn default_request_timeout() -> u64 {
    30_000
}

impl Default for WordPressConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            category: default_category(),
            per_page: default_per_page(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_sponsors_url")]
    pub sponsors_url: String,
    #[serde(default = "default_contributors_url")]
    pub contributors_url: String,
    #[serde(default = "default_site_timeout")]
    pub request_timeout_ms: u64,
}

fn default_sponsors_url() -> String {
    "https://swiftgg.org/sponsors.json".to_string()
}

fn default_contributors_url() -> String {
    "https://swiftgg.org/contributors.json".to_string()
}

fn default_site_timeout() -> u64 {
    10_000
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sponsors_url: default_sponsors_url(),
            contributors_url: default_contributors_url(),
            request_timeout_ms: default_site_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GuideConfig {
    #[serde(default = "default_guide_base")]
    pub base_url: String,
}

fn default_guide_base() -> String {
    "https://doc.swiftgg.team/documentation/the-swift-programming-language-----".to_string()
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            base_url: default_guide_base(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Missing file falls back to defaults; a present-but-broken file is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.wordpress.category, 44);
        assert_eq!(config.wordpress.per_page, 20);
        assert!(config.wordpress.api_base.starts_with("https://swiftgg.org"));
        assert!(config.site.sponsors_url.ends_with("sponsors.json"));
    }

    #[test]
    fn test_partial_config_parses() {
        let config: Config = toml::from_str(
            r#"
            [wordpress]
            api_base = "https://staging.swiftgg.org"
            per_page = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.wordpress.api_base, "https://staging.swiftgg.org");
        assert_eq!(config.wordpress.per_page, 5);
        // untouched sections keep their defaults
        assert_eq!(config.wordpress.category, 44);
        assert!(config.site.contributors_url.ends_with("contributors.json"));
        assert!(config.guide.base_url.starts_with("https://doc.swiftgg.team"));
    }

    #[test]
    fn test_empty_config_parses() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.wordpress.request_timeout_ms, 30_000);
        assert_eq!(config.site.request_timeout_ms, 10_000);
    }
}
