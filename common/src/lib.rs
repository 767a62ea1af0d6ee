/*!
common/src/lib.rs

Shared configuration types for Newschat.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file
- Layered loading: a default file merged under an optional override file
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Display strings for the application surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Remote LLM endpoint configuration.
/// The credential itself never appears in the file; `api_key_env` names the
/// environment variable that holds it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<usize>,
}

/// News feed endpoint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsConfig {
    /// RSS endpoint root (e.g. "https://news.google.com/rss")
    pub base_url: Option<String>,
    /// Language code passed as the `hl` query parameter
    pub language: Option<String>,
    /// Result-count cap applied to keyword searches
    pub max_results: Option<usize>,
    pub fetch_timeout_seconds: Option<u64>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub app: Option<AppConfig>,
    pub llm: Option<LlmConfig>,
    pub news: Option<NewsConfig>,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_string() {
        let toml = r#"
            [app]
            title = "AI 기사 검색 통합 챗봇"

            [llm]
            api_key_env = "GMS_KEY"
            model = "gpt-5-nano"
            max_tokens = 4096

            [news]
            base_url = "https://news.google.com/rss"
            language = "en"
            max_results = 10
        "#;

        let cfg: Config = toml::from_str(toml).expect("parse config");
        let llm = cfg.llm.expect("llm section");
        assert_eq!(llm.api_key_env.as_deref(), Some("GMS_KEY"));
        assert_eq!(llm.model.as_deref(), Some("gpt-5-nano"));
        assert_eq!(llm.max_tokens, Some(4096));
        let news = cfg.news.expect("news section");
        assert_eq!(news.language.as_deref(), Some("en"));
        assert_eq!(news.max_results, Some(10));
    }

    #[test]
    fn merge_override_wins_and_keeps_defaults() {
        let mut base: toml::Value = toml::from_str(
            r#"
            [llm]
            model = "gpt-5-nano"
            timeout_seconds = 30

            [news]
            language = "en"
        "#,
        )
        .unwrap();
        let over: toml::Value = toml::from_str(
            r#"
            [news]
            language = "kor"
        "#,
        )
        .unwrap();

        merge_toml(&mut base, over);
        let cfg: Config = base.try_into().expect("merged config");
        let llm = cfg.llm.expect("llm section survives merge");
        assert_eq!(llm.timeout_seconds, Some(30));
        assert_eq!(cfg.news.unwrap().language.as_deref(), Some("kor"));
    }
}
