use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment};
use reqwest::Url;
use serde::Deserialize;

const ENV_PREFIX: &str = "MTPROPS";
const DEFAULT_ROOT_URL: &str = "http://wiki.mikrotik.com";
const DEFAULT_TOC_PATH: &str = "/wiki/Manual:TOC_by_Menu";
const DEFAULT_USER_AGENT: &str = concat!("mikrotik_props/", env!("CARGO_PKG_VERSION"));

/// Runtime settings, read from `MTPROPS_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub root_url: String,
    pub toc_path: String,
    pub user_agent: String,
    /// Per-request timeout. Unset means requests may block indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    pub pretty: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder().add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        builder
            .set_default("root_url", DEFAULT_ROOT_URL)?
            .set_default("toc_path", DEFAULT_TOC_PATH)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("pretty", false)?
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn root(&self) -> Result<Url> {
        Url::parse(&self.root_url).with_context(|| format!("Invalid root URL: {}", self.root_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(s.root_url, "http://wiki.mikrotik.com");
        assert_eq!(s.toc_path, "/wiki/Manual:TOC_by_Menu");
        assert!(s.user_agent.starts_with("mikrotik_props/"));
        assert_eq!(s.timeout_secs, None);
        assert!(!s.pretty);
        assert_eq!(s.root().unwrap().as_str(), "http://wiki.mikrotik.com/");
    }

    #[test]
    fn overrides() {
        let builder = Config::builder()
            .set_override("root_url", "https://wiki.example.org")
            .unwrap()
            .set_override("timeout_secs", 20)
            .unwrap()
            .set_override("pretty", true)
            .unwrap();
        let s = Settings::from_builder(builder).unwrap();
        assert_eq!(s.root_url, "https://wiki.example.org");
        assert_eq!(s.timeout_secs, Some(20));
        assert!(s.pretty);
    }

    #[test]
    fn rejects_bad_root() {
        let builder = Config::builder().set_override("root_url", "not a url").unwrap();
        let s = Settings::from_builder(builder).unwrap();
        assert!(s.root().is_err());
    }
}
