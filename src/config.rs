use anyhow::{bail, Context};
use homedir::my_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage::BackendLocal;

const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_LOOKUP_HOST: &str = "favicongrabber.com";
/// Per-request timeout for every favicon request
const DEFAULT_TIMEOUT_SECS: u64 = 3;
/// Taller icons are squashed to this square size
const DEFAULT_MAX_ICON_HEIGHT: u32 = 256;
const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// Settings for icon discovery
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaviconConfig {
    /// Host of the favicon lookup service
    #[serde(default = "default_lookup_host")]
    pub lookup_host: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_icon_height")]
    pub max_icon_height: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Proxy url applied to every request
    #[serde(default)]
    pub proxy: Option<String>,

    /// Where candidate icons are written. System temp dir when unset.
    #[serde(default)]
    pub icon_dir: Option<PathBuf>,

    /// Scrape the page even when the lookup service answered with no icons
    #[serde(default)]
    pub fallback_on_empty_lookup: bool,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            lookup_host: DEFAULT_LOOKUP_HOST.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_icon_height: DEFAULT_MAX_ICON_HEIGHT,
            user_agent: USER_AGENT_DEFAULT.to_string(),
            proxy: None,
            icon_dir: None,
            fallback_on_empty_lookup: false,
        }
    }
}

fn default_lookup_host() -> String {
    DEFAULT_LOOKUP_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_icon_height() -> u32 {
    DEFAULT_MAX_ICON_HEIGHT
}

fn default_user_agent() -> String {
    USER_AGENT_DEFAULT.to_string()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub favicon: FaviconConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

/// `WEBAPP_MANAGER_BASE_PATH`, or `~/.local/share/webapp-manager`.
pub fn base_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var("WEBAPP_MANAGER_BASE_PATH") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let home = my_home()
        .context("couldnt find home dir")?
        .context("couldnt find home dir")?;
    Ok(home.join(".local/share/webapp-manager"))
}

impl Config {
    fn validate(&mut self) -> anyhow::Result<()> {
        let favicon = &mut self.favicon;

        favicon.lookup_host = favicon.lookup_host.trim().trim_end_matches('/').to_string();
        if favicon.lookup_host.is_empty() {
            bail!("favicon.lookup_host must not be empty");
        }

        if favicon.timeout_secs == 0 {
            bail!("favicon.timeout_secs must be greater than 0");
        }

        if favicon.max_icon_height == 0 {
            bail!("favicon.max_icon_height must be greater than 0");
        }

        if favicon.proxy.as_deref().is_some_and(|p| p.trim().is_empty()) {
            favicon.proxy = None;
        }

        Ok(())
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(base_path()?)
    }

    pub fn load_with(base_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let base_path = base_path.into();
        let store = BackendLocal::new(&base_path)
            .with_context(|| format!("couldnt create {}", base_path.display()))?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            store
                .write(CONFIG_FILE, serde_yml::to_string(&Self::default())?.as_bytes())
                .context("couldnt write default config")?;
        }

        let config_str = String::from_utf8(store.read(CONFIG_FILE)?)
            .context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path;
        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let store = BackendLocal::new(&self.base_path)?;
        let config_str = serde_yml::to_string(&self)?;
        store
            .write(CONFIG_FILE, config_str.as_bytes())
            .context("couldnt save config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_with(tmp.path()).unwrap();

        assert_eq!(config.favicon, FaviconConfig::default());
        assert!(tmp.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE),
            "favicon:\n  timeout_secs: 7\n  fallback_on_empty_lookup: true\n",
        )
        .unwrap();

        let config = Config::load_with(tmp.path()).unwrap();
        assert_eq!(config.favicon.timeout_secs, 7);
        assert!(config.favicon.fallback_on_empty_lookup);
        assert_eq!(config.favicon.lookup_host, DEFAULT_LOOKUP_HOST);
        assert_eq!(config.favicon.max_icon_height, DEFAULT_MAX_ICON_HEIGHT);

        // upgraded file now lists every field
        let saved = std::fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(saved.contains("lookup_host"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "favicon:\n  timeout_secs: 0\n").unwrap();

        let err = Config::load_with(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_empty_lookup_host_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "favicon:\n  lookup_host: \" \"\n").unwrap();

        assert!(Config::load_with(tmp.path()).is_err());
    }

    #[test]
    fn test_malformed_config() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "favicon: [1, 2").unwrap();

        let err = Config::load_with(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}
