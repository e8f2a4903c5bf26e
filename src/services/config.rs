use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PAGE_SIZE: u32 = 500;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub cloudstack: CloudStackSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CloudStackSection {
    pub endpoint: Option<String>,
    pub key: Option<String>,
    pub secret: Option<String>,
    pub timeout_ms: Option<u64>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Resolved settings for talking to the CloudStack API.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub endpoint: String,
    pub key: String,
    pub secret: String,
    pub timeout_ms: u64,
    pub page_size: u32,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing CloudStack setting `{setting}`: set it in {path} or via {env}")]
    Missing {
        setting: &'static str,
        path: String,
        env: &'static str,
    },
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/csops/config.toml"))
}

pub fn load_config() -> anyhow::Result<ConfigFile> {
    let path = config_path()?;
    let mut cfg = if path.exists() {
        let raw = std::fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?
    } else {
        ConfigFile::default()
    };
    cfg.apply_env(|k| std::env::var(k).ok())?;
    Ok(cfg)
}

impl ConfigFile {
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let cs = &mut self.cloudstack;
        if let Some(v) = lookup("CLOUDSTACK_ENDPOINT") {
            cs.endpoint = Some(v);
        }
        if let Some(v) = lookup("CLOUDSTACK_KEY") {
            cs.key = Some(v);
        }
        if let Some(v) = lookup("CLOUDSTACK_SECRET") {
            cs.secret = Some(v);
        }
        if let Some(v) = lookup("CLOUDSTACK_TIMEOUT") {
            let ms = v.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "CLOUDSTACK_TIMEOUT",
                value: v.clone(),
            })?;
            cs.timeout_ms = Some(ms);
        }
        Ok(())
    }

    pub fn api_settings(&self) -> Result<ApiSettings, ConfigError> {
        let path = config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "~/.config/csops/config.toml".to_string());
        let cs = &self.cloudstack;
        let required = |value: &Option<String>, setting: &'static str, env: &'static str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ConfigError::Missing {
                    setting,
                    path: path.clone(),
                    env,
                })
        };
        let endpoint = required(&cs.endpoint, "endpoint", "CLOUDSTACK_ENDPOINT")?;
        let key = required(&cs.key, "key", "CLOUDSTACK_KEY")?;
        let secret = required(&cs.secret, "secret", "CLOUDSTACK_SECRET")?;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "endpoint",
                value: endpoint,
            });
        }
        let page_size = cs.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "page_size",
                value: "0".to_string(),
            });
        }
        Ok(ApiSettings {
            endpoint,
            key,
            secret,
            timeout_ms: cs.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            page_size,
        })
    }
}
