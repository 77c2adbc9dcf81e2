use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_COMPLETION_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub lang: Option<String>,
    pub completion_url: Option<String>,
    pub api_key_env: Option<String>,
    pub summary_model: Option<String>,
    pub seo_model: Option<String>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub lang: String,
    pub completion_url: String,
    pub api_key_env: String,
    pub summary_model: String,
    pub seo_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().resolve(None, None)
    }
}

impl Config {
    /// Load config from `path`, or ~/.config/ytkit/config.toml if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Fill in defaults; explicit host/port (from the command line) win
    pub fn resolve(self, host: Option<String>, port: Option<u16>) -> Settings {
        Settings {
            host: host.or(self.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port.or(self.port).unwrap_or(DEFAULT_PORT),
            lang: self.lang.unwrap_or_else(|| DEFAULT_LANG.to_string()),
            completion_url: self
                .completion_url
                .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
            api_key_env: self.api_key_env.unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            summary_model: self
                .summary_model
                .unwrap_or_else(|| crate::summarize::DEFAULT_MODEL.to_string()),
            seo_model: self.seo_model.unwrap_or_else(|| crate::seo::DEFAULT_MODEL.to_string()),
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytkit")
        .join("config.toml")
}
